// Accumulation of archive members into one table
//
// A member is parsed completely into its own batches before anything is
// appended to the archive-level builder, so a member that fails halfway
// contributes no rows.

use super::latin1::decode_latin1;
use super::{RawTable, SkippedMember};
use crate::dataset::DatasetType;
use crate::error::Result;
use arrow::array::{ArrayRef, RecordBatch, StringBuilder};
use arrow::datatypes::SchemaRef;
use std::sync::Arc;

/// Archive-level accumulator of validated member batches
#[derive(Debug)]
pub(crate) struct TableBuilder {
    dataset: DatasetType,
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    total_rows: usize,
    skipped: Vec<SkippedMember>,
}

impl TableBuilder {
    pub fn new(dataset: DatasetType) -> Self {
        Self {
            dataset,
            schema: dataset.layout().raw_schema(),
            batches: Vec::new(),
            total_rows: 0,
            skipped: Vec::new(),
        }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn append_member(&mut self, batches: Vec<RecordBatch>) {
        self.total_rows += batches.iter().map(RecordBatch::num_rows).sum::<usize>();
        self.batches.extend(batches);
    }

    pub fn skip_member(&mut self, name: String, reason: String) {
        self.skipped.push(SkippedMember { name, reason });
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn finalize(self) -> RawTable {
        RawTable {
            dataset: self.dataset,
            schema: self.schema,
            batches: self.batches,
            skipped: self.skipped,
        }
    }
}

/// Column-wise string builders for a single member, flushed every `chunk_rows`
pub(crate) struct MemberBatcher {
    schema: SchemaRef,
    builders: Vec<StringBuilder>,
    rows: usize,
    chunk_rows: usize,
    batches: Vec<RecordBatch>,
}

impl MemberBatcher {
    pub fn new(schema: SchemaRef, chunk_rows: usize) -> Self {
        let builders = (0..schema.fields().len())
            .map(|_| StringBuilder::new())
            .collect();
        Self {
            schema,
            builders,
            rows: 0,
            chunk_rows: chunk_rows.max(1),
            batches: Vec::new(),
        }
    }

    /// Append one record. The caller has already checked the field count.
    pub fn push_record(&mut self, record: &csv::ByteRecord) -> Result<()> {
        for (builder, field) in self.builders.iter_mut().zip(record.iter()) {
            if field.is_empty() {
                builder.append_null();
            } else {
                builder.append_value(decode_latin1(field));
            }
        }
        self.rows += 1;

        if self.rows >= self.chunk_rows {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.rows == 0 {
            return Ok(());
        }
        let columns: Vec<ArrayRef> = self
            .builders
            .iter_mut()
            .map(|builder| Arc::new(builder.finish()) as ArrayRef)
            .collect();
        self.batches
            .push(RecordBatch::try_new(Arc::clone(&self.schema), columns)?);
        self.rows = 0;
        Ok(())
    }

    pub fn finish(mut self) -> Result<Vec<RecordBatch>> {
        self.flush()?;
        Ok(self.batches)
    }
}
