//! Schema normalization
//!
//! Applies a dataset's type map to a table and stamps it with the job's
//! processing timestamp. Type map entries naming a column the table does not
//! have are skipped: absence is an expected case, not an error.

use crate::dataset::DatasetType;
use crate::error::Result;
use crate::schema::{processed_at_field, TypeMap, PROCESSED_AT};
use arrow::array::{ArrayRef, RecordBatch, TimestampMicrosecondArray};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::{Field, FieldRef, Schema};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Cast every present column named in `type_map` to its declared type.
///
/// Casting is strict: a value that cannot be represented in the target type
/// fails the whole call. Applying the same map twice is equivalent to
/// applying it once.
pub fn normalize(batch: &RecordBatch, type_map: &TypeMap) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    let options = CastOptions {
        safe: false,
        ..Default::default()
    };

    for (column, column_type) in type_map {
        let Some((index, field)) = schema.column_with_name(column) else {
            debug!(column = %column, "Column absent, skipping cast");
            continue;
        };

        let target = column_type.data_type();
        if field.data_type() == &target {
            continue;
        }

        columns[index] = cast_with_options(&columns[index], &target, &options)?;
        fields[index] = Arc::new(field.clone().with_data_type(target));
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

/// Append (or overwrite) the constant `processed_at` column.
pub fn add_processed_at(batch: &RecordBatch, processed_at: DateTime<Utc>) -> Result<RecordBatch> {
    let schema = batch.schema();
    let values: ArrayRef = Arc::new(
        TimestampMicrosecondArray::from_value(processed_at.timestamp_micros(), batch.num_rows())
            .with_timezone("UTC"),
    );

    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    match schema.index_of(PROCESSED_AT) {
        Ok(index) => {
            fields[index] = processed_at_field();
            columns[index] = values;
        }
        Err(_) => {
            fields.push(processed_at_field());
            columns.push(values);
        }
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}

/// Full extraction-time normalization for one dataset.
pub fn normalize_extracted(
    batch: &RecordBatch,
    dataset: DatasetType,
    processed_at: DateTime<Utc>,
) -> Result<RecordBatch> {
    let stamped = add_processed_at(batch, processed_at)?;
    normalize(&stamped, dataset.layout().type_map)
}
