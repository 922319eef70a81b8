// Tabular extraction from registry archives
//
// Each archive holds one or more `;`-delimited, Latin-1 encoded text files
// without a header row. Every member is read with the dataset's positional
// layout and appended to one in-memory table. A member that cannot be read is
// logged and skipped; the remaining members still make up the table.

mod latin1;
mod table_builder;

use crate::dataset::DatasetType;
use crate::error::{CoreError, Result};
use arrow::array::RecordBatch;
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use table_builder::{MemberBatcher, TableBuilder};
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Rows per Arrow batch while reading a member
pub const DEFAULT_CHUNK_ROWS: usize = 64 * 1024;

/// Archive member excluded from the result, with the reason it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMember {
    pub name: String,
    pub reason: String,
}

/// Rows read from one archive, all sharing the dataset's raw schema
#[derive(Debug)]
pub struct RawTable {
    dataset: DatasetType,
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    skipped: Vec<SkippedMember>,
}

impl RawTable {
    pub fn dataset(&self) -> DatasetType {
        self.dataset
    }

    pub fn schema(&self) -> SchemaRef {
        SchemaRef::clone(&self.schema)
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Members that failed to parse and were left out
    pub fn skipped(&self) -> &[SkippedMember] {
        &self.skipped
    }

    /// Concatenate all member batches into one batch.
    ///
    /// An archive without readable members yields a zero-row batch that still
    /// carries the full column set.
    pub fn finish(self) -> Result<RecordBatch> {
        if self.batches.is_empty() {
            return Ok(RecordBatch::new_empty(self.schema));
        }
        Ok(concat_batches(&self.schema, &self.batches)?)
    }
}

/// Reads registry archives for one dataset type
#[derive(Debug, Clone, Copy)]
pub struct TabularExtractor {
    dataset: DatasetType,
    chunk_rows: usize,
}

impl TabularExtractor {
    pub fn new(dataset: DatasetType) -> Self {
        Self {
            dataset,
            chunk_rows: DEFAULT_CHUNK_ROWS,
        }
    }

    pub fn with_chunk_rows(mut self, chunk_rows: usize) -> Self {
        self.chunk_rows = chunk_rows.max(1);
        self
    }

    /// Extract the archive stored at `path`.
    pub fn extract_path(&self, path: &Path) -> Result<RawTable> {
        let file = File::open(path).map_err(|e| CoreError::io(path, e))?;
        self.extract(BufReader::new(file), &path.display().to_string())
    }

    /// Extract an archive from any seekable reader.
    ///
    /// Fails only when the container itself cannot be opened. Member-level
    /// failures are recorded in [`RawTable::skipped`].
    pub fn extract<R: Read + Seek>(&self, reader: R, source: &str) -> Result<RawTable> {
        let mut archive = ZipArchive::new(reader)?;
        let mut table = TableBuilder::new(self.dataset);

        info!(
            "Reading {} member(s) of {} as {}",
            archive.len(),
            source,
            self.dataset
        );

        for index in 0..archive.len() {
            let member = match archive.by_index(index) {
                Ok(member) => member,
                Err(err) => {
                    let name = format!("#{}", index);
                    warn!(
                        member = %name,
                        archive = %source,
                        error = %err,
                        "It was not possible to open the archive member"
                    );
                    table.skip_member(name, err.to_string());
                    continue;
                }
            };

            if member.is_dir() {
                continue;
            }

            let name = member.name().to_string();
            match read_member(member, &name, table.schema(), self.chunk_rows) {
                Ok(batches) => {
                    let rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
                    debug!(member = %name, rows, "Read archive member");
                    table.append_member(batches);
                }
                Err(err) => {
                    warn!(
                        member = %name,
                        archive = %source,
                        error = %err,
                        "It was not possible to read the file within the archive"
                    );
                    table.skip_member(name, err.to_string());
                }
            }
        }

        info!(
            "Extracted {} rows from {} ({} member(s) skipped)",
            table.total_rows(),
            source,
            table.skipped_count()
        );

        Ok(table.finalize())
    }
}

/// Parse one member completely, or fail without side effects.
fn read_member<R: Read>(
    reader: R,
    name: &str,
    schema: &SchemaRef,
    chunk_rows: usize,
) -> Result<Vec<RecordBatch>> {
    let expected = schema.fields().len();
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut batcher = MemberBatcher::new(SchemaRef::clone(schema), chunk_rows);
    let mut record = csv::ByteRecord::new();

    while csv_reader.read_byte_record(&mut record)? {
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        if record.len() != expected {
            return Err(CoreError::SchemaMismatch {
                member: name.to_string(),
                record: record.position().map(|p| p.record() + 1).unwrap_or(0),
                expected,
                found: record.len(),
            });
        }
        batcher.push_record(&record)?;
    }

    batcher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, StringArray};
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;

    fn build_archive(members: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in members {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const COMPANY_A: &[u8] = b"\"00000001\";\"PADARIA A\";\"2062\";\"49\";\"1000,00\";\"01\";\"\"\n";
    const COMPANY_B: &[u8] = b"\"00000002\";\"MERCADO B\";\"2135\";\"50\";\"500,00\";\"05\";\"\"\n\"00000003\";\"OFICINA C\";\"2135\";\"50\";\"0,00\";\"05\";\"\"\n";

    #[test]
    fn test_extract_concatenates_members() {
        let archive = build_archive(&[("K1.EMPRECSV", COMPANY_A), ("K2.EMPRECSV", COMPANY_B)]);
        let raw = TabularExtractor::new(DatasetType::Companies)
            .extract(Cursor::new(archive), "Empresas0.zip")
            .unwrap();

        assert_eq!(raw.num_rows(), 3);
        assert!(raw.skipped().is_empty());

        let batch = raw.finish().unwrap();
        assert_eq!(batch.num_columns(), 7);
        let names = batch
            .column_by_name("razao_social")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(names.value(0), "PADARIA A");
        assert_eq!(names.value(2), "OFICINA C");
        assert!(batch.column_by_name("ente_federativo_responsavel").unwrap().is_null(0));
    }

    #[test]
    fn test_bad_member_is_skipped() {
        let broken: &[u8] = b"\"00000009\";\"ONLY TWO FIELDS\"\n";
        let archive = build_archive(&[
            ("K1.EMPRECSV", COMPANY_A),
            ("K2.EMPRECSV", broken),
            ("K3.EMPRECSV", COMPANY_B),
        ]);
        let raw = TabularExtractor::new(DatasetType::Companies)
            .extract(Cursor::new(archive), "Empresas0.zip")
            .unwrap();

        assert_eq!(raw.num_rows(), 3);
        assert_eq!(raw.skipped().len(), 1);
        assert_eq!(raw.skipped()[0].name, "K2.EMPRECSV");
        assert!(raw.skipped()[0].reason.contains("expected 7 fields, found 2"));
    }

    #[test]
    fn test_member_failing_after_good_rows_contributes_nothing() {
        let mut partial = COMPANY_A.to_vec();
        partial.extend_from_slice(b"\"00000004\";\"SHORT\"\n");
        let archive = build_archive(&[("K1.EMPRECSV", partial.as_slice()), ("K2.EMPRECSV", COMPANY_B)]);

        let raw = TabularExtractor::new(DatasetType::Companies)
            .with_chunk_rows(1)
            .extract(Cursor::new(archive), "Empresas0.zip")
            .unwrap();

        assert_eq!(raw.num_rows(), 2);
        assert_eq!(raw.skipped().len(), 1);
    }

    #[test]
    fn test_no_readable_members_yields_empty_table() {
        let archive = build_archive(&[("K1.EMPRECSV", &b"a;b\n"[..])]);
        let raw = TabularExtractor::new(DatasetType::Companies)
            .extract(Cursor::new(archive), "Empresas0.zip")
            .unwrap();

        let batch = raw.finish().unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 7);
    }

    #[test]
    fn test_latin1_fields_are_decoded() {
        let content: &[u8] = b"\"00000001\";\"PADARIA S\xC3O JO\xC3O\";\"2062\";\"49\";\"1,00\";\"01\";\"\"\n";
        let archive = build_archive(&[("K1.EMPRECSV", content)]);
        let batch = TabularExtractor::new(DatasetType::Companies)
            .extract(Cursor::new(archive), "Empresas0.zip")
            .unwrap()
            .finish()
            .unwrap();

        let names = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(names.value(0), "PADARIA SÃO JOÃO");
    }

    #[test]
    fn test_not_an_archive_is_an_error() {
        let result = TabularExtractor::new(DatasetType::Companies)
            .extract(Cursor::new(b"not a zip".to_vec()), "broken.zip");
        assert!(matches!(result, Err(CoreError::Zip(_))));
    }
}
