// Positional Arrow schemas for the registry tables
//
// Source files carry no header row. Column identity is assigned here, by
// position, and never inferred from file content. Bump a layout's version
// whenever its column list changes.

pub mod companies;
pub mod establishments;
pub mod partners;
pub mod simples;

use crate::dataset::DatasetType;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Name of the constant processing-timestamp column added at extraction
pub const PROCESSED_AT: &str = "processed_at";

/// Schema metadata key naming the dataset a table was extracted from
pub const DATASET_METADATA_KEY: &str = "cnpj2parquet.dataset";

/// Schema metadata key holding the layout version
pub const SCHEMA_VERSION_METADATA_KEY: &str = "cnpj2parquet.schema_version";

/// Semantic column types a type map can coerce to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Utf8,
    Int32,
    Int64,
    Float64,
}

impl ColumnType {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Utf8 => DataType::Utf8,
            Self::Int32 => DataType::Int32,
            Self::Int64 => DataType::Int64,
            Self::Float64 => DataType::Float64,
        }
    }
}

/// Ordered `(column, type)` coercions
pub type TypeMap = [(&'static str, ColumnType)];

/// Fixed layout of one registry table
#[derive(Debug)]
pub struct DatasetLayout {
    pub dataset: DatasetType,
    pub version: &'static str,
    /// Column names in file order
    pub columns: &'static [&'static str],
    /// Coercions applied once per extraction job
    pub type_map: &'static TypeMap,
}

impl DatasetLayout {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cached schema of the raw table: every column nullable Utf8.
    pub fn raw_schema(&self) -> SchemaRef {
        static SCHEMAS: [OnceLock<SchemaRef>; 4] = [
            OnceLock::new(),
            OnceLock::new(),
            OnceLock::new(),
            OnceLock::new(),
        ];
        let slot = &SCHEMAS[self.dataset as usize];
        Arc::clone(slot.get_or_init(|| Arc::new(self.build_raw_schema())))
    }

    fn build_raw_schema(&self) -> Schema {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect();

        let metadata = HashMap::from([
            (
                DATASET_METADATA_KEY.to_string(),
                self.dataset.directory_name().to_string(),
            ),
            (
                SCHEMA_VERSION_METADATA_KEY.to_string(),
                self.version.to_string(),
            ),
        ]);

        Schema::new_with_metadata(fields, metadata)
    }
}

/// Field definition of the processing-timestamp column
pub fn processed_at_field() -> Field {
    Field::new(
        PROCESSED_AT,
        DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_schema_creation() {
        let layout = DatasetType::Establishments.layout();
        let schema = layout.raw_schema();

        assert_eq!(schema.fields().len(), 30);
        assert_eq!(schema.field(0).name(), "cnpj_base");
        assert_eq!(schema.field(1).name(), "cnpj_ordem");
        assert_eq!(schema.field(2).name(), "cnpj_dv");
        assert!(schema
            .fields()
            .iter()
            .all(|f| f.data_type() == &DataType::Utf8 && f.is_nullable()));
        assert_eq!(
            schema.metadata().get(DATASET_METADATA_KEY).map(String::as_str),
            Some("Estabelecimentos")
        );
    }

    #[test]
    fn test_raw_schema_is_cached_per_dataset() {
        let a = DatasetType::Companies.layout().raw_schema();
        let b = DatasetType::Companies.layout().raw_schema();
        assert!(Arc::ptr_eq(&a, &b));

        let other = DatasetType::Simples.layout().raw_schema();
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[test]
    fn test_type_maps_name_known_columns() {
        for dataset in DatasetType::ALL {
            let layout = dataset.layout();
            for (column, _) in layout.type_map {
                assert!(
                    layout.columns.contains(column),
                    "{} type map names unknown column {}",
                    dataset,
                    column
                );
            }
        }
    }
}
