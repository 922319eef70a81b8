// Export shapes of the joined registry table

use crate::error::{CoreError, Result};
use crate::normalize::normalize;
use crate::schema::{ColumnType, TypeMap};
use arrow::array::RecordBatch;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const NAMES: &TypeMap = &[
    ("cnpj", ColumnType::Utf8),
    ("nome_fantasia", ColumnType::Utf8),
    ("razao_social", ColumnType::Utf8),
];

const SUMMARY_INFO: &TypeMap = &[
    ("cnpj", ColumnType::Utf8),
    ("nome_fantasia", ColumnType::Utf8),
    ("razao_social", ColumnType::Utf8),
    ("cd_cnae_principal", ColumnType::Utf8),
    ("porte_empresa", ColumnType::Int32),
    ("natureza_juridica", ColumnType::Int32),
    ("capital_social", ColumnType::Utf8),
];

/// Named subset and typing of the joined table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// Every joined column plus `cnpj`
    Merged,
    /// Identity and name columns
    Names,
    /// Identity, classification and capital columns
    SummaryInfo,
}

impl Projection {
    pub const ALL: [Projection; 3] = [Self::Merged, Self::Names, Self::SummaryInfo];

    /// Output directory under the export root
    pub fn directory_name(&self) -> &'static str {
        match self {
            Self::Merged => "Merged",
            Self::Names => "Names",
            Self::SummaryInfo => "SummaryInfo",
        }
    }

    /// Selected columns with their types, in output order. `None` keeps every column.
    pub fn type_map(&self) -> Option<&'static TypeMap> {
        match self {
            Self::Merged => None,
            Self::Names => Some(NAMES),
            Self::SummaryInfo => Some(SUMMARY_INFO),
        }
    }

    /// File written for `label`.
    ///
    /// ```
    /// use cnpj2parquet_core::join::Projection;
    /// use std::path::Path;
    ///
    /// let root = Path::new("/out");
    /// assert_eq!(Projection::Merged.output_path(root, "7"), Path::new("/out/Merged/7.parquet"));
    /// assert_eq!(Projection::Names.output_path(root, "7"), Path::new("/out/Names/part-000007.parquet"));
    /// ```
    pub fn output_path(&self, root: &Path, label: &str) -> PathBuf {
        let filename = match self {
            Self::Merged => format!("{}.parquet", label),
            Self::Names | Self::SummaryInfo => format!("part-{:0>6}.parquet", label),
        };
        root.join(self.directory_name()).join(filename)
    }

    /// Select and type the projection's columns from a joined, keyed table.
    pub fn apply(&self, joined: &RecordBatch) -> Result<RecordBatch> {
        let Some(type_map) = self.type_map() else {
            return Ok(joined.clone());
        };

        let schema = joined.schema();
        let indices = type_map
            .iter()
            .map(|(column, _)| {
                schema
                    .index_of(column)
                    .map_err(|_| CoreError::missing_column(column, &schema))
            })
            .collect::<Result<Vec<_>>>()?;

        let selected = joined.project(&indices)?;
        normalize(&selected, type_map)
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory_name())
    }
}

impl FromStr for Projection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "merged" | "merge" => Ok(Self::Merged),
            "names" => Ok(Self::Names),
            "summaryinfo" | "summary-info" | "summary" => Ok(Self::SummaryInfo),
            other => Err(CoreError::InvalidConfig(format!(
                "unknown projection '{}' (expected merged, names or summary-info)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, AsArray, Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn joined() -> RecordBatch {
        let names = [
            "cnpj_base",
            "nome_fantasia",
            "cd_cnae_principal",
            "razao_social",
            "natureza_juridica",
            "capital_social",
            "porte_empresa",
            "cnpj",
        ];
        let values = [
            "1", "PADARIA", "1091101", "PADARIA LTDA", "2062", "1000,00", "01", "0000001000101",
        ];
        let fields: Vec<Field> = names
            .iter()
            .map(|n| Field::new(*n, DataType::Utf8, true))
            .collect();
        let columns: Vec<ArrayRef> = values
            .iter()
            .map(|v| Arc::new(StringArray::from(vec![*v])) as ArrayRef)
            .collect();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
    }

    #[test]
    fn test_merged_keeps_everything() {
        let table = joined();
        assert_eq!(Projection::Merged.apply(&table).unwrap(), table);
    }

    #[test]
    fn test_names_selects_in_order() {
        let names = Projection::Names.apply(&joined()).unwrap();
        let columns: Vec<&str> = names
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(columns, vec!["cnpj", "nome_fantasia", "razao_social"]);
    }

    #[test]
    fn test_summary_info_applies_types() {
        let summary = Projection::SummaryInfo.apply(&joined()).unwrap();
        assert_eq!(summary.num_columns(), 7);

        let porte = summary
            .column_by_name("porte_empresa")
            .unwrap()
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap();
        assert_eq!(porte.value(0), 1);

        let capital = summary.column_by_name("capital_social").unwrap();
        assert_eq!(capital.as_string::<i32>().value(0), "1000,00");
    }

    #[test]
    fn test_missing_projection_column_is_an_error() {
        let table = joined().project(&[0, 1, 7]).unwrap();
        assert!(matches!(
            Projection::SummaryInfo.apply(&table),
            Err(CoreError::MissingColumn { column, .. }) if column == "razao_social"
        ));
    }

    #[test]
    fn test_output_paths() {
        let root = Path::new("/data/processed");
        assert_eq!(
            Projection::SummaryInfo.output_path(root, "12"),
            PathBuf::from("/data/processed/SummaryInfo/part-000012.parquet")
        );
        assert_eq!(
            Projection::Merged.output_path(root, "2024-01"),
            PathBuf::from("/data/processed/Merged/2024-01.parquet")
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("names".parse::<Projection>().unwrap(), Projection::Names);
        assert_eq!(
            "SummaryInfo".parse::<Projection>().unwrap(),
            Projection::SummaryInfo
        );
        assert!("everything".parse::<Projection>().is_err());
    }
}
