//! Registry dataset types
//!
//! Each registry table is published as a series of numbered archives whose
//! filenames embed the table name (`Estabelecimentos3.zip`, `Empresas0.zip`).
//! The same name is used as the local directory namespace for archives and
//! Parquet parts.

use crate::error::{CoreError, Result};
use crate::schema::{self, DatasetLayout};
use std::fmt;
use std::str::FromStr;

/// Registry tables understood by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetType {
    /// Establishments (one row per establishment, keyed by the full cnpj)
    Establishments,
    /// Companies (one row per company, keyed by cnpj_base)
    Companies,
    /// Partners and shareholders
    Partners,
    /// Simples Nacional / MEI tax regime options
    Simples,
}

impl DatasetType {
    pub const ALL: [DatasetType; 4] = [
        DatasetType::Establishments,
        DatasetType::Companies,
        DatasetType::Partners,
        DatasetType::Simples,
    ];

    /// Directory namespace and URL substring for this dataset
    pub fn directory_name(&self) -> &'static str {
        match self {
            Self::Establishments => "Estabelecimentos",
            Self::Companies => "Empresas",
            Self::Partners => "Socios",
            Self::Simples => "Simples",
        }
    }

    /// Short code accepted on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Self::Establishments => "est",
            Self::Companies => "emp",
            Self::Partners => "soc",
            Self::Simples => "sim",
        }
    }

    /// Resolve a command-line code (`est`, `emp`, `soc`, `sim`).
    pub fn from_code(code: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|dataset| dataset.code() == code)
            .ok_or_else(|| CoreError::UnknownDataset(code.to_string()))
    }

    /// Classify an archive filename by substring containment.
    ///
    /// Returns `None` for files that belong to no known table (lookup tables
    /// such as `Cnaes.zip` or `Municipios.zip`).
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dataset| filename.contains(dataset.directory_name()))
    }

    /// Positional column layout and extraction type map
    pub fn layout(&self) -> &'static DatasetLayout {
        match self {
            Self::Establishments => &schema::establishments::LAYOUT,
            Self::Companies => &schema::companies::LAYOUT,
            Self::Partners => &schema::partners::LAYOUT,
            Self::Simples => &schema::simples::LAYOUT,
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory_name())
    }
}

impl FromStr for DatasetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(
            DatasetType::from_code("est").unwrap(),
            DatasetType::Establishments
        );
        assert_eq!(DatasetType::from_code("emp").unwrap(), DatasetType::Companies);
        assert_eq!("soc".parse::<DatasetType>().unwrap(), DatasetType::Partners);
        assert!(matches!(
            DatasetType::from_code("xyz"),
            Err(CoreError::UnknownDataset(code)) if code == "xyz"
        ));
    }

    #[test]
    fn test_from_filename() {
        assert_eq!(
            DatasetType::from_filename("Estabelecimentos9.zip"),
            Some(DatasetType::Establishments)
        );
        assert_eq!(
            DatasetType::from_filename("Empresas0.zip"),
            Some(DatasetType::Companies)
        );
        assert_eq!(
            DatasetType::from_filename("Simples.zip"),
            Some(DatasetType::Simples)
        );
        assert_eq!(DatasetType::from_filename("Cnaes.zip"), None);
    }

    #[test]
    fn test_layout_belongs_to_dataset() {
        for dataset in DatasetType::ALL {
            assert_eq!(dataset.layout().dataset, dataset);
        }
    }
}
