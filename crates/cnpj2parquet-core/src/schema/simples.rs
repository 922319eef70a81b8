// Simples Nacional layout (Simples.zip)

use super::{ColumnType, DatasetLayout};
use crate::dataset::DatasetType;

pub const COLUMNS: &[&str] = &[
    "cnpj_base",
    "opcao_simples",
    "data_opcao_simples",
    "data_exclusao_simples",
    "opcao_mei",
    "data_opcao_mei",
    "data_exclusao_mei",
];

pub const TYPE_MAP: &[(&str, ColumnType)] = &[];

pub static LAYOUT: DatasetLayout = DatasetLayout {
    dataset: DatasetType::Simples,
    version: "1",
    columns: COLUMNS,
    type_map: TYPE_MAP,
};
