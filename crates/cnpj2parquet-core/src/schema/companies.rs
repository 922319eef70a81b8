// Companies layout (Empresas*.zip)
//
// capital_social uses a decimal comma in the source and is kept as text.

use super::{ColumnType, DatasetLayout};
use crate::dataset::DatasetType;

pub const COLUMNS: &[&str] = &[
    "cnpj_base",
    "razao_social",
    "natureza_juridica",
    "qualificacao_responsavel",
    "capital_social",
    "porte_empresa",
    "ente_federativo_responsavel",
];

pub const TYPE_MAP: &[(&str, ColumnType)] = &[
    ("natureza_juridica", ColumnType::Int32),
    ("porte_empresa", ColumnType::Int32),
    ("capital_social", ColumnType::Utf8),
];

pub static LAYOUT: DatasetLayout = DatasetLayout {
    dataset: DatasetType::Companies,
    version: "1",
    columns: COLUMNS,
    type_map: TYPE_MAP,
};
