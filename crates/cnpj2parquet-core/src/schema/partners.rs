// Partners layout (Socios*.zip)

use super::{ColumnType, DatasetLayout};
use crate::dataset::DatasetType;

pub const COLUMNS: &[&str] = &[
    "cnpj_base",
    "identificador_socio",
    "nome_socio",
    "cnpj_cpf_socio",
    "qualificacao_socio",
    "data_entrada_sociedade",
    "pais",
    "representante_legal",
    "nome_representante",
    "qualificacao_representante_legal",
    "faixa_etaria",
];

pub const TYPE_MAP: &[(&str, ColumnType)] = &[
    ("identificador_socio", ColumnType::Int32),
    ("faixa_etaria", ColumnType::Int32),
];

pub static LAYOUT: DatasetLayout = DatasetLayout {
    dataset: DatasetType::Partners,
    version: "1",
    columns: COLUMNS,
    type_map: TYPE_MAP,
};
