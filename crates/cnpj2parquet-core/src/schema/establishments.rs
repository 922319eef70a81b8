// Establishments layout (Estabelecimentos*.zip)
//
// Phone, fax and postal code fields stay text so leading zeros survive.

use super::{ColumnType, DatasetLayout};
use crate::dataset::DatasetType;

pub const COLUMNS: &[&str] = &[
    "cnpj_base",
    "cnpj_ordem",
    "cnpj_dv",
    "identificador_matriz_filial",
    "nome_fantasia",
    "situacao_cadastral",
    "data_situacao_cadastral",
    "motivo_situacao_cadastral",
    "nome_cidade_exterior",
    "pais",
    "data_inicio_atividade",
    "cd_cnae_principal",
    "cnae_fiscal_secundaria",
    "tipo_logradouro",
    "logradouro",
    "numero",
    "complemento",
    "bairro",
    "cep",
    "uf",
    "municipio",
    "ddd1",
    "telefone1",
    "ddd2",
    "telefone2",
    "ddd_fax",
    "fax",
    "correio_eletronico",
    "situacao_especial",
    "data_situacao_especial",
];

pub const TYPE_MAP: &[(&str, ColumnType)] = &[
    ("ddd1", ColumnType::Utf8),
    ("telefone1", ColumnType::Utf8),
    ("ddd2", ColumnType::Utf8),
    ("telefone2", ColumnType::Utf8),
    ("ddd_fax", ColumnType::Utf8),
    ("fax", ColumnType::Utf8),
    ("cep", ColumnType::Utf8),
    ("identificador_matriz_filial", ColumnType::Int32),
    ("situacao_cadastral", ColumnType::Int32),
];

pub static LAYOUT: DatasetLayout = DatasetLayout {
    dataset: DatasetType::Establishments,
    version: "1",
    columns: COLUMNS,
    type_map: TYPE_MAP,
};
