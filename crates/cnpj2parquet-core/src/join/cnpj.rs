// Business key reconstruction
//
// The full cnpj is never read from the source. It is rebuilt from its three
// segments. Each segment is read as the integer it spells, so the registry's
// own zero padding is dropped, then left-padded with zeros: base to 7 digits,
// order to 4, check to 2. Padding never truncates a longer segment.

use crate::error::{CoreError, Result};
use arrow::array::{Array, ArrayRef, AsArray, RecordBatch, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use std::sync::Arc;

pub const CNPJ: &str = "cnpj";
pub const CNPJ_BASE: &str = "cnpj_base";
pub const CNPJ_ORDER: &str = "cnpj_ordem";
pub const CNPJ_CHECK: &str = "cnpj_dv";

/// Concatenate the zero-padded key segments.
///
/// `"00000001"`, `"0001"`, `"10"` -> `"0000001000110"`
pub fn build_cnpj(base: &str, order: &str, check: &str) -> String {
    format!(
        "{:0>7}{:0>4}{:0>2}",
        integer_digits(base),
        integer_digits(order),
        integer_digits(check)
    )
}

/// Digits of a segment without leading zeros. An all-zero segment is `"0"`.
pub fn integer_digits(segment: &str) -> &str {
    let trimmed = segment.trim().trim_start_matches('0');
    if trimmed.is_empty() && !segment.trim().is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// Column `name` rendered as text with [`integer_digits`] applied per row.
///
/// Text and integer columns holding the same numbers compare equal afterwards.
pub(crate) fn segment_digits(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| CoreError::missing_column(name, &batch.schema()))?;
    let text = cast(column, &DataType::Utf8)?;
    Ok(text
        .as_string::<i32>()
        .iter()
        .map(|value| value.map(integer_digits))
        .collect())
}

/// Append (or overwrite) the `cnpj` column derived from the segment columns.
///
/// Segment columns may be text or integer. A row with any null segment gets a
/// null key.
pub fn add_cnpj_column(batch: &RecordBatch) -> Result<RecordBatch> {
    let base = segment_digits(batch, CNPJ_BASE)?;
    let order = segment_digits(batch, CNPJ_ORDER)?;
    let check = segment_digits(batch, CNPJ_CHECK)?;

    let keys: StringArray = (0..batch.num_rows())
        .map(|row| {
            if base.is_null(row) || order.is_null(row) || check.is_null(row) {
                None
            } else {
                Some(build_cnpj(base.value(row), order.value(row), check.value(row)))
            }
        })
        .collect();

    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();
    let field = Field::new(CNPJ, DataType::Utf8, true);

    match schema.index_of(CNPJ) {
        Ok(index) => {
            fields[index] = field;
            columns[index] = Arc::new(keys);
        }
        Err(_) => {
            fields.push(field);
            columns.push(Arc::new(keys));
        }
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(RecordBatch::try_new(Arc::new(schema), columns)?)
}
