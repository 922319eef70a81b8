// Registry join
//
// Establishments and companies are joined on `cnpj_base`. The companies side
// is indexed in a hash map and the establishments side is scanned in order,
// so output rows follow establishment order and, for one establishment, the
// order of its matching companies. Rows without a counterpart are dropped.

mod cnpj;
mod projection;

pub use cnpj::{
    add_cnpj_column, build_cnpj, integer_digits, CNPJ, CNPJ_BASE, CNPJ_CHECK, CNPJ_ORDER,
};
pub use projection::Projection;

use crate::error::Result;
use arrow::array::{Array, ArrayRef, RecordBatch, UInt64Array};
use arrow::compute::take;
use arrow::datatypes::{Field, Schema};
use cnpj::segment_digits;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Marker appended to a right-hand column whose name is already taken
pub const COLLISION_SUFFIX: &str = "_duplicated";

/// Inner join of `left` and `right` on the column `key`.
///
/// Keys are compared as the integers they spell: `"00000042"` on one side
/// matches `"42"` or an integer `42` on the other. Null keys never match. The right-hand key column is not repeated in the
/// output; any other right-hand column whose name exists on the left gets
/// [`COLLISION_SUFFIX`].
pub fn inner_join(left: &RecordBatch, right: &RecordBatch, key: &str) -> Result<RecordBatch> {
    let left_keys = segment_digits(left, key)?;
    let right_keys = segment_digits(right, key)?;

    let mut index: HashMap<&str, Vec<u64>> = HashMap::with_capacity(right_keys.len());
    for (row, value) in right_keys.iter().enumerate() {
        if let Some(value) = value {
            index.entry(value).or_default().push(row as u64);
        }
    }

    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for (row, value) in left_keys.iter().enumerate() {
        let Some(matches) = value.and_then(|v| index.get(v)) else {
            continue;
        };
        for &matched in matches {
            left_rows.push(row as u64);
            right_rows.push(matched);
        }
    }

    let left_rows = UInt64Array::from(left_rows);
    let right_rows = UInt64Array::from(right_rows);

    let left_schema = left.schema();
    let right_schema = right.schema();
    let mut fields: Vec<Field> = Vec::with_capacity(left.num_columns() + right.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(fields.capacity());

    for (field, column) in left_schema.fields().iter().zip(left.columns()) {
        fields.push(field.as_ref().clone());
        columns.push(take(column.as_ref(), &left_rows, None)?);
    }

    for (field, column) in right_schema.fields().iter().zip(right.columns()) {
        if field.name() == key {
            continue;
        }
        let name = if left_schema.column_with_name(field.name()).is_some() {
            format!("{}{}", field.name(), COLLISION_SUFFIX)
        } else {
            field.name().clone()
        };
        fields.push(field.as_ref().clone().with_name(name));
        columns.push(take(column.as_ref(), &right_rows, None)?);
    }

    let joined = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    info!(
        "Joined {} left rows with {} right rows into {} rows",
        left.num_rows(),
        right.num_rows(),
        joined.num_rows()
    );
    Ok(joined)
}

/// Join establishments with companies, rebuild the full key and apply `projection`.
pub fn join_and_project(
    establishments: &RecordBatch,
    companies: &RecordBatch,
    projection: Projection,
) -> Result<RecordBatch> {
    let joined = inner_join(establishments, companies, CNPJ_BASE)?;
    let keyed = add_cnpj_column(&joined)?;
    projection.apply(&keyed)
}
