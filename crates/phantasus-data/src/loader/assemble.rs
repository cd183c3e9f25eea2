//! Turning parsed series tables into matrices.
use serde_json::Value;

use crate::error::{Axis, MatrixError};
use crate::io::SeriesTable;
use crate::math::Array2;
use crate::matrix::Matrix;
use crate::vector::{Properties, VectorHeader};

/// Build a `Matrix` from a parsed table. Sample annotations become column
/// properties; `characteristics_*` entries of the form `key: value` are
/// split into their own properties. Series annotations go on the matrix.
pub fn assemble(table: SeriesTable) -> Result<Matrix, MatrixError> {
    let SeriesTable {
        name,
        series,
        samples,
        sample_ids,
        row_ids,
        values,
    } = table;

    let n_samples = sample_ids.len();
    let mut columns: Vec<VectorHeader> = sample_ids.into_iter().map(VectorHeader::new).collect();

    for (key, per_sample) in samples {
        if per_sample.len() != n_samples {
            return Err(MatrixError::headers(
                Axis::Column,
                per_sample.len(),
                n_samples,
            ));
        }
        let is_characteristics = key.starts_with("characteristics");
        for (column, value) in columns.iter_mut().zip(per_sample) {
            if value.is_empty() {
                continue;
            }
            let split = if is_characteristics {
                value
                    .split_once(": ")
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            } else {
                None
            };
            match split {
                Some((k, v)) => append_property(&mut column.properties, &k, v),
                None => append_property(&mut column.properties, &key, value),
            }
        }
    }

    let rows: Vec<VectorHeader> = row_ids.into_iter().map(VectorHeader::new).collect();
    let grid = Array2::from_shape_vec((rows.len(), columns.len()), values)?;
    let mut matrix = Matrix::new(name, rows, columns, grid)?;

    let props = matrix.properties_mut();
    for (key, mut vals) in series {
        let value = if vals.len() == 1 {
            Value::String(vals.remove(0))
        } else {
            Value::from(vals)
        };
        props.set(key, value);
    }
    Ok(matrix)
}

/// Set `key`, turning it into a list when it is already present.
fn append_property(properties: &mut Properties, key: &str, value: String) {
    let merged = match properties.remove(key) {
        None => Value::String(value),
        Some(Value::Array(mut list)) => {
            list.push(Value::String(value));
            Value::Array(list)
        }
        Some(existing) => Value::Array(vec![existing, Value::String(value)]),
    };
    properties.set(key, merged);
}
