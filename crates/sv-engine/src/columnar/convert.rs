//! Table <-> Arrow conversion

use super::TYPE_METADATA_KEY;
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType as ArrowType, Field as ArrowField, Float64Type, Int64Type, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::sync::Arc;
use sv_core::{DataType, Field, Table, Value};

/// Arrow schema for a table schema. Every column is nullable.
pub fn to_arrow_schema(fields: &[Field]) -> Schema {
    Schema::new(
        fields
            .iter()
            .map(|field| {
                let arrow_field = ArrowField::new(&field.name, arrow_type(field.data_type), true);
                if field.data_type == DataType::Corrupt {
                    arrow_field.with_metadata(HashMap::from([(
                        TYPE_METADATA_KEY.to_string(),
                        DataType::Corrupt.to_string(),
                    )]))
                } else {
                    arrow_field
                }
            })
            .collect::<Vec<_>>(),
    )
}

fn arrow_type(ty: DataType) -> ArrowType {
    match ty {
        DataType::Boolean => ArrowType::Boolean,
        DataType::Integer => ArrowType::Int64,
        DataType::Float => ArrowType::Float64,
        DataType::Text | DataType::Corrupt => ArrowType::Utf8,
    }
}

/// Column-major copy of a table
pub fn to_record_batch(table: &Table) -> Result<RecordBatch, ArrowError> {
    let schema = Arc::new(to_arrow_schema(table.fields()));
    let columns: Vec<ArrayRef> = table
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| build_array(table, idx, field.data_type))
        .collect();
    RecordBatch::try_new(schema, columns)
}

fn build_array(table: &Table, idx: usize, ty: DataType) -> ArrayRef {
    let cells = table.column(idx);
    match ty {
        DataType::Boolean => Arc::new(
            cells
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        DataType::Integer => Arc::new(
            cells
                .map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Int64Array>(),
        ),
        DataType::Float => Arc::new(
            cells
                .map(|v| match v {
                    Value::Float(f) => Some(*f),
                    _ => None,
                })
                .collect::<Float64Array>(),
        ),
        DataType::Text | DataType::Corrupt => Arc::new(
            cells
                .map(|v| match v {
                    Value::Text(s) | Value::Corrupt(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect::<StringArray>(),
        ),
    }
}

/// Table schema for an Arrow schema
pub fn from_arrow_schema(schema: &Schema) -> Result<Vec<Field>, ArrowError> {
    schema
        .fields()
        .iter()
        .map(|field| {
            let corrupt = field
                .metadata()
                .get(TYPE_METADATA_KEY)
                .is_some_and(|t| t == "corrupt");
            let ty = match field.data_type() {
                ArrowType::Boolean => DataType::Boolean,
                ArrowType::Int64 => DataType::Integer,
                ArrowType::Float64 => DataType::Float,
                ArrowType::Utf8 | ArrowType::LargeUtf8 if corrupt => DataType::Corrupt,
                ArrowType::Utf8 | ArrowType::LargeUtf8 => DataType::Text,
                other => {
                    return Err(ArrowError::SchemaError(format!(
                        "column '{}' has unsupported type {}",
                        field.name(),
                        other
                    )))
                }
            };
            Ok(Field::new(field.name().as_str(), ty))
        })
        .collect()
}

/// Append the rows of a record batch to `rows`
pub fn from_record_batch(
    batch: &RecordBatch,
    fields: &[Field],
    rows: &mut Vec<Vec<Value>>,
) -> Result<(), ArrowError> {
    let start = rows.len();
    rows.extend((0..batch.num_rows()).map(|_| Vec::with_capacity(fields.len())));
    let target = &mut rows[start..];

    for (column, field) in batch.columns().iter().zip(fields) {
        let cell = |row: usize| -> Result<Value, ArrowError> {
            if column.is_null(row) {
                return Ok(Value::Null);
            }
            let mismatch = || {
                ArrowError::CastError(format!(
                    "column '{}' is not {}",
                    field.name, field.data_type
                ))
            };
            Ok(match field.data_type {
                DataType::Boolean => {
                    Value::Bool(column.as_boolean_opt().ok_or_else(mismatch)?.value(row))
                }
                DataType::Integer => Value::Integer(
                    column
                        .as_primitive_opt::<Int64Type>()
                        .ok_or_else(mismatch)?
                        .value(row),
                ),
                DataType::Float => Value::Float(
                    column
                        .as_primitive_opt::<Float64Type>()
                        .ok_or_else(mismatch)?
                        .value(row),
                ),
                DataType::Text | DataType::Corrupt => {
                    let text = string_at(column.as_ref(), row).ok_or_else(mismatch)?;
                    if field.data_type == DataType::Corrupt {
                        Value::Corrupt(text)
                    } else {
                        Value::Text(text)
                    }
                }
            })
        };

        for (row, out) in target.iter_mut().enumerate() {
            out.push(cell(row)?);
        }
    }
    Ok(())
}

fn string_at(column: &dyn Array, row: usize) -> Option<String> {
    if let Some(array) = column.as_string_opt::<i32>() {
        Some(array.value(row).to_string())
    } else {
        column
            .as_string_opt::<i64>()
            .map(|array| array.value(row).to_string())
    }
}

#[cfg(test)]
#[path = "convert_test.rs"]
mod tests;
