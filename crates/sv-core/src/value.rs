//! Tagged cell values and column data types
//!
//! Every cell of a raw or sample table is a [`Value`]. Every column carries a
//! [`DataType`], and every non-null cell of that column has that type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column that holds the raw text of records that failed to parse.
pub const CORRUPT_RECORD_COLUMN: &str = "_corrupt_record";

/// Logical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// true / false
    Boolean,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Float,
    /// UTF-8 text
    Text,
    /// Raw text of a record that could not be parsed
    Corrupt,
}

impl DataType {
    /// Least common type able to hold values of both `self` and `other`.
    ///
    /// Integer widens to Float; every other mix falls back to Text.
    pub fn unify(self, other: DataType) -> DataType {
        match (self, other) {
            (a, b) if a == b => a,
            (DataType::Integer, DataType::Float) | (DataType::Float, DataType::Integer) => {
                DataType::Float
            }
            _ => DataType::Text,
        }
    }

    /// Fold `next` into an inferred type where `None` means "only nulls seen".
    pub fn unify_opt(acc: Option<DataType>, next: Option<DataType>) -> Option<DataType> {
        match (acc, next) {
            (None, n) => n,
            (a, None) => a,
            (Some(a), Some(b)) => Some(a.unify(b)),
        }
    }

    /// Infer the type of a raw text cell. Empty cells are null.
    pub fn infer_from_str(cell: &str) -> Option<DataType> {
        if cell.is_empty() {
            None
        } else if parse_bool(cell).is_some() {
            Some(DataType::Boolean)
        } else if cell.parse::<i64>().is_ok() {
            Some(DataType::Integer)
        } else if parse_float(cell).is_some() {
            Some(DataType::Float)
        } else {
            Some(DataType::Text)
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "boolean"),
            DataType::Integer => write!(f, "integer"),
            DataType::Float => write!(f, "float"),
            DataType::Text => write!(f, "text"),
            DataType::Corrupt => write!(f, "corrupt"),
        }
    }
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Missing value
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    /// Raw text of a record that failed to parse
    Corrupt(String),
}

impl Value {
    /// Returns true if this is a null cell
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Type of this value, `None` for null
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Integer(_) => Some(DataType::Integer),
            Value::Float(_) => Some(DataType::Float),
            Value::Text(_) => Some(DataType::Text),
            Value::Bool(_) => Some(DataType::Boolean),
            Value::Corrupt(_) => Some(DataType::Corrupt),
        }
    }

    /// Parse a raw text cell as a value of `ty`.
    ///
    /// Text columns keep the cell verbatim. Cells that cannot be read as the
    /// requested type become null.
    pub fn parse_as(cell: &str, ty: DataType) -> Value {
        if cell.is_empty() {
            return Value::Null;
        }
        match ty {
            DataType::Text => Value::Text(cell.to_string()),
            DataType::Corrupt => Value::Corrupt(cell.to_string()),
            DataType::Boolean => parse_bool(cell).map_or(Value::Null, Value::Bool),
            DataType::Integer => cell.parse::<i64>().map_or(Value::Null, Value::Integer),
            DataType::Float => parse_float(cell).map_or(Value::Null, Value::Float),
        }
    }

    /// Convert this value to a column of type `ty`.
    ///
    /// Integers widen to floats and any value renders to text. Conversions
    /// with no sensible result produce null.
    pub fn coerce(self, ty: DataType) -> Value {
        match (self, ty) {
            (Value::Null, _) => Value::Null,
            (Value::Integer(i), DataType::Integer) => Value::Integer(i),
            (Value::Integer(i), DataType::Float) => Value::Float(i as f64),
            (Value::Float(v), DataType::Float) => Value::Float(v),
            (Value::Bool(b), DataType::Boolean) => Value::Bool(b),
            (Value::Text(s), DataType::Corrupt) | (Value::Corrupt(s), DataType::Corrupt) => {
                Value::Corrupt(s)
            }
            (Value::Text(s), DataType::Text) | (Value::Corrupt(s), DataType::Text) => {
                Value::Text(s)
            }
            (other, DataType::Text) => Value::Text(other.to_string()),
            _ => Value::Null,
        }
    }

    /// Hashable key used for exact distinct counting, `None` for null.
    pub fn key(&self) -> Option<ValueKey<'_>> {
        match self {
            Value::Null => None,
            Value::Integer(i) => Some(ValueKey::Integer(*i)),
            Value::Float(v) => Some(ValueKey::Float(canonical_float_bits(*v))),
            Value::Bool(b) => Some(ValueKey::Bool(*b)),
            Value::Text(s) | Value::Corrupt(s) => Some(ValueKey::Text(s.as_str())),
        }
    }

    /// Append a stable, platform-independent encoding of this value.
    ///
    /// Used as hashing input, so the layout must never change between
    /// releases without also changing which rows a seed selects.
    pub fn encode_canonical(&self, out: &mut Vec<u8>) {
        match self {
            Value::Null => out.push(0),
            Value::Bool(b) => {
                out.push(1);
                out.push(u8::from(*b));
            }
            Value::Integer(i) => {
                out.push(2);
                out.extend_from_slice(&i.to_le_bytes());
            }
            Value::Float(v) => {
                out.push(3);
                out.extend_from_slice(&canonical_float_bits(*v).to_le_bytes());
            }
            Value::Text(s) => {
                out.push(4);
                encode_str(s, out);
            }
            Value::Corrupt(s) => {
                out.push(5);
                encode_str(s, out);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Text(s) | Value::Corrupt(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Borrowed, hashable view of a non-null value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Bool(bool),
    Integer(i64),
    /// Bit pattern with -0.0 folded into 0.0 and a single NaN
    Float(u64),
    Text(&'a str),
}

fn encode_str(s: &str, out: &mut Vec<u8>) {
    out.extend_from_slice(&(s.len() as u64).to_le_bytes());
    out.extend_from_slice(s.as_bytes());
}

fn canonical_float_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Floats must contain at least one digit, so `inf` and `NaN` stay text.
fn parse_float(cell: &str) -> Option<f64> {
    if !cell.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    cell.parse::<f64>().ok()
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
