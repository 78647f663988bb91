//! Literal values carried by constants, raw fragments and bound parameters.

use crate::dialect::Dialect;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

/// A literal value.
///
/// The set is closed: anything that is not one of the scalar kinds below is
/// converted to [`Value::Other`], which renders as a quoted string. That
/// fallback never panics, but may not be valid SQL for exotic types.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    /// Exact decimal text, rendered unquoted.
    Numeric(String),
    /// Generic fallback, rendered as a quoted string.
    Other(String),
}

impl Value {
    /// Wrap any displayable value in the generic fallback.
    pub fn other(value: impl std::fmt::Display) -> Self {
        Value::Other(value.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The zero value of the field's type: `0`, `false` or an empty string.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(b) => !b,
            Value::Int(v) => *v == 0,
            Value::UInt(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Text(s) | Value::Other(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Numeric(s) => s.parse::<f64>().is_ok_and(|v| v == 0.0),
            Value::Null | Value::Timestamp(_) => false,
        }
    }

    /// The text payload, if this is a string value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render as a SQL literal: strings quoted and escaped, keywords translated.
    pub fn to_literal(&self, dialect: &Dialect) -> String {
        let mut out = String::new();
        self.write_literal(&mut out, dialect);
        out
    }

    /// Render verbatim: type-directed formatting, no quoting or escaping.
    pub fn to_raw(&self, dialect: &Dialect) -> String {
        let mut out = String::new();
        self.write_raw(&mut out, dialect);
        out
    }

    pub(crate) fn write_literal(&self, out: &mut String, dialect: &Dialect) {
        match self {
            Value::Text(s) | Value::Other(s) => dialect.write_string(out, s),
            Value::Bytes(b) => dialect.write_string(out, &String::from_utf8_lossy(b)),
            _ => self.write_raw(out, dialect),
        }
    }

    pub(crate) fn write_raw(&self, out: &mut String, dialect: &Dialect) {
        match self {
            Value::Null => out.push_str(dialect.keyword("NULL")),
            Value::Bool(true) => out.push_str(dialect.keyword("TRUE")),
            Value::Bool(false) => out.push_str(dialect.keyword("FALSE")),
            Value::Int(v) => out.push_str(&v.to_string()),
            Value::UInt(v) => out.push_str(&v.to_string()),
            Value::Float(v) => out.push_str(&format_float(*v)),
            Value::Text(s) | Value::Numeric(s) | Value::Other(s) => out.push_str(s),
            Value::Bytes(b) => out.push_str(&String::from_utf8_lossy(b)),
            Value::Timestamp(ts) => out.push_str(&dialect.format_timestamp(ts)),
        }
    }
}

// Debug formatting keeps a decimal point (`1.0`), so floats stay floats.
fn format_float(v: f64) -> String {
    if v.is_finite() {
        format!("{v:?}")
    } else {
        format!("'{v}'")
    }
}

/// Backslash-escape a string for use inside a MySQL single-quoted literal.
///
/// Covers NUL, both quote characters, backslash, backspace, newline,
/// carriage return, tab and Ctrl-Z.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    escape_into(&mut out, s);
    out
}

pub(crate) fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        let escaped = match ch {
            '\0' => '0',
            '\'' => '\'',
            '"' => '"',
            '\u{8}' => 'b',
            '\n' => 'n',
            '\r' => 'r',
            '\t' => 't',
            '\u{1a}' => 'Z',
            '\\' => '\\',
            _ => {
                out.push(ch);
                continue;
            }
        };
        out.push('\\');
        out.push(escaped);
    }
}

macro_rules! value_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! value_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::UInt(v as u64)
            }
        })*
    };
}

value_from_signed!(i8, i16, i32, i64, isize);
value_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Timestamp(v.and_time(chrono::NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::Timestamp(v.naive_utc())
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::Other(v.to_string())
    }
}

#[cfg(feature = "decimal")]
impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Numeric(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64().map(Value::Float).unwrap_or(Value::Other(n.to_string()))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Other(other.to_string()),
        }
    }
}
