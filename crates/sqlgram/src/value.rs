//! Runtime values accepted by the builder.
//!
//! [`Value`] is a closed sum type: every variant has a literal rendering in
//! [`crate::grammar`], so the value compiler is an exhaustive `match` instead
//! of a chain of runtime type checks.

use crate::builder::Builder;
use crate::error::{SqlError, SqlResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::Serialize;

/// A value that can appear on the right-hand side of a condition, in an
/// `INSERT` row or in an `UPDATE ... SET`.
#[derive(Debug, Clone)]
pub enum Value {
    /// Quoted string literal. A leading `:` marks a named placeholder that is
    /// emitted verbatim.
    String(String),
    Int(i64),
    /// Rendered with at most 5 fractional digits, trailing zeros stripped.
    Float(f64),
    /// Rendered as `1` / `0`.
    Bool(bool),
    Null,
    /// Parenthesized, comma-joined list (for `IN (...)`).
    List(Vec<Value>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Column reference, compiled as a system identifier.
    Column(String),
    /// Parenthesized sub-query.
    SubQuery(Box<Builder>),
    /// JSON document, emitted as a quoted string.
    Json(serde_json::Value),
    /// Raw SQL expression, emitted verbatim.
    Raw(String),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
}

impl Value {
    /// Reference a column instead of a literal.
    pub fn column(name: impl Into<String>) -> Self {
        Value::Column(name.into())
    }

    /// Embed a raw SQL expression (e.g. `NOW()`).
    ///
    /// # Safety
    /// The text is not escaped. Never pass user input.
    pub fn raw(sql: impl Into<String>) -> Self {
        Value::Raw(sql.into())
    }

    /// Embed a sub-query.
    pub fn sub(query: Builder) -> Self {
        Value::SubQuery(Box::new(query))
    }

    /// Serialize any `serde` value to a JSON literal.
    ///
    /// Fails when serialization fails or yields JSON `null`.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> SqlResult<Self> {
        let json = serde_json::to_value(value)?;
        if json.is_null() {
            return Err(SqlError::unsupported_value(
                "JSON encoder produced null",
            ));
        }
        Ok(Value::Json(json))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::List(_) => "list",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Column(_) => "column",
            Value::SubQuery(_) => "sub-query",
            Value::Json(_) => "json",
            Value::Raw(_) => "raw",
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(_) => "decimal",
        }
    }
}

impl PartialEq for Value {
    /// Sub-queries compare by identity; everything else by content.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Column(a), Value::Column(b)) => a == b,
            (Value::SubQuery(a), Value::SubQuery(b)) => std::ptr::eq(&**a, &**b),
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Raw(a), Value::Raw(b)) => a == b,
            #[cfg(feature = "rust_decimal")]
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
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
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::DateTime(v.naive_utc())
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::String(v.to_string())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<Builder> for Value {
    fn from(v: Builder) -> Self {
        Value::SubQuery(Box::new(v))
    }
}

#[cfg(feature = "rust_decimal")]
impl From<rust_decimal::Decimal> for Value {
    fn from(v: rust_decimal::Decimal) -> Self {
        Value::Decimal(v)
    }
}
