use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scalar that can be bound to a positional placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    Boolean(bool),
    Json(serde_json::Value),
    Uuid(Uuid),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Null,
}

impl Value {
    /// Plain textual form of the value, without SQL quoting.
    ///
    /// Used when a scalar has to become part of a `LIKE` pattern.
    pub fn as_text(&self) -> String {
        match self {
            Value::Int(v) => v.to_string(),
            Value::Uint(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Decimal(v) => v.to_string(),
            Value::String(v) => v.clone(),
            Value::Boolean(v) => v.to_string(),
            Value::Json(serde_json::Value::String(s)) => s.clone(),
            Value::Json(v) => v.to_string(),
            Value::Uuid(v) => v.to_string(),
            Value::Bytes(v) => String::from_utf8_lossy(v).into_owned(),
            Value::Date(v) => v.to_string(),
            Value::Timestamp(v) => v.to_rfc3339(),
            Value::Null => String::new(),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_scalar! {
    i64 => Int,
    i32 => Int,
    i16 => Int,
    u64 => Uint,
    u32 => Uint,
    f64 => Float,
    f32 => Float,
    BigDecimal => Decimal,
    String => String,
    &str => String,
    bool => Boolean,
    serde_json::Value => Json,
    Uuid => Uuid,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    DateTime<Utc> => Timestamp,
}
