//! Typed parameter values.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use shellkit_core::ValueType;

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    BigInteger(BigInt),
    F32(f32),
    F64(f64),
    BigDecimal(BigDecimal),
    Bool(bool),
}

impl Value {
    /// Parses `raw` as `value_type`.
    ///
    /// Returns `None` when the text does not represent a value of that type,
    /// as decided by [`ValueType::accepts`].
    ///
    /// ```
    /// use shellkit_core::ValueType;
    /// use shellkit_engine::Value;
    ///
    /// assert_eq!(Value::parse("+42", ValueType::I32), Some(Value::I32(42)));
    /// assert_eq!(Value::parse("1.1", ValueType::I32), None);
    /// assert_eq!(Value::parse("300", ValueType::I8), None);
    /// assert_eq!(Value::parse("TRUE", ValueType::Bool), Some(Value::Bool(true)));
    /// assert_eq!(Value::parse("5.5", ValueType::BigDecimal).unwrap().to_string(), "5.5");
    /// assert_eq!(Value::parse("inf", ValueType::F64), None);
    /// ```
    pub fn parse(raw: &str, value_type: ValueType) -> Option<Self> {
        // The numeric crates are laxer than the accepted grammar.
        if !value_type.accepts(raw) {
            return None;
        }
        let value = match value_type {
            ValueType::Text => Self::Text(raw.to_string()),
            ValueType::I8 => Self::I8(raw.parse().ok()?),
            ValueType::I16 => Self::I16(raw.parse().ok()?),
            ValueType::I32 => Self::I32(raw.parse().ok()?),
            ValueType::I64 => Self::I64(raw.parse().ok()?),
            ValueType::BigInteger => Self::BigInteger(BigInt::from_str(raw).ok()?),
            ValueType::F32 => Self::F32(raw.parse().ok()?),
            ValueType::F64 => Self::F64(raw.parse().ok()?),
            ValueType::BigDecimal => Self::BigDecimal(BigDecimal::from_str(raw).ok()?),
            ValueType::Bool => Self::Bool(parse_bool(raw)?),
        };
        Some(value)
    }

    /// The type this value was coerced into.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::I8(_) => ValueType::I8,
            Self::I16(_) => ValueType::I16,
            Self::I32(_) => ValueType::I32,
            Self::I64(_) => ValueType::I64,
            Self::BigInteger(_) => ValueType::BigInteger,
            Self::F32(_) => ValueType::F32,
            Self::F64(_) => ValueType::F64,
            Self::BigDecimal(_) => ValueType::BigDecimal,
            Self::Bool(_) => ValueType::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Any fixed-width integer, or a big integer that fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I8(v) => Some(i64::from(*v)),
            Self::I16(v) => Some(i64::from(*v)),
            Self::I32(v) => Some(i64::from(*v)),
            Self::I64(v) => Some(*v),
            Self::BigInteger(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F32(v) => Some(f64::from(*v)),
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::BigInteger(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::BigDecimal(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

// Arbitrary-precision values serialize as strings to avoid lossy JSON numbers.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::I8(v) => serializer.serialize_i8(*v),
            Self::I16(v) => serializer.serialize_i16(*v),
            Self::I32(v) => serializer.serialize_i32(*v),
            Self::I64(v) => serializer.serialize_i64(*v),
            Self::F32(v) => serializer.serialize_f32(*v),
            Self::F64(v) => serializer.serialize_f64(*v),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::BigInteger(_) | Self::BigDecimal(_) => serializer.collect_str(self),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
