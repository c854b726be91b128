use crate::{Error, Result, truncate_long};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::{any, borrow::Cow, mem};
use time::{Date, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed cell, the unit of every [`Row`](crate::Row).
///
/// Typed variants carry an `Option` so that a NULL can still remember its column type.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int64(Option<i64>),
    UInt64(Option<u64>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    Uuid(Option<Uuid>),
    List(Option<Vec<Value>>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null
            | Value::Boolean(None)
            | Value::Int64(None)
            | Value::UInt64(None)
            | Value::Float64(None)
            | Value::Decimal(None)
            | Value::Varchar(None)
            | Value::Blob(None)
            | Value::Date(None)
            | Value::Time(None)
            | Value::Timestamp(None)
            | Value::Uuid(None)
            | Value::List(None) => true,
            _ => false,
        }
    }

    pub fn same_type(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(Some(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Boolean(Some(v)) => Some(*v as i64),
            Value::Int64(Some(v)) => Some(*v),
            Value::UInt64(Some(v)) => i64::try_from(*v).ok(),
            Value::Decimal(Some(v)) if v.fract().is_zero() => v.to_i64(),
            Value::Varchar(Some(v)) => v.trim().parse().ok(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::UInt64(l), Self::UInt64(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l), Self::Decimal(r)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            (Self::List(l), Self::List(r)) => l == r,
            _ => self.is_null() && other.is_null(),
        }
    }
}

/// Conversion between native Rust types and [`Value`].
///
/// `try_from_value` accepts the canonical variant for the type and, for integers, any
/// other integer variant that fits. Drivers that only return text (MySQL's text
/// protocol, DuckDB's varchar fallback) are handled by parsing `Varchar` values.
pub trait AsValue {
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {} into {}",
        truncate_long!(format!("{:?}", value)),
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_integer {
    ($ty:ty, $variant:ident, $wide:ty) => {
        impl AsValue for $ty {
            fn as_empty_value() -> Value {
                Value::$variant(None)
            }
            fn as_value(self) -> Value {
                Value::$variant(Some(self as $wide))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted = match &value {
                    Value::Int64(Some(v)) => <$ty>::try_from(*v).ok(),
                    Value::UInt64(Some(v)) => <$ty>::try_from(*v).ok(),
                    Value::Boolean(Some(v)) => Some(*v as $ty),
                    Value::Decimal(Some(v)) if v.fract().is_zero() => {
                        v.to_i128().and_then(|v| <$ty>::try_from(v).ok())
                    }
                    Value::Varchar(Some(v)) => v.trim().parse::<$ty>().ok(),
                    _ => None,
                };
                converted.ok_or_else(|| mismatch::<$ty>(&value))
            }
        }
    };
}

impl_as_value_integer!(i8, Int64, i64);
impl_as_value_integer!(i16, Int64, i64);
impl_as_value_integer!(i32, Int64, i64);
impl_as_value_integer!(i64, Int64, i64);
impl_as_value_integer!(isize, Int64, i64);
impl_as_value_integer!(u8, UInt64, u64);
impl_as_value_integer!(u16, UInt64, u64);
impl_as_value_integer!(u32, UInt64, u64);
impl_as_value_integer!(u64, UInt64, u64);
impl_as_value_integer!(usize, UInt64, u64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Boolean(Some(v)) => Ok(*v),
            Value::Int64(Some(v)) => Ok(*v != 0),
            Value::UInt64(Some(v)) => Ok(*v != 0),
            Value::Varchar(Some(v)) => match v.as_str() {
                "1" | "true" | "TRUE" | "t" => Ok(true),
                "0" | "false" | "FALSE" | "f" => Ok(false),
                _ => Err(mismatch::<bool>(&value)),
            },
            _ => Err(mismatch::<bool>(&value)),
        }
    }
}

impl AsValue for f64 {
    fn as_empty_value() -> Value {
        Value::Float64(None)
    }
    fn as_value(self) -> Value {
        Value::Float64(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Float64(Some(v)) => Ok(*v),
            Value::Int64(Some(v)) => Ok(*v as f64),
            Value::UInt64(Some(v)) => Ok(*v as f64),
            Value::Decimal(Some(v)) => v.to_f64().ok_or_else(|| mismatch::<f64>(&value)),
            Value::Varchar(Some(v)) => v.trim().parse().map_err(|_| mismatch::<f64>(&value)),
            _ => Err(mismatch::<f64>(&value)),
        }
    }
}

impl AsValue for f32 {
    fn as_empty_value() -> Value {
        Value::Float64(None)
    }
    fn as_value(self) -> Value {
        Value::Float64(Some(self as f64))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        f64::try_from_value(value).map(|v| v as f32)
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match &value {
            Value::Decimal(Some(v)) => Ok(*v),
            Value::Int64(Some(v)) => Ok(Decimal::from(*v)),
            Value::UInt64(Some(v)) => Ok(Decimal::from(*v)),
            Value::Float64(Some(v)) => {
                Decimal::try_from(*v).map_err(|_| mismatch::<Decimal>(&value))
            }
            Value::Varchar(Some(v)) => v.trim().parse().map_err(|_| mismatch::<Decimal>(&value)),
            _ => Err(mismatch::<Decimal>(&value)),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .map_err(|e| Error::msg(format!("Blob is not valid UTF-8: {}", e))),
            value => Err(mismatch::<String>(&value)),
        }
    }
}

impl AsValue for Cow<'static, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            value => Err(mismatch::<Box<[u8]>>(&value)),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Box::<[u8]>::try_from_value(value).map(Into::into)
    }
}

macro_rules! impl_as_value_parsed {
    ($ty:ty, $variant:ident, $parse:expr) => {
        impl AsValue for $ty {
            fn as_empty_value() -> Value {
                Value::$variant(None)
            }
            fn as_value(self) -> Value {
                Value::$variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match &value {
                    Value::$variant(Some(v)) => Ok(v.clone()),
                    Value::Varchar(Some(v)) => {
                        let parse: fn(&str) -> Option<$ty> = $parse;
                        parse(v.trim()).ok_or_else(|| mismatch::<$ty>(&value))
                    }
                    _ => Err(mismatch::<$ty>(&value)),
                }
            }
        }
    };
}

impl_as_value_parsed!(Uuid, Uuid, |v| Uuid::parse_str(v).ok());
impl_as_value_parsed!(Date, Date, |v| {
    Date::parse(v, time::macros::format_description!("[year]-[month]-[day]")).ok()
});
impl_as_value_parsed!(Time, Time, |v| {
    Time::parse(
        v,
        time::macros::format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]"),
    )
    .ok()
});
impl_as_value_parsed!(PrimitiveDateTime, Timestamp, |v| {
    PrimitiveDateTime::parse(
        &v.replacen('T', " ", 1),
        time::macros::format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
        ),
    )
    .ok()
});

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}

impl AsValue for &'static str {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(mismatch::<&'static str>(&value))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}
