//! Canonical type system
//!
//! Maps vendor-reported column types to a small set of canonical data types
//! that know how to coerce raw values into a comparable form.

use crate::error::TypeConversionError;
use crate::sql_types;
use crate::value::Value;
use base64::Engine as _;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use uuid::Uuid;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const TIMESTAMP_TZ_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

/// Value domain shared by several data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Text,
    ExactNumeric,
    Integer,
    Floating,
    Boolean,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Binary,
    Uuid,
    Unknown,
}

/// Canonical data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Unknown,
    Char,
    Varchar,
    LongVarchar,
    NChar,
    NVarchar,
    LongNVarchar,
    Clob,
    NClob,
    /// PostgreSQL case-insensitive text
    Citext,
    Numeric,
    Decimal,
    Boolean,
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Date,
    Time,
    Timestamp,
    TimestampWithTimeZone,
    Binary,
    VarBinary,
    LongVarBinary,
    Blob,
    Uuid,
}

impl DataType {
    /// Map a standard SQL type code to its data type
    ///
    /// Returns `None` for OTHER and for codes outside the standard set;
    /// vendor-specific codes are resolved by vendor profiles.
    pub fn for_sql_type(sql_type: i32) -> Option<Self> {
        let data_type = match sql_type {
            sql_types::CHAR => Self::Char,
            sql_types::VARCHAR => Self::Varchar,
            sql_types::LONGVARCHAR => Self::LongVarchar,
            sql_types::NCHAR => Self::NChar,
            sql_types::NVARCHAR => Self::NVarchar,
            sql_types::LONGNVARCHAR => Self::LongNVarchar,
            sql_types::CLOB => Self::Clob,
            sql_types::NCLOB => Self::NClob,
            sql_types::NUMERIC => Self::Numeric,
            sql_types::DECIMAL => Self::Decimal,
            sql_types::BOOLEAN => Self::Boolean,
            sql_types::BIT => Self::Bit,
            sql_types::TINYINT => Self::TinyInt,
            sql_types::SMALLINT => Self::SmallInt,
            sql_types::INTEGER => Self::Integer,
            sql_types::BIGINT => Self::BigInt,
            sql_types::REAL => Self::Real,
            sql_types::FLOAT => Self::Float,
            sql_types::DOUBLE => Self::Double,
            sql_types::DATE => Self::Date,
            sql_types::TIME => Self::Time,
            sql_types::TIMESTAMP => Self::Timestamp,
            sql_types::TIMESTAMP_WITH_TIMEZONE => Self::TimestampWithTimeZone,
            sql_types::BINARY => Self::Binary,
            sql_types::VARBINARY => Self::VarBinary,
            sql_types::LONGVARBINARY => Self::LongVarBinary,
            sql_types::BLOB => Self::Blob,
            _ => return None,
        };
        Some(data_type)
    }

    /// Standard SQL type code
    pub fn sql_type(&self) -> i32 {
        match self {
            Self::Unknown | Self::Citext | Self::Uuid => sql_types::OTHER,
            Self::Char => sql_types::CHAR,
            Self::Varchar => sql_types::VARCHAR,
            Self::LongVarchar => sql_types::LONGVARCHAR,
            Self::NChar => sql_types::NCHAR,
            Self::NVarchar => sql_types::NVARCHAR,
            Self::LongNVarchar => sql_types::LONGNVARCHAR,
            Self::Clob => sql_types::CLOB,
            Self::NClob => sql_types::NCLOB,
            Self::Numeric => sql_types::NUMERIC,
            Self::Decimal => sql_types::DECIMAL,
            Self::Boolean => sql_types::BOOLEAN,
            Self::Bit => sql_types::BIT,
            Self::TinyInt => sql_types::TINYINT,
            Self::SmallInt => sql_types::SMALLINT,
            Self::Integer => sql_types::INTEGER,
            Self::BigInt => sql_types::BIGINT,
            Self::Real => sql_types::REAL,
            Self::Float => sql_types::FLOAT,
            Self::Double => sql_types::DOUBLE,
            Self::Date => sql_types::DATE,
            Self::Time => sql_types::TIME,
            Self::Timestamp => sql_types::TIMESTAMP,
            Self::TimestampWithTimeZone => sql_types::TIMESTAMP_WITH_TIMEZONE,
            Self::Binary => sql_types::BINARY,
            Self::VarBinary => sql_types::VARBINARY,
            Self::LongVarBinary => sql_types::LONGVARBINARY,
            Self::Blob => sql_types::BLOB,
        }
    }

    /// Stable upper-case name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::LongVarchar => "LONGVARCHAR",
            Self::NChar => "NCHAR",
            Self::NVarchar => "NVARCHAR",
            Self::LongNVarchar => "LONGNVARCHAR",
            Self::Clob => "CLOB",
            Self::NClob => "NCLOB",
            Self::Citext => "CITEXT",
            Self::Numeric => "NUMERIC",
            Self::Decimal => "DECIMAL",
            Self::Boolean => "BOOLEAN",
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Timestamp => "TIMESTAMP",
            Self::TimestampWithTimeZone => "TIMESTAMP_WITH_TIMEZONE",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::LongVarBinary => "LONGVARBINARY",
            Self::Blob => "BLOB",
            Self::Uuid => "UUID",
        }
    }

    /// Value domain of this type
    pub fn family(&self) -> TypeFamily {
        match self {
            Self::Char
            | Self::Varchar
            | Self::LongVarchar
            | Self::NChar
            | Self::NVarchar
            | Self::LongNVarchar
            | Self::Clob
            | Self::NClob
            | Self::Citext => TypeFamily::Text,
            Self::Numeric | Self::Decimal => TypeFamily::ExactNumeric,
            Self::TinyInt | Self::SmallInt | Self::Integer | Self::BigInt => TypeFamily::Integer,
            Self::Real | Self::Float | Self::Double => TypeFamily::Floating,
            Self::Boolean | Self::Bit => TypeFamily::Boolean,
            Self::Date => TypeFamily::Date,
            Self::Time => TypeFamily::Time,
            Self::Timestamp => TypeFamily::Timestamp,
            Self::TimestampWithTimeZone => TypeFamily::TimestampTz,
            Self::Binary | Self::VarBinary | Self::LongVarBinary | Self::Blob => TypeFamily::Binary,
            Self::Uuid => TypeFamily::Uuid,
            Self::Unknown => TypeFamily::Unknown,
        }
    }

    /// Whether two equal values may differ in formatting
    ///
    /// Blank-padded character types ignore trailing blanks; CITEXT ignores case.
    pub fn is_format_insensitive(&self) -> bool {
        matches!(self, Self::Char | Self::NChar | Self::Citext)
    }

    /// Whether numeric tolerances may apply to this type
    pub fn accepts_tolerance(&self) -> bool {
        matches!(self, Self::Numeric | Self::Decimal)
    }

    /// Coerce a raw value into this type's comparable form
    pub fn convert(&self, value: &Value) -> Result<Value, TypeConversionError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match self.family() {
            TypeFamily::Unknown => Ok(value.clone()),
            TypeFamily::Text => Ok(match value {
                Value::String(s) => Value::String(s.clone()),
                other => Value::String(other.to_string()),
            }),
            TypeFamily::ExactNumeric => to_exact_value(value, self.name()),
            TypeFamily::Integer => self.to_integer(value).map(Value::Int),
            TypeFamily::Floating => self.to_float(value).map(Value::Float),
            TypeFamily::Boolean => self.to_bool(value).map(Value::Bool),
            TypeFamily::Date => self.to_date(value).map(Value::Date),
            TypeFamily::Time => self.to_time(value).map(Value::Time),
            TypeFamily::Timestamp => self.to_timestamp(value).map(Value::Timestamp),
            TypeFamily::TimestampTz => self.to_timestamp_tz(value).map(Value::TimestampTz),
            TypeFamily::Binary => self.to_bytes(value).map(Value::Bytes),
            TypeFamily::Uuid => self.to_uuid(value).map(Value::Uuid),
        }
    }

    /// Convert and apply format normalization
    pub fn normalize(&self, value: &Value) -> Result<Value, TypeConversionError> {
        let converted = self.convert(value)?;
        if !self.is_format_insensitive() {
            return Ok(converted);
        }
        Ok(match converted {
            Value::String(s) if *self == Self::Citext => Value::String(s.to_lowercase()),
            Value::String(s) => Value::String(s.trim_end_matches(' ').to_string()),
            other => other,
        })
    }

    /// Compare two values in this type's domain
    ///
    /// UNKNOWN orders raw values. Exact numerics are compared without
    /// rounding, whatever their precision.
    pub fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, TypeConversionError> {
        match self.family() {
            TypeFamily::Unknown => Ok(left.total_cmp(right)),
            TypeFamily::ExactNumeric => Ok(to_exact(left, self.name())?.cmp(&to_exact(right, self.name())?)),
            _ => Ok(self.normalize(left)?.total_cmp(&self.normalize(right)?)),
        }
    }

    fn error(&self, value: &Value, reason: impl Into<String>) -> TypeConversionError {
        TypeConversionError::new(value, self.name(), reason)
    }

    fn to_integer(self, value: &Value) -> Result<i64, TypeConversionError> {
        match value {
            Value::Int(i) => Ok(*i),
            Value::Bool(b) => Ok(i64::from(*b)),
            other => to_decimal(other, self.name())?
                .trunc()
                .to_i64()
                .ok_or_else(|| self.error(other, "out of range")),
        }
    }

    fn to_float(self, value: &Value) -> Result<f64, TypeConversionError> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Decimal(d) => d.to_f64().ok_or_else(|| self.error(value, "out of range")),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| self.error(value, e.to_string())),
            other => Err(self.error(other, "not a number")),
        }
    }

    fn to_bool(self, value: &Value) -> Result<bool, TypeConversionError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::Decimal(d) => Ok(!d.is_zero()),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => Ok(true),
                "false" | "f" | "no" | "n" | "0" => Ok(false),
                _ => Err(self.error(value, "not a boolean literal")),
            },
            other => Err(self.error(other, "not a boolean")),
        }
    }

    fn to_date(self, value: &Value) -> Result<NaiveDate, TypeConversionError> {
        match value {
            Value::Date(d) => Ok(*d),
            Value::Timestamp(ts) => Ok(ts.date()),
            Value::TimestampTz(ts) => Ok(ts.date_naive()),
            Value::Int(millis) => from_epoch_millis(*millis)
                .map(|ts| ts.date())
                .ok_or_else(|| self.error(value, "epoch millis out of range")),
            Value::String(s) => {
                let s = s.trim();
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
                    .ok_or_else(|| self.error(value, "expected yyyy-mm-dd"))
            }
            other => Err(self.error(other, "not a date")),
        }
    }

    fn to_time(self, value: &Value) -> Result<NaiveTime, TypeConversionError> {
        match value {
            Value::Time(t) => Ok(*t),
            Value::Timestamp(ts) => Ok(ts.time()),
            Value::TimestampTz(ts) => Ok(ts.time()),
            Value::String(s) => {
                let s = s.trim();
                NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                    .map_err(|_| self.error(value, "expected hh:mm:ss"))
            }
            other => Err(self.error(other, "not a time")),
        }
    }

    fn to_timestamp(self, value: &Value) -> Result<NaiveDateTime, TypeConversionError> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            Value::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
            Value::TimestampTz(ts) => Ok(ts.naive_utc()),
            Value::Int(millis) => {
                from_epoch_millis(*millis).ok_or_else(|| self.error(value, "epoch millis out of range"))
            }
            Value::String(s) => {
                parse_timestamp(s.trim()).ok_or_else(|| self.error(value, "expected yyyy-mm-dd hh:mm:ss"))
            }
            other => Err(self.error(other, "not a timestamp")),
        }
    }

    fn to_timestamp_tz(self, value: &Value) -> Result<DateTime<FixedOffset>, TypeConversionError> {
        match value {
            Value::TimestampTz(ts) => Ok(*ts),
            Value::Timestamp(ts) => Ok(ts.and_utc().fixed_offset()),
            Value::Date(d) => Ok(d.and_time(NaiveTime::MIN).and_utc().fixed_offset()),
            Value::Int(millis) => from_epoch_millis(*millis)
                .map(|ts| ts.and_utc().fixed_offset())
                .ok_or_else(|| self.error(value, "epoch millis out of range")),
            Value::String(s) => {
                let s = s.trim();
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .or_else(|| {
                        TIMESTAMP_TZ_FORMATS
                            .iter()
                            .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
                    })
                    .or_else(|| parse_timestamp(s).map(|ts| ts.and_utc().fixed_offset()))
                    .ok_or_else(|| self.error(value, "expected timestamp with offset"))
            }
            other => Err(self.error(other, "not a timestamp")),
        }
    }

    fn to_bytes(self, value: &Value) -> Result<Vec<u8>, TypeConversionError> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            Value::String(s) => base64::engine::general_purpose::STANDARD
                .decode(s.trim())
                .map_err(|e| self.error(value, format!("invalid base64: {}", e))),
            other => Err(self.error(other, "not binary data")),
        }
    }

    fn to_uuid(self, value: &Value) -> Result<Uuid, TypeConversionError> {
        match value {
            Value::Uuid(u) => Ok(*u),
            Value::String(s) => Uuid::parse_str(s.trim()).map_err(|e| self.error(value, e.to_string())),
            Value::Bytes(b) => Uuid::from_slice(b).map_err(|e| self.error(value, e.to_string())),
            other => Err(self.error(other, "not a uuid")),
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Logical type attached to a column
///
/// Either a plain data type or a numeric type that tolerates an absolute
/// difference of `delta` between compared values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// Plain data type
    Plain(DataType),

    /// Numeric type with a tolerated delta
    TolerantNumeric {
        /// Underlying numeric type
        base: DataType,

        /// Largest absolute difference still considered equal
        delta: Decimal,
    },
}

impl LogicalType {
    /// The UNKNOWN type
    pub const UNKNOWN: LogicalType = LogicalType::Plain(DataType::Unknown);

    /// Create a tolerant numeric type
    pub fn tolerant(base: DataType, delta: Decimal) -> Self {
        Self::TolerantNumeric { base, delta }
    }

    /// Underlying data type
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Plain(data_type) => *data_type,
            Self::TolerantNumeric { base, .. } => *base,
        }
    }

    /// Registered tolerance, if any
    pub fn delta(&self) -> Option<Decimal> {
        match self {
            Self::Plain(_) => None,
            Self::TolerantNumeric { delta, .. } => Some(*delta),
        }
    }

    /// Check if this is the UNKNOWN type
    pub fn is_unknown(&self) -> bool {
        self.data_type() == DataType::Unknown
    }

    /// Type name as shown in reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain(data_type) => data_type.name(),
            Self::TolerantNumeric { .. } => "NUMERIC_WITH_TOLERATED_DELTA",
        }
    }

    /// Coerce a raw value into the comparable form
    pub fn convert(&self, value: &Value) -> Result<Value, TypeConversionError> {
        match self {
            Self::Plain(data_type) => data_type.convert(value),
            Self::TolerantNumeric { .. } if value.is_null() => Ok(Value::Null),
            Self::TolerantNumeric { .. } => to_exact_value(value, self.name()),
        }
    }

    /// Order two values in this type's domain
    pub fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, TypeConversionError> {
        match self {
            Self::Plain(data_type) => data_type.compare(left, right),
            Self::TolerantNumeric { .. } => {
                if self.matches(left, right)? {
                    return Ok(Ordering::Equal);
                }
                Ok(to_exact(left, self.name())?.cmp(&to_exact(right, self.name())?))
            }
        }
    }

    /// Check whether an expected and an actual value are equal
    ///
    /// NULL only matches NULL. UNKNOWN compares raw values without coercion.
    pub fn matches(&self, expected: &Value, actual: &Value) -> Result<bool, TypeConversionError> {
        if expected.is_null() || actual.is_null() {
            return Ok(expected.is_null() && actual.is_null());
        }

        match self {
            Self::Plain(DataType::Unknown) => Ok(expected == actual),
            Self::Plain(data_type) => Ok(data_type.compare(expected, actual)? == Ordering::Equal),
            Self::TolerantNumeric { delta, .. } => {
                let expected = to_exact(expected, self.name())?;
                let actual = to_exact(actual, self.name())?;
                Ok((expected - actual).abs() <= decimal_to_exact(*delta))
            }
        }
    }
}

impl From<DataType> for LogicalType {
    fn from(data_type: DataType) -> Self {
        Self::Plain(data_type)
    }
}

impl Default for LogicalType {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(data_type) => write!(f, "{}", data_type),
            Self::TolerantNumeric { base, delta } => write!(f, "{} (±{})", base, delta),
        }
    }
}

fn to_decimal(value: &Value, target: &str) -> Result<Decimal, TypeConversionError> {
    match value {
        Value::Decimal(d) => Ok(*d),
        Value::Int(i) => Ok(Decimal::from(*i)),
        Value::Bool(b) => Ok(if *b { Decimal::ONE } else { Decimal::ZERO }),
        Value::Float(f) => {
            Decimal::try_from(*f).map_err(|e| TypeConversionError::new(value, target, e.to_string()))
        }
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str_exact(s)
                .or_else(|_| Decimal::from_scientific(s))
                .map_err(|_| TypeConversionError::new(value, target, "not a number"))
        }
        other => Err(TypeConversionError::new(other, target, "not a number")),
    }
}

/// Parse an exact numeric without rounding
fn to_exact(value: &Value, target: &str) -> Result<BigDecimal, TypeConversionError> {
    let text = match value {
        Value::Int(i) => return Ok(BigDecimal::from(*i)),
        Value::Bool(b) => return Ok(BigDecimal::from(i64::from(*b))),
        Value::Decimal(d) => return Ok(decimal_to_exact(*d)),
        Value::Float(f) if f.is_finite() => f.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(TypeConversionError::new(other, target, "not a number")),
    };
    BigDecimal::from_str(&text).map_err(|_| TypeConversionError::new(value, target, "not a number"))
}

fn decimal_to_exact(d: Decimal) -> BigDecimal {
    BigDecimal::new(d.mantissa().into(), i64::from(d.scale()))
}

/// Comparable form of an exact numeric
///
/// Values that fit `Decimal` without rounding become `Value::Decimal`; wider
/// ones are kept as their normalized decimal text.
fn to_exact_value(value: &Value, target: &str) -> Result<Value, TypeConversionError> {
    to_decimal(value, target).map(Value::Decimal).or_else(|err| {
        to_exact(value, target)
            .map(|exact| Value::String(exact.normalized().to_string()))
            .map_err(|_| err)
    })
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn from_epoch_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|ts| ts.naive_utc())
}
