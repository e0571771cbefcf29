//! Driver adapters
//!
//! An adapter binds comparable values back into the form a specific driver
//! expects when writing. Adapters are registered once at startup and checked
//! for availability at registration.

use dbassert_core::{DataType, TypeConversionError, Value};

/// Driver-specific value binding
pub trait DriverAdapter: std::fmt::Debug + Send + Sync {
    /// Adapter name used in errors and logs
    fn name(&self) -> &'static str;

    /// Check if this adapter binds values of a data type
    fn supports(&self, data_type: DataType) -> bool;

    /// Verify the adapter can be used, describing the problem when not
    fn check_available(&self) -> Result<(), String>;

    /// Bind an already converted value
    fn bind(&self, data_type: DataType, value: &Value) -> Result<Value, TypeConversionError>;
}

/// PostgreSQL object binding for UUID and CITEXT columns
///
/// Both are written as typed text objects, so the bound value is the
/// canonical text form.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgObjectAdapter;

impl DriverAdapter for PgObjectAdapter {
    fn name(&self) -> &'static str {
        "pg-object"
    }

    fn supports(&self, data_type: DataType) -> bool {
        matches!(data_type, DataType::Uuid | DataType::Citext)
    }

    fn check_available(&self) -> Result<(), String> {
        Ok(())
    }

    fn bind(&self, data_type: DataType, value: &Value) -> Result<Value, TypeConversionError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Uuid(uuid) => Ok(Value::String(uuid.hyphenated().to_string())),
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(TypeConversionError::new(
                other,
                data_type.name(),
                "not bindable as a PostgreSQL object",
            )),
        }
    }
}
