//! Type registry
//!
//! Resolves driver type information to logical types, applies registered
//! numeric tolerances and routes conversion and binding. A registry is built
//! once with `&mut self` and then shared read-only, usually as
//! `Arc<TypeRegistry>`.

use crate::adapter::DriverAdapter;
use crate::error::ConfigurationError;
use crate::profile::{DefaultProfile, VendorProfile};
use crate::tolerance::ToleranceTable;
use crate::vendor;
use dbassert_core::{AssertionConfig, DataType, LogicalType, TypeConversionError, Value};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Maps type codes to logical types
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Vendor profile consulted before the generic fallback
    vendor: Option<Box<dyn VendorProfile>>,

    fallback: DefaultProfile,

    tolerances: ToleranceTable,

    adapters: Vec<Arc<dyn DriverAdapter>>,
}

impl TypeRegistry {
    /// Create a registry with the generic profile only
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry for a vendor profile
    pub fn with_vendor(profile: impl VendorProfile + 'static) -> Self {
        Self {
            vendor: Some(Box::new(profile)),
            ..Self::default()
        }
    }

    /// Create a registry for a database product name
    pub fn for_product(product: &str) -> Self {
        let profile = vendor::profile_for_product(product);
        Self {
            vendor: Some(profile),
            ..Self::default()
        }
    }

    /// Build a registry from the configuration file model
    pub fn from_config(config: &AssertionConfig) -> Result<Self, ConfigurationError> {
        let mut registry = Self {
            vendor: Some(vendor::profile_for_kind(config.vendor)),
            ..Self::default()
        };
        for tolerance in &config.tolerances {
            registry.add_tolerance(&tolerance.table, &tolerance.column, tolerance.delta)?;
        }
        Ok(registry)
    }

    /// Name of the active vendor profile
    pub fn vendor_name(&self) -> &'static str {
        match &self.vendor {
            Some(profile) => profile.name(),
            None => self.fallback.name(),
        }
    }

    /// Registered tolerances
    pub fn tolerances(&self) -> &ToleranceTable {
        &self.tolerances
    }

    /// Register a numeric tolerance
    pub fn add_tolerance(
        &mut self,
        table_pattern: impl Into<String>,
        column: impl Into<String>,
        delta: Decimal,
    ) -> Result<(), ConfigurationError> {
        self.tolerances.add_tolerance(table_pattern, column, delta)
    }

    /// Register a driver adapter after checking it is usable
    pub fn register_adapter(&mut self, adapter: Arc<dyn DriverAdapter>) -> Result<(), ConfigurationError> {
        adapter
            .check_available()
            .map_err(|reason| ConfigurationError::AdapterUnavailable {
                adapter: adapter.name().to_string(),
                reason,
            })?;

        tracing::debug!(adapter = adapter.name(), "registered driver adapter");
        self.adapters.push(adapter);
        Ok(())
    }

    /// Resolve a type code and name
    ///
    /// Never fails: codes no profile recognizes resolve to UNKNOWN.
    pub fn resolve(&self, sql_type: i32, sql_type_name: &str) -> LogicalType {
        let vendor_match = self
            .vendor
            .as_ref()
            .and_then(|profile| profile.lookup(sql_type, sql_type_name));

        match vendor_match.or_else(|| self.fallback.lookup(sql_type, sql_type_name)) {
            Some(data_type) => {
                tracing::trace!(sql_type, sql_type_name, resolved = data_type.name(), "resolved type");
                LogicalType::Plain(data_type)
            }
            None => {
                tracing::debug!(
                    sql_type,
                    sql_type_name,
                    vendor = self.vendor_name(),
                    "unrecognized type, using UNKNOWN"
                );
                LogicalType::UNKNOWN
            }
        }
    }

    /// Resolve a column's type, applying any registered tolerance
    pub fn resolve_for_column(
        &self,
        sql_type: i32,
        sql_type_name: &str,
        table: &str,
        column: &str,
    ) -> LogicalType {
        self.with_tolerance(table, column, self.resolve(sql_type, sql_type_name))
    }

    /// Apply a registered tolerance to an already resolved type
    ///
    /// Only NUMERIC and DECIMAL types are affected.
    pub fn with_tolerance(&self, table: &str, column: &str, logical_type: LogicalType) -> LogicalType {
        let LogicalType::Plain(data_type) = logical_type else {
            return logical_type;
        };
        if !data_type.accepts_tolerance() {
            return logical_type;
        }

        match self.tolerances.find_tolerance(table, column) {
            Some(delta) => {
                tracing::trace!(table, column, %delta, "applying tolerated delta");
                LogicalType::tolerant(data_type, delta)
            }
            None => logical_type,
        }
    }

    /// Convert a raw value into its comparable form
    pub fn convert(&self, logical_type: LogicalType, value: &Value) -> Result<Value, TypeConversionError> {
        logical_type.convert(value)
    }

    /// Convert a value for writing, through a driver adapter when one binds the type
    pub fn bind_value(&self, logical_type: LogicalType, value: &Value) -> Result<Value, TypeConversionError> {
        let converted = logical_type.convert(value)?;
        match self.adapter_for(logical_type.data_type()) {
            Some(adapter) => adapter.bind(logical_type.data_type(), &converted),
            None => Ok(converted),
        }
    }

    fn adapter_for(&self, data_type: DataType) -> Option<&Arc<dyn DriverAdapter>> {
        self.adapters.iter().find(|a| a.supports(data_type))
    }
}
