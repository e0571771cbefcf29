//! Integration tests for the type registry
//!
//! Exercises resolution through vendor profiles, tolerance lookup and
//! adapter registration the way the diff engine and fixture loaders use them.

use dbassert_core::{sql_types, AssertionConfig, DataType, LogicalType, Value};
use dbassert_types::vendor::mssql::codes;
use dbassert_types::{
    ConfigurationError, DriverAdapter, MsSqlProfile, PgObjectAdapter, PostgresProfile, TypeRegistry,
    H2Profile, ANY_TABLE,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_generic_resolution() {
    let registry = TypeRegistry::new();
    assert_eq!(registry.vendor_name(), "default");
    assert_eq!(
        registry.resolve(sql_types::INTEGER, "INTEGER"),
        LogicalType::Plain(DataType::Integer)
    );
    assert_eq!(registry.resolve(sql_types::OTHER, "CLOB"), LogicalType::Plain(DataType::Clob));
}

#[test]
fn test_unknown_code_resolves_to_unknown() {
    let registry = TypeRegistry::with_vendor(MsSqlProfile);
    let resolved = registry.resolve(99999, "hierarchyid");
    assert!(resolved.is_unknown());

    // UNKNOWN compares raw values
    assert!(resolved.matches(&Value::from("a"), &Value::from("a")).unwrap());
    assert!(!resolved.matches(&Value::from("1"), &Value::Int(1)).unwrap());
}

#[test]
fn test_vendor_first_then_fallback() {
    let registry = TypeRegistry::with_vendor(MsSqlProfile);
    assert_eq!(registry.resolve(codes::NVARCHAR, "nvarchar"), LogicalType::Plain(DataType::Varchar));
    assert_eq!(
        registry.resolve(sql_types::CHAR, "uniqueidentifier"),
        LogicalType::Plain(DataType::Uuid)
    );
    // Plain CHAR falls through to the generic profile
    assert_eq!(registry.resolve(sql_types::CHAR, "char"), LogicalType::Plain(DataType::Char));
    assert_eq!(
        registry.resolve(codes::DATETIMEOFFSET, "datetimeoffset"),
        LogicalType::Plain(DataType::TimestampWithTimeZone)
    );
}

#[test]
fn test_h2_and_postgres_profiles() {
    let h2 = TypeRegistry::with_vendor(H2Profile);
    assert_eq!(h2.resolve(sql_types::BIT, "BOOLEAN"), LogicalType::Plain(DataType::Boolean));
    assert_eq!(h2.resolve(sql_types::BIT, "BIT"), LogicalType::Plain(DataType::Bit));

    let pg = TypeRegistry::with_vendor(PostgresProfile);
    assert_eq!(pg.resolve(sql_types::OTHER, "citext"), LogicalType::Plain(DataType::Citext));
    assert!(pg.resolve(sql_types::OTHER, "tsvector").is_unknown());
}

#[test]
fn test_registry_for_product_name() {
    assert_eq!(TypeRegistry::for_product("Microsoft SQL Server").vendor_name(), "mssql");
    assert_eq!(TypeRegistry::for_product("unheard-of db").vendor_name(), "default");
}

// =============================================================================
// Tolerances
// =============================================================================

#[test]
fn test_numeric_column_with_tolerance() {
    let mut registry = TypeRegistry::new();
    registry.add_tolerance("ORDERS", "TOTAL", dec("0.01")).unwrap();

    let resolved = registry.resolve_for_column(sql_types::NUMERIC, "NUMERIC", "orders", "total");
    assert_eq!(resolved, LogicalType::tolerant(DataType::Numeric, dec("0.01")));
    assert_eq!(resolved.name(), "NUMERIC_WITH_TOLERATED_DELTA");

    assert!(resolved.matches(&Value::from("10.00"), &Value::from("10.01")).unwrap());
    assert!(resolved.matches(&Value::from("10.00"), &Value::from("9.99")).unwrap());
    assert!(!resolved.matches(&Value::from("10.00"), &Value::from("10.02")).unwrap());
}

#[test]
fn test_tolerance_only_applies_to_numeric_codes() {
    let mut registry = TypeRegistry::new();
    registry.add_tolerance(ANY_TABLE, "AMOUNT", dec("1")).unwrap();

    assert_eq!(
        registry.resolve_for_column(sql_types::DOUBLE, "DOUBLE", "T", "AMOUNT"),
        LogicalType::Plain(DataType::Double)
    );
    assert_eq!(
        registry.resolve_for_column(sql_types::DECIMAL, "DECIMAL", "T", "AMOUNT"),
        LogicalType::tolerant(DataType::Decimal, dec("1"))
    );
    assert_eq!(
        registry.resolve_for_column(sql_types::DECIMAL, "DECIMAL", "T", "OTHER"),
        LogicalType::Plain(DataType::Decimal)
    );
}

#[test]
fn test_with_tolerance_on_resolved_type() {
    let mut registry = TypeRegistry::new();
    registry.add_tolerance("T", "C", dec("0.5")).unwrap();

    let tolerant = registry.with_tolerance("T", "C", DataType::Numeric.into());
    assert_eq!(tolerant.delta(), Some(dec("0.5")));

    // Already tolerant types are kept as they are
    let preset = LogicalType::tolerant(DataType::Numeric, dec("2"));
    assert_eq!(registry.with_tolerance("T", "C", preset), preset);
}

#[test]
fn test_negative_tolerance_is_configuration_error() {
    let mut registry = TypeRegistry::new();
    let err = registry.add_tolerance("T", "C", dec("-1")).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::NegativeDelta {
            table: "T".into(),
            column: "C".into(),
            delta: dec("-1"),
        }
    );
}

#[test]
fn test_registry_from_config() {
    let config = AssertionConfig::from_toml(
        r#"
        vendor = "postgres"

        [[tolerances]]
        column = "PRICE"
        delta = "0.05"
        "#,
    )
    .unwrap();

    let registry = TypeRegistry::from_config(&config).unwrap();
    assert_eq!(registry.vendor_name(), "postgres");
    assert_eq!(registry.tolerances().len(), 1);
    assert_eq!(
        registry.resolve_for_column(sql_types::NUMERIC, "numeric", "ANY", "price").delta(),
        Some(dec("0.05"))
    );
}

#[test]
fn test_registry_from_config_rejects_negative_delta() {
    let config = AssertionConfig::from_toml(
        r#"
        [[tolerances]]
        column = "PRICE"
        delta = "-0.05"
        "#,
    )
    .unwrap();

    assert!(matches!(
        TypeRegistry::from_config(&config),
        Err(ConfigurationError::NegativeDelta { .. })
    ));
}

// =============================================================================
// Conversion and binding
// =============================================================================

#[test]
fn test_convert_reports_uncoercible_values() {
    let registry = TypeRegistry::new();
    let err = registry
        .convert(DataType::Integer.into(), &Value::from("twelve"))
        .unwrap_err();
    assert_eq!(err.target, "INTEGER");
    assert_eq!(err.value, "twelve");
}

#[derive(Debug)]
struct MissingDriver;

impl DriverAdapter for MissingDriver {
    fn name(&self) -> &'static str {
        "missing"
    }

    fn supports(&self, _data_type: DataType) -> bool {
        true
    }

    fn check_available(&self) -> Result<(), String> {
        Err("driver library not loaded".into())
    }

    fn bind(&self, _data_type: DataType, value: &Value) -> Result<Value, dbassert_core::TypeConversionError> {
        Ok(value.clone())
    }
}

#[test]
fn test_unavailable_adapter_fails_fast() {
    let mut registry = TypeRegistry::new();
    let err = registry.register_adapter(Arc::new(MissingDriver)).unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::AdapterUnavailable {
            adapter: "missing".into(),
            reason: "driver library not loaded".into(),
        }
    );
}

#[test]
fn test_bind_value_through_adapter() {
    let mut registry = TypeRegistry::with_vendor(PostgresProfile);
    registry.register_adapter(Arc::new(PgObjectAdapter)).unwrap();

    let uuid_type = registry.resolve(sql_types::OTHER, "uuid");
    let bound = registry
        .bind_value(uuid_type, &Value::from("A0EEBC99-9C0B-4EF8-BB6D-6BB9BD380A11"))
        .unwrap();
    assert_eq!(bound, Value::from("a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11"));

    // Types without an adapter are only converted
    let bound = registry.bind_value(DataType::Integer.into(), &Value::from("42")).unwrap();
    assert_eq!(bound, Value::Int(42));
}
