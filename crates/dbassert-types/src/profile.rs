//! Vendor type profiles
//!
//! A profile maps a driver-reported `(sql_type, sql_type_name)` pair to a
//! data type. Vendor profiles only know their own spellings and return `None`
//! otherwise; the registry then falls back to [`DefaultProfile`].

use dbassert_core::sql_types;
use dbassert_core::DataType;

/// Vendor-specific type lookup
pub trait VendorProfile: std::fmt::Debug + Send + Sync {
    /// Profile name used in logs
    fn name(&self) -> &'static str;

    /// Database product names this profile serves (lowercase)
    fn product_names(&self) -> &'static [&'static str];

    /// Map a type code and name, or `None` when the profile has no opinion
    fn lookup(&self, sql_type: i32, sql_type_name: &str) -> Option<DataType>;

    /// Check if the profile serves a database product
    fn serves_product(&self, product: &str) -> bool {
        let product = product.trim().to_lowercase();
        self.product_names().iter().any(|name| product == *name)
    }
}

/// Generic profile for standard SQL type codes (Derby semantics)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProfile;

impl VendorProfile for DefaultProfile {
    fn name(&self) -> &'static str {
        "default"
    }

    fn product_names(&self) -> &'static [&'static str] {
        &["default", "derby", "apache derby"]
    }

    fn lookup(&self, sql_type: i32, sql_type_name: &str) -> Option<DataType> {
        if sql_type == sql_types::OTHER {
            // Drivers report LOBs as OTHER with the type in the name
            return match sql_type_name.trim().to_uppercase().as_str() {
                "BLOB" => Some(DataType::Blob),
                "CLOB" => Some(DataType::Clob),
                _ => None,
            };
        }
        DataType::for_sql_type(sql_type)
    }
}
