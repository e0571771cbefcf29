//! dbassert type registry
//!
//! Maps driver type codes to logical types through vendor profiles, holds the
//! numeric tolerance table and the registered driver adapters.

pub mod adapter;
pub mod error;
pub mod profile;
pub mod registry;
pub mod tolerance;
pub mod vendor;

pub use adapter::{DriverAdapter, PgObjectAdapter};
pub use error::ConfigurationError;
pub use profile::{DefaultProfile, VendorProfile};
pub use registry::TypeRegistry;
pub use tolerance::{ToleranceTable, ToleratedDelta, ANY_TABLE};
pub use vendor::{profile_for_kind, profile_for_product, H2Profile, MsSqlProfile, PostgresProfile};
