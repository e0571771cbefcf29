//! dbassert graph ordering
//!
//! A generic depth-first search over lazily supplied edges, and the
//! foreign-key dependency resolver built on it.

pub mod dependency;
pub mod search;

pub use dependency::{order_for_delete, order_for_insert, DependencyError, DependencyResolver, NoPrimaryKeyError};
pub use search::{CallbackError, DepthFirstSearch, Edge, FnCallback, SearchCallback, SearchError, SearchStage};
