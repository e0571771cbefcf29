//! Foreign-key dependency ordering
//!
//! Orders tables so that every table comes after the tables its foreign keys
//! reference (insert order), or the reverse (delete order).
//!
//! Cycles between tables are broken by ignoring the edge that closes them, so
//! a cyclic set still gets an order but it is not guaranteed to be insertable.

use crate::search::{CallbackError, DepthFirstSearch, Edge, FnCallback, SearchError, SearchStage};
use dbassert_core::TableMetadata;
use std::collections::{BTreeSet, HashMap};

/// A referenced table has no primary key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Table '{table}' is referenced by a foreign key but has no primary key")]
pub struct NoPrimaryKeyError {
    pub table: String,
}

/// Dependency resolution errors
#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
    #[error("Table '{table}' is referenced by a foreign key but has no primary key")]
    NoPrimaryKey { table: String },

    #[error(transparent)]
    Search(SearchError),
}

impl From<SearchError> for DependencyError {
    fn from(err: SearchError) -> Self {
        if let Some(no_pk) = err.source.downcast_ref::<NoPrimaryKeyError>() {
            return Self::NoPrimaryKey {
                table: no_pk.table.clone(),
            };
        }
        Self::Search(err)
    }
}

/// Resolves table order from primary and foreign key metadata
#[derive(Debug)]
pub struct DependencyResolver<'a> {
    /// Tables in caller order
    tables: Vec<&'a TableMetadata>,

    /// Uppercased name -> position in `tables`
    index: HashMap<String, usize>,
}

impl<'a> DependencyResolver<'a> {
    /// Create a resolver over a table set
    ///
    /// Names are case-insensitive; a repeated name keeps the first table.
    pub fn new(tables: impl IntoIterator<Item = &'a TableMetadata>) -> Self {
        let mut kept = Vec::new();
        let mut index = HashMap::new();

        for table in tables {
            let key = table.name.to_uppercase();
            if index.contains_key(&key) {
                tracing::warn!(table = %table.name, "duplicate table in dependency set, keeping first");
                continue;
            }
            index.insert(key, kept.len());
            kept.push(table);
        }

        Self { tables: kept, index }
    }

    fn lookup(&self, name: &str) -> Option<&'a TableMetadata> {
        self.index.get(&name.to_uppercase()).map(|&i| self.tables[i])
    }

    /// Tables that `table` references, as edge targets
    ///
    /// References to tables outside the set and self references are skipped.
    /// A reference to a table without a primary key is an error.
    pub fn dependencies_of(&self, table: &str) -> Result<Vec<String>, DependencyError> {
        let edges = self
            .edges_from(table)
            .map_err(|source| SearchError::new(SearchStage::EdgesFrom, &table, source))?;
        Ok(edges.into_iter().map(|edge| edge.to).collect())
    }

    fn edges_from(&self, name: &str) -> Result<BTreeSet<Edge<String>>, CallbackError> {
        let Some(table) = self.lookup(name) else {
            return Ok(BTreeSet::new());
        };

        let mut edges = BTreeSet::new();
        for foreign_key in &table.foreign_keys {
            let Some(referenced) = self.lookup(&foreign_key.referenced_table) else {
                tracing::trace!(
                    table = %table.name,
                    referenced = %foreign_key.referenced_table,
                    "foreign key to table outside the set ignored"
                );
                continue;
            };
            if referenced.has_name(&table.name) {
                continue;
            }
            if !referenced.has_primary_key() {
                return Err(NoPrimaryKeyError {
                    table: referenced.name.clone(),
                }
                .into());
            }
            edges.insert(Edge::new(table.name.clone(), referenced.name.clone()));
        }
        Ok(edges)
    }

    /// Order tables so referenced tables come first
    pub fn order_for_insert(&self) -> Result<Vec<String>, DependencyError> {
        let roots: Vec<String> = self.tables.iter().map(|t| t.name.clone()).collect();
        let mut callback = FnCallback::edges_only(|node: &String| self.edges_from(node));
        let order = DepthFirstSearch::search(roots, &mut callback)?;

        tracing::debug!(order = ?order, "resolved insert order");
        Ok(order)
    }

    /// Order tables so referencing tables come first
    pub fn order_for_delete(&self) -> Result<Vec<String>, DependencyError> {
        let mut order = self.order_for_insert()?;
        order.reverse();
        Ok(order)
    }
}

/// Insert-safe order for a table set
pub fn order_for_insert(tables: &[TableMetadata]) -> Result<Vec<String>, DependencyError> {
    DependencyResolver::new(tables).order_for_insert()
}

/// Delete-safe order for a table set
pub fn order_for_delete(tables: &[TableMetadata]) -> Result<Vec<String>, DependencyError> {
    DependencyResolver::new(tables).order_for_delete()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbassert_core::{Column, ForeignKey};
    use pretty_assertions::assert_eq;

    fn table(name: &str) -> TableMetadata {
        TableMetadata::new(name, vec![Column::untyped("ID")]).with_primary_key(["ID"])
    }

    #[test]
    fn self_reference_is_not_an_edge() {
        let tree = table("NODE").with_foreign_key(ForeignKey::new(vec!["PARENT_ID".into()], "node", vec!["ID".into()]));
        let resolver = DependencyResolver::new([&tree]);
        assert!(resolver.dependencies_of("NODE").unwrap().is_empty());
    }

    #[test]
    fn unknown_table_has_no_dependencies() {
        let resolver = DependencyResolver::new(std::iter::empty());
        assert!(resolver.dependencies_of("MISSING").unwrap().is_empty());
    }

    #[test]
    fn duplicate_names_keep_first() {
        let first = table("A");
        let second = table("a");
        let tables = [first, second];
        let order = DependencyResolver::new(&tables).order_for_insert().unwrap();
        assert_eq!(order, vec!["A"]);
    }
}
