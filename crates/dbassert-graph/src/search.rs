//! Depth-first postorder search
//!
//! The graph is never built up front: edges are requested from the caller
//! one node at a time. Targets are accepted before the nodes that point at
//! them, so the result is a dependency-first order.
//!
//! A node reached again while it is still on the current path closes a
//! cycle. That edge is skipped, which keeps the search finite; the order
//! within a cycle is best-effort.

use std::collections::BTreeSet;
use std::fmt::Debug;

/// Error type returned by search callbacks
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Directed edge: `from` depends on `to`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge<N> {
    pub from: N,
    pub to: N,
}

impl<N> Edge<N> {
    pub fn new(from: N, to: N) -> Self {
        Self { from, to }
    }
}

/// Caller-supplied view of the graph
pub trait SearchCallback<N> {
    /// Outgoing edges of a node, in the order they should be followed
    fn edges_from(&mut self, node: &N) -> Result<BTreeSet<Edge<N>>, CallbackError>;

    /// Called once for every node appended to the result
    fn node_added(&mut self, _node: &N) -> Result<(), CallbackError> {
        Ok(())
    }

    /// Whether a node takes part in the search at all
    fn should_visit(&mut self, _node: &N) -> Result<bool, CallbackError> {
        Ok(true)
    }
}

/// Callback assembled from three closures
pub struct FnCallback<E, A, V> {
    edges: E,
    added: A,
    visit: V,
}

impl<E, A, V> FnCallback<E, A, V> {
    pub fn new(edges: E, added: A, visit: V) -> Self {
        Self { edges, added, visit }
    }
}

type AddedFn<N> = fn(&N) -> Result<(), CallbackError>;
type VisitFn<N> = fn(&N) -> Result<bool, CallbackError>;

fn ignore_added<N>(_node: &N) -> Result<(), CallbackError> {
    Ok(())
}

fn visit_all<N>(_node: &N) -> Result<bool, CallbackError> {
    Ok(true)
}

impl<N, E> FnCallback<E, AddedFn<N>, VisitFn<N>> {
    /// Callback that only supplies edges and visits every node
    pub fn edges_only(edges: E) -> Self {
        Self {
            edges,
            added: ignore_added::<N>,
            visit: visit_all::<N>,
        }
    }
}

impl<N, E, A, V> SearchCallback<N> for FnCallback<E, A, V>
where
    E: FnMut(&N) -> Result<BTreeSet<Edge<N>>, CallbackError>,
    A: FnMut(&N) -> Result<(), CallbackError>,
    V: FnMut(&N) -> Result<bool, CallbackError>,
{
    fn edges_from(&mut self, node: &N) -> Result<BTreeSet<Edge<N>>, CallbackError> {
        (self.edges)(node)
    }

    fn node_added(&mut self, node: &N) -> Result<(), CallbackError> {
        (self.added)(node)
    }

    fn should_visit(&mut self, node: &N) -> Result<bool, CallbackError> {
        (self.visit)(node)
    }
}

/// Callback that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    EdgesFrom,
    NodeAdded,
    ShouldVisit,
}

impl std::fmt::Display for SearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EdgesFrom => write!(f, "edges_from"),
            Self::NodeAdded => write!(f, "node_added"),
            Self::ShouldVisit => write!(f, "should_visit"),
        }
    }
}

/// A callback failed and the search was aborted
#[derive(Debug, thiserror::Error)]
#[error("search aborted: {stage} failed for node {node}: {source}")]
pub struct SearchError {
    /// Which callback failed
    pub stage: SearchStage,

    /// Debug rendering of the node being processed
    pub node: String,

    #[source]
    pub source: CallbackError,
}

impl SearchError {
    pub(crate) fn new<N: Debug>(stage: SearchStage, node: &N, source: CallbackError) -> Self {
        Self {
            stage,
            node: format!("{:?}", node),
            source,
        }
    }

    /// Take the original callback error
    pub fn into_source(self) -> CallbackError {
        self.source
    }
}

struct Frame<N> {
    node: N,
    targets: std::vec::IntoIter<N>,
}

struct SearchState<N> {
    accepted: BTreeSet<N>,
    rejected: BTreeSet<N>,
    on_path: BTreeSet<N>,
    result: Vec<N>,
}

impl<N: Clone + Ord + Debug> SearchState<N> {
    /// Decide whether to descend into a node
    fn enter<C: SearchCallback<N>>(&mut self, node: &N, callback: &mut C) -> Result<bool, SearchError> {
        if self.accepted.contains(node) || self.rejected.contains(node) {
            return Ok(false);
        }
        if self.on_path.contains(node) {
            tracing::warn!(node = ?node, "dependency cycle detected, ignoring back edge");
            return Ok(false);
        }

        let visit = callback
            .should_visit(node)
            .map_err(|e| SearchError::new(SearchStage::ShouldVisit, node, e))?;
        if !visit {
            tracing::trace!(node = ?node, "node rejected");
            self.rejected.insert(node.clone());
            return Ok(false);
        }

        self.on_path.insert(node.clone());
        Ok(true)
    }

    fn frame<C: SearchCallback<N>>(&self, node: N, callback: &mut C) -> Result<Frame<N>, SearchError> {
        let edges = callback
            .edges_from(&node)
            .map_err(|e| SearchError::new(SearchStage::EdgesFrom, &node, e))?;
        let targets: Vec<N> = edges.into_iter().map(|edge| edge.to).collect();
        Ok(Frame {
            node,
            targets: targets.into_iter(),
        })
    }

    fn accept<C: SearchCallback<N>>(&mut self, node: N, callback: &mut C) -> Result<(), SearchError> {
        self.on_path.remove(&node);
        callback
            .node_added(&node)
            .map_err(|e| SearchError::new(SearchStage::NodeAdded, &node, e))?;
        self.accepted.insert(node.clone());
        self.result.push(node);
        Ok(())
    }
}

/// Postorder depth-first search with an explicit stack
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirstSearch;

impl DepthFirstSearch {
    /// Search from `roots` in the given order
    ///
    /// Returns accepted nodes, each at most once, with every edge target
    /// placed before its source unless the edge closes a cycle or the target
    /// was rejected by `should_visit`.
    pub fn search<N, C>(roots: impl IntoIterator<Item = N>, callback: &mut C) -> Result<Vec<N>, SearchError>
    where
        N: Clone + Ord + Debug,
        C: SearchCallback<N>,
    {
        let mut state = SearchState {
            accepted: BTreeSet::new(),
            rejected: BTreeSet::new(),
            on_path: BTreeSet::new(),
            result: Vec::new(),
        };

        for root in roots {
            if !state.enter(&root, callback)? {
                continue;
            }

            let mut stack = vec![state.frame(root, callback)?];
            while let Some(frame) = stack.last_mut() {
                match frame.targets.next() {
                    Some(target) => {
                        if state.enter(&target, callback)? {
                            stack.push(state.frame(target, callback)?);
                        }
                    }
                    None => {
                        if let Some(frame) = stack.pop() {
                            state.accept(frame.node, callback)?;
                        }
                    }
                }
            }
        }

        tracing::debug!(nodes = state.result.len(), "search finished");
        Ok(state.result)
    }
}
