//! Directed graph storage shared by the generator and the ranker.
//!
//! Nodes are dense identifiers `0..n` that double as creation order. Each node
//! carries a single-character label taken from [`NODE_LABELS`] by creation
//! index. Edges have set semantics, so adding the same edge twice is a no-op.

use std::{collections::BTreeSet, fmt};

use crate::error::GraphError;

/// Label alphabet; node `i` is labelled with the `i`-th character.
pub const NODE_LABELS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maximum number of nodes a [`Graph`] can hold.
pub const MAX_NODES: usize = NODE_LABELS.len();

/// Identifier of a node within a [`Graph`].
///
/// # Examples
/// ```
/// use hierograph_core::NodeId;
///
/// let node = NodeId::new(3);
/// assert_eq!(node.get(), 3);
/// assert_eq!(node.to_string(), "3");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps a raw node index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw node index.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Directed edge `source -> target`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    /// Node the edge leaves.
    pub source: NodeId,
    /// Node the edge enters.
    pub target: NodeId,
}

impl Edge {
    /// Creates an edge from raw node indices.
    #[must_use]
    pub const fn new(source: usize, target: usize) -> Self {
        Self {
            source: NodeId::new(source),
            target: NodeId::new(target),
        }
    }
}

/// Labelled directed graph with dense node identifiers.
///
/// # Examples
/// ```
/// use hierograph_core::{Graph, NodeId};
///
/// let mut graph = Graph::with_nodes(3)?;
/// assert!(graph.add_edge(NodeId::new(0), NodeId::new(2))?);
/// assert!(!graph.add_edge(NodeId::new(0), NodeId::new(2))?);
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(graph.label(NodeId::new(2)), Some('C'));
/// assert_eq!(graph.in_degree(NodeId::new(2)), Some(1));
/// # Ok::<(), hierograph_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Graph {
    labels: Vec<char>,
    in_degrees: Vec<usize>,
    edges: BTreeSet<Edge>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph holding `count` unconnected nodes.
    ///
    /// # Errors
    /// Returns [`GraphError::CapacityExceeded`] when `count` exceeds
    /// [`MAX_NODES`].
    pub fn with_nodes(count: usize) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for _ in 0..count {
            graph.add_node().map_err(|_| GraphError::CapacityExceeded {
                requested: count,
                capacity: MAX_NODES,
            })?;
        }
        Ok(graph)
    }

    /// Appends a node labelled with the next unused alphabet character.
    ///
    /// # Errors
    /// Returns [`GraphError::CapacityExceeded`] once every label is in use.
    pub fn add_node(&mut self) -> Result<NodeId, GraphError> {
        let id = NodeId::new(self.labels.len());
        let label = NODE_LABELS
            .chars()
            .nth(id.get())
            .ok_or(GraphError::CapacityExceeded {
                requested: id.get() + 1,
                capacity: MAX_NODES,
            })?;
        self.labels.push(label);
        self.in_degrees.push(0);
        Ok(id)
    }

    /// Adds the edge `source -> target`.
    ///
    /// Returns `false` when the edge was already present.
    ///
    /// # Errors
    /// Returns [`GraphError::UnknownNode`] when either endpoint is absent.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<bool, GraphError> {
        self.check_node(source)?;
        self.check_node(target)?;
        Ok(self.insert_edge(Edge { source, target }))
    }

    /// Inserts an edge whose endpoints the caller has already validated.
    pub(crate) fn insert_edge(&mut self, edge: Edge) -> bool {
        debug_assert!(self.contains_node(edge.source) && self.contains_node(edge.target));
        if !self.edges.insert(edge) {
            return false;
        }
        if let Some(degree) = self.in_degrees.get_mut(edge.target.get()) {
            *degree += 1;
        }
        true
    }

    fn check_node(&self, node: NodeId) -> Result<(), GraphError> {
        if self.contains_node(node) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode {
                node,
                node_count: self.node_count(),
            })
        }
    }

    /// Returns `true` when `node` belongs to the graph.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.get() < self.labels.len()
    }

    /// Returns `true` when the edge `source -> target` is present.
    #[must_use]
    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edges.contains(&Edge { source, target })
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates node identifiers in creation order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.labels.len()).map(NodeId::new)
    }

    /// Iterates edges ordered by `(source, target)`.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// Returns the display label of `node`.
    #[must_use]
    pub fn label(&self, node: NodeId) -> Option<char> {
        self.labels.get(node.get()).copied()
    }

    /// Returns the current in-degree of `node`.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> Option<usize> {
        self.in_degrees.get(node.get()).copied()
    }

    /// In-degrees of every node, indexed by creation order.
    #[must_use]
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degrees
    }
}
