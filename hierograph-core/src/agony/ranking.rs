//! Node rankings and edge classification.

use std::collections::BTreeMap;

use crate::{
    error::AgonyError,
    graph::{Edge, Graph, NodeId},
};

/// Assignment of an integer rank to nodes.
///
/// Ranks are plain integers drawn from the node-identifier space. They may
/// repeat across nodes and need not be contiguous. Entries for nodes outside a
/// graph are ignored when scoring against it.
///
/// # Examples
/// ```
/// use hierograph_core::{NodeId, Ranking};
///
/// let ranking: Ranking = [(0, 4), (1, 4), (2, 0)].into_iter().collect();
/// assert_eq!(ranking.rank(NodeId::new(1)), Some(4));
/// assert_eq!(ranking.rank(NodeId::new(3)), None);
/// assert_eq!(ranking.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ranking {
    ranks: BTreeMap<NodeId, usize>,
}

impl Ranking {
    /// Creates an empty ranking.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranks every node of `graph` by its creation index.
    ///
    /// Generated graphs only contain edges from older to newer nodes, so this
    /// ranking scores zero agony against them.
    #[must_use]
    pub fn identity(graph: &Graph) -> Self {
        graph.nodes().map(|node| (node, node.get())).collect()
    }

    pub(crate) fn from_dense(ranks: &[usize]) -> Self {
        ranks.iter().copied().enumerate().collect()
    }

    /// Assigns `rank` to `node`, returning the previous rank if any.
    pub fn insert(&mut self, node: NodeId, rank: usize) -> Option<usize> {
        self.ranks.insert(node, rank)
    }

    /// Rank assigned to `node`.
    #[must_use]
    pub fn rank(&self, node: NodeId) -> Option<usize> {
        self.ranks.get(&node).copied()
    }

    pub(crate) fn require(&self, node: NodeId) -> Result<usize, AgonyError> {
        self.rank(node).ok_or(AgonyError::MissingRank { node })
    }

    /// Number of ranked nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Returns `true` when no node is ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Iterates `(node, rank)` pairs ordered by node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.ranks.iter().map(|(&node, &rank)| (node, rank))
    }

    /// Labels every edge of `graph` as forward or backward under this ranking.
    ///
    /// # Errors
    /// Returns [`AgonyError::MissingRank`] when an edge endpoint is unranked.
    ///
    /// # Examples
    /// ```
    /// use hierograph_core::{EdgeDirection, Graph, NodeId, Ranking};
    ///
    /// let mut graph = Graph::with_nodes(2)?;
    /// graph.add_edge(NodeId::new(0), NodeId::new(1))?;
    /// let ranking: Ranking = [(0, 1), (1, 1)].into_iter().collect();
    /// let classified = ranking.classify(&graph)?;
    /// assert_eq!(classified[0].1, EdgeDirection::Backward);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn classify(&self, graph: &Graph) -> Result<Vec<(Edge, EdgeDirection)>, AgonyError> {
        graph
            .edges()
            .map(|edge| {
                let source = self.require(edge.source)?;
                let target = self.require(edge.target)?;
                Ok((edge, EdgeDirection::between(source, target)))
            })
            .collect()
    }
}

impl FromIterator<(NodeId, usize)> for Ranking {
    fn from_iter<I: IntoIterator<Item = (NodeId, usize)>>(iter: I) -> Self {
        Self {
            ranks: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(usize, usize)> for Ranking {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(node, rank)| (NodeId::new(node), rank))
            .collect()
    }
}

/// Orientation of an edge relative to a ranking.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EdgeDirection {
    /// `rank(source) < rank(target)`; contributes no agony.
    Forward,
    /// `rank(source) >= rank(target)`; contributes agony.
    Backward,
}

impl EdgeDirection {
    fn between(source_rank: usize, target_rank: usize) -> Self {
        if source_rank < target_rank {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    /// Returns `true` for [`EdgeDirection::Forward`].
    #[must_use]
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }
}
