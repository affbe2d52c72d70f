//! Agony scoring and minimisation.
//!
//! Given a ranking `r`, an edge `u -> v` is forward when `r(u) < r(v)` and
//! backward otherwise. Each backward edge costs `r(u) - r(v) + 1`, so the total
//! agony is zero exactly when every edge points forward.

mod ranking;
mod search;

use rand::Rng;

use crate::{error::AgonyError, graph::Graph};

pub use self::{
    ranking::{EdgeDirection, Ranking},
    search::{
        AgonySearch, AgonySearchOutcome, AgonySearchParams, DEFAULT_MAX_ATTEMPTS, Improvement,
    },
};

/// Sums `max(0, r(u) - r(v) + 1)` over every edge `u -> v` of `graph`.
///
/// Ranks for nodes outside `graph` are ignored.
///
/// # Errors
/// Returns [`AgonyError::MissingRank`] when an edge endpoint has no rank.
///
/// # Examples
/// ```
/// use hierograph_core::{Graph, NodeId, Ranking, compute_agony};
///
/// let mut graph = Graph::with_nodes(2)?;
/// graph.add_edge(NodeId::new(0), NodeId::new(1))?;
///
/// let forward: Ranking = [(0, 0), (1, 1)].into_iter().collect();
/// let backward: Ranking = [(0, 3), (1, 1)].into_iter().collect();
/// assert_eq!(compute_agony(&graph, &forward)?, 0);
/// assert_eq!(compute_agony(&graph, &backward)?, 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compute_agony(graph: &Graph, ranking: &Ranking) -> Result<u64, AgonyError> {
    graph.edges().try_fold(0_u64, |total, edge| {
        let source = ranking.require(edge.source)?;
        let target = ranking.require(edge.target)?;
        Ok(total + search::violation(source, target))
    })
}

/// Searches for a low-agony ranking of `graph` with the default attempt cap.
///
/// See [`AgonySearch`] for the sampling strategy. The returned agony is the
/// best found, not a certified minimum.
///
/// # Errors
/// Returns [`AgonyError::EmptyGraph`] when `graph` has no nodes.
///
/// # Examples
/// ```
/// use hierograph_core::{Graph, NodeId, compute_agony, min_agony_ranking};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut graph = Graph::with_nodes(3)?;
/// graph.add_edge(NodeId::new(0), NodeId::new(2))?;
/// let mut rng = SmallRng::seed_from_u64(11);
/// let (ranking, agony) = min_agony_ranking(&graph, &mut rng)?;
/// assert_eq!(agony, 0);
/// assert_eq!(compute_agony(&graph, &ranking)?, 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn min_agony_ranking<R: Rng + ?Sized>(
    graph: &Graph,
    rng: &mut R,
) -> Result<(Ranking, u64), AgonyError> {
    AgonySearch::default()
        .run_with_rng(graph, rng)
        .map(AgonySearchOutcome::into_parts)
}
