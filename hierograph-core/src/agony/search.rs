//! Blind random search for low-agony rankings.
//!
//! Every attempt draws an independent rank per node, uniformly and with
//! replacement from the graph's node identifiers, and scores it. Attempts do
//! not inform each other. The incumbent is replaced only on a strictly lower
//! score, so the reported improvements form a strictly decreasing sequence.
//! The search stops on the first zero-agony ranking or when the attempt cap is
//! exhausted; in the latter case the result is an approximation.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{info, instrument};

use crate::{error::AgonyError, graph::Graph};

use super::Ranking;

/// Default number of sampled rankings per search.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000_000;

const DEFAULT_RNG_SEED: u64 = 0x0A60_4F0D;

/// Configuration for [`AgonySearch`].
///
/// # Examples
/// ```
/// use hierograph_core::AgonySearchParams;
///
/// let params = AgonySearchParams::default().with_max_attempts(500);
/// assert_eq!(params.max_attempts(), 500);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgonySearchParams {
    max_attempts: usize,
    rng_seed: u64,
}

impl Default for AgonySearchParams {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl AgonySearchParams {
    /// Caps the number of sampled rankings. Values below one are raised to one.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Seeds the search RNG so runs are reproducible.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Maximum number of sampled rankings.
    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Seed for the search RNG.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// A new best score found during a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Improvement {
    /// One-based attempt that produced the score.
    pub attempt: usize,
    /// Agony of the improved ranking.
    pub agony: u64,
}

/// Result of an [`AgonySearch`] run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgonySearchOutcome {
    ranking: Ranking,
    agony: u64,
    attempts: usize,
    improvements: Vec<Improvement>,
}

impl AgonySearchOutcome {
    /// Best ranking found.
    #[must_use]
    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Agony of [`Self::ranking`].
    #[must_use]
    pub fn agony(&self) -> u64 {
        self.agony
    }

    /// Number of rankings sampled.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Returns `true` when the search found a zero-agony ranking.
    #[must_use]
    pub fn converged(&self) -> bool {
        self.agony == 0
    }

    /// Every improvement in the order it was found.
    #[must_use]
    pub fn improvements(&self) -> &[Improvement] {
        &self.improvements
    }

    /// Consumes the outcome, returning the ranking and its agony.
    #[must_use]
    pub fn into_parts(self) -> (Ranking, u64) {
        (self.ranking, self.agony)
    }
}

/// Random-sampling agony minimiser.
///
/// # Examples
/// ```
/// use hierograph_core::{AgonySearch, AgonySearchParams, Graph, NodeId};
///
/// let mut graph = Graph::with_nodes(3)?;
/// graph.add_edge(NodeId::new(0), NodeId::new(1))?;
/// graph.add_edge(NodeId::new(1), NodeId::new(2))?;
///
/// let search = AgonySearch::new(AgonySearchParams::default().with_rng_seed(5));
/// let outcome = search.run(&graph)?;
/// assert!(outcome.converged());
/// assert_eq!(outcome.ranking().len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct AgonySearch {
    params: AgonySearchParams,
}

impl AgonySearch {
    /// Wraps `params`.
    #[must_use]
    pub fn new(params: AgonySearchParams) -> Self {
        Self { params }
    }

    /// Returns the search parameters.
    #[must_use]
    pub fn params(&self) -> &AgonySearchParams {
        &self.params
    }

    /// Searches `graph` using the configured seed.
    ///
    /// # Errors
    /// Returns [`AgonyError::EmptyGraph`] when `graph` has no nodes.
    pub fn run(&self, graph: &Graph) -> Result<AgonySearchOutcome, AgonyError> {
        let mut rng = SmallRng::seed_from_u64(self.params.rng_seed());
        self.run_with_rng(graph, &mut rng)
    }

    /// Searches `graph` drawing randomness from `rng`.
    ///
    /// # Errors
    /// Returns [`AgonyError::EmptyGraph`] when `graph` has no nodes.
    #[instrument(
        name = "core.min_agony",
        err,
        skip_all,
        fields(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            max_attempts = self.params.max_attempts(),
        ),
    )]
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        graph: &Graph,
        rng: &mut R,
    ) -> Result<AgonySearchOutcome, AgonyError> {
        let node_count = graph.node_count();
        if node_count == 0 {
            return Err(AgonyError::EmptyGraph);
        }
        let edges: Vec<(usize, usize)> = graph
            .edges()
            .map(|edge| (edge.source.get(), edge.target.get()))
            .collect();

        let mut candidate = vec![0_usize; node_count];
        let mut best: Option<(Vec<usize>, u64)> = None;
        let mut improvements = Vec::new();
        let mut attempts = 0;

        while attempts < self.params.max_attempts() {
            attempts += 1;
            // Node ids are dense, so a uniform index is a uniform node id.
            for rank in &mut candidate {
                *rank = rng.gen_range(0..node_count);
            }
            let agony = dense_agony(&edges, &candidate);
            if best.as_ref().is_none_or(|(_, incumbent)| agony < *incumbent) {
                info!(attempt = attempts, agony, "agony improved");
                improvements.push(Improvement {
                    attempt: attempts,
                    agony,
                });
                best = Some((candidate.clone(), agony));
                if agony == 0 {
                    break;
                }
            }
        }

        let (ranks, agony) = best.ok_or(AgonyError::EmptyGraph)?;
        info!(
            agony,
            attempts,
            converged = (agony == 0),
            "agony search completed"
        );
        Ok(AgonySearchOutcome {
            ranking: Ranking::from_dense(&ranks),
            agony,
            attempts,
            improvements,
        })
    }
}

/// Scores a dense ranking indexed by node id.
fn dense_agony(edges: &[(usize, usize)], ranks: &[usize]) -> u64 {
    edges
        .iter()
        .map(|&(source, target)| {
            let source_rank = ranks.get(source).copied().unwrap_or_default();
            let target_rank = ranks.get(target).copied().unwrap_or_default();
            violation(source_rank, target_rank)
        })
        .sum()
}

/// `max(0, rank(u) - rank(v) + 1)` for an edge `u -> v`.
pub(super) fn violation(source_rank: usize, target_rank: usize) -> u64 {
    if source_rank >= target_rank {
        (source_rank - target_rank) as u64 + 1
    } else {
        0
    }
}
