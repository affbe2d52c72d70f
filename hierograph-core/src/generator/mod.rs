//! Price's model growth: in-degree weighted preferential attachment.
//!
//! Generation starts from `m` unconnected seed nodes and appends one node per
//! growth step until the graph holds `n` nodes. Each step:
//!
//! - snapshots the in-degree distribution `p_k` of the existing nodes;
//! - derives the attachment probability `(k + 1) * p_k / (m + 1)` per degree;
//! - sweeps every existing node once per pass, drawing a uniform value per node
//!   and linking `node -> new` whenever the draw falls below the node's
//!   attachment probability.
//!
//! A pass keeps scanning after its first success, so a new node may receive
//! several incoming edges in one step. Passes repeat until at least one edge
//! lands, bounded by [`PriceModelParams::max_attachment_passes`].
//!
//! Edges only ever point from older to newer nodes, so creation order is a
//! topological order of the result.

mod distribution;
mod params;

use rand::{Rng, SeedableRng, distributions::Standard, rngs::SmallRng};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{GenerationError, ParameterConstraint},
    graph::{Edge, Graph, NodeId},
};

pub use self::{
    distribution::{AttachmentTable, DegreeDistribution},
    params::{DEFAULT_MAX_ATTACHMENT_PASSES, PriceModelParams},
};

/// Grows an `n`-node graph with mean out-degree `m` using `rng`.
///
/// Uses [`DEFAULT_MAX_ATTACHMENT_PASSES`] as the per-step pass ceiling.
///
/// # Errors
/// Returns [`GenerationError::InvalidParameter`] when `m < 1`, `m >= n`, or
/// `n` exceeds the label alphabet, and [`GenerationError::Stalled`] when a
/// growth step exhausts its passes without attaching.
///
/// # Examples
/// ```
/// use hierograph_core::generate;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let graph = generate(8, 2, &mut rng)?;
/// assert_eq!(graph.node_count(), 8);
/// assert!(graph.edges().all(|edge| edge.source < edge.target));
/// # Ok::<(), hierograph_core::GenerationError>(())
/// ```
pub fn generate<R: Rng + ?Sized>(
    n: usize,
    m: usize,
    rng: &mut R,
) -> Result<Graph, GenerationError> {
    params::validate(n, m)?;
    grow(n, m, DEFAULT_MAX_ATTACHMENT_PASSES, rng)
}

/// Price's model generator bound to a validated parameter set.
///
/// # Examples
/// ```
/// use hierograph_core::{PriceModel, PriceModelParams};
///
/// let params = PriceModelParams::new(10, 2)?.with_rng_seed(3);
/// let model = PriceModel::new(params);
/// assert_eq!(model.generate()?, model.generate()?);
/// # Ok::<(), hierograph_core::GenerationError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PriceModel {
    params: PriceModelParams,
}

impl PriceModel {
    /// Wraps `params`.
    #[must_use]
    pub fn new(params: PriceModelParams) -> Self {
        Self { params }
    }

    /// Returns the parameters this model grows graphs with.
    #[must_use]
    pub fn params(&self) -> &PriceModelParams {
        &self.params
    }

    /// Grows a graph from the configured seed.
    ///
    /// # Errors
    /// Returns [`GenerationError::Stalled`] when a growth step exhausts its
    /// passes without attaching.
    pub fn generate(&self) -> Result<Graph, GenerationError> {
        let mut rng = SmallRng::seed_from_u64(self.params.rng_seed());
        self.generate_with_rng(&mut rng)
    }

    /// Grows a graph drawing randomness from `rng` instead of the configured
    /// seed.
    ///
    /// # Errors
    /// Returns [`GenerationError::Stalled`] when a growth step exhausts its
    /// passes without attaching.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Graph, GenerationError> {
        grow(
            self.params.nodes(),
            self.params.mean_out_degree(),
            self.params.max_attachment_passes(),
            rng,
        )
    }
}

#[instrument(
    name = "core.generate",
    err,
    skip_all,
    fields(nodes = n, mean_out_degree = m, max_passes = max_passes),
)]
fn grow<R: Rng + ?Sized>(
    n: usize,
    m: usize,
    max_passes: usize,
    rng: &mut R,
) -> Result<Graph, GenerationError> {
    let invalid = |constraint| GenerationError::InvalidParameter {
        nodes: n,
        mean_out_degree: m,
        constraint,
    };
    let mut graph =
        Graph::with_nodes(m).map_err(|_| invalid(ParameterConstraint::ExceedsLabelAlphabet))?;

    for _ in m..n {
        let existing = graph.in_degrees().to_vec();
        let distribution = DegreeDistribution::from_in_degrees(&existing);
        let table = AttachmentTable::price(&distribution, m);
        debug!(
            p_k = ?distribution.fractions(),
            attach_prob = ?table.probabilities(),
            "computed attachment probabilities"
        );

        let new_node = graph
            .add_node()
            .map_err(|_| invalid(ParameterConstraint::ExceedsLabelAlphabet))?;
        let (attached, passes) = attach(&mut graph, &existing, &table, new_node, max_passes, rng)?;
        debug!(node = %new_node, attached, passes, "attached node");
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "price model generation completed"
    );
    Ok(graph)
}

/// Runs attachment passes for `new_node` until at least one edge lands.
///
/// `existing` holds the in-degrees of every older node, snapshotted before the
/// step. Returns the number of edges added and the passes used.
fn attach<R: Rng + ?Sized>(
    graph: &mut Graph,
    existing: &[usize],
    table: &AttachmentTable,
    new_node: NodeId,
    max_passes: usize,
    rng: &mut R,
) -> Result<(usize, usize), GenerationError> {
    for pass in 1..=max_passes {
        let mut attached = 0_usize;
        for (index, &degree) in existing.iter().enumerate() {
            let draw: f64 = rng.sample(Standard);
            if draw < table.probability(degree)
                && graph.insert_edge(Edge {
                    source: NodeId::new(index),
                    target: new_node,
                })
            {
                attached += 1;
            }
        }
        if attached > 0 {
            return Ok((attached, pass));
        }
    }

    warn!(node = %new_node, passes = max_passes, "attachment stalled, returning error");
    Err(GenerationError::Stalled {
        node: new_node,
        passes: max_passes,
    })
}
