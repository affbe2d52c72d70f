//! Parameter handling for the Price's model generator.

use crate::{
    error::{GenerationError, ParameterConstraint},
    graph::MAX_NODES,
};

/// Default ceiling on attachment passes per growth step.
pub const DEFAULT_MAX_ATTACHMENT_PASSES: usize = 100_000;

const DEFAULT_RNG_SEED: u64 = 0x5EED_CAFE;

/// Configuration for [`crate::PriceModel`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceModelParams {
    nodes: usize,
    mean_out_degree: usize,
    max_attachment_passes: usize,
    rng_seed: u64,
}

impl PriceModelParams {
    /// Creates a parameter set for `nodes` nodes grown with mean out-degree
    /// `mean_out_degree`.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidParameter`] when `mean_out_degree` is
    /// zero, when it is not below `nodes`, or when `nodes` exceeds the label
    /// alphabet.
    ///
    /// # Examples
    /// ```
    /// use hierograph_core::PriceModelParams;
    ///
    /// let params = PriceModelParams::new(12, 2)?.with_rng_seed(7);
    /// assert_eq!(params.nodes(), 12);
    /// assert_eq!(params.mean_out_degree(), 2);
    /// assert_eq!(params.rng_seed(), 7);
    /// # Ok::<(), hierograph_core::GenerationError>(())
    /// ```
    pub fn new(nodes: usize, mean_out_degree: usize) -> Result<Self, GenerationError> {
        validate(nodes, mean_out_degree)?;
        Ok(Self {
            nodes,
            mean_out_degree,
            max_attachment_passes: DEFAULT_MAX_ATTACHMENT_PASSES,
            rng_seed: DEFAULT_RNG_SEED,
        })
    }

    /// Caps how many full passes a growth step may take before failing with
    /// [`GenerationError::Stalled`]. Values below one are raised to one.
    #[must_use]
    pub fn with_max_attachment_passes(mut self, passes: usize) -> Self {
        self.max_attachment_passes = passes.max(1);
        self
    }

    /// Seeds the generator RNG so growth is reproducible.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Number of nodes in the finished graph.
    #[must_use]
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Mean out-degree `m`, also the size of the seed set.
    #[must_use]
    pub fn mean_out_degree(&self) -> usize {
        self.mean_out_degree
    }

    /// Attachment pass ceiling per growth step.
    #[must_use]
    pub fn max_attachment_passes(&self) -> usize {
        self.max_attachment_passes
    }

    /// Seed for the generator RNG.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

pub(super) fn validate(nodes: usize, mean_out_degree: usize) -> Result<(), GenerationError> {
    let constraint = if mean_out_degree < 1 {
        Some(ParameterConstraint::MeanOutDegreeZero)
    } else if mean_out_degree >= nodes {
        Some(ParameterConstraint::MeanOutDegreeNotBelowNodes)
    } else if nodes > MAX_NODES {
        Some(ParameterConstraint::ExceedsLabelAlphabet)
    } else {
        None
    };
    match constraint {
        Some(constraint) => Err(GenerationError::InvalidParameter {
            nodes,
            mean_out_degree,
            constraint,
        }),
        None => Ok(()),
    }
}
