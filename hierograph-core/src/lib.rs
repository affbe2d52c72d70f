//! Hierograph core library.
//!
//! Grows directed graphs under Price's preferential-attachment model and
//! searches for node rankings that minimise agony, the total amount by which
//! edges point against the ranking order.
//!
//! ```
//! use hierograph_core::{AgonySearch, AgonySearchParams, PriceModel, PriceModelParams};
//!
//! let graph = PriceModel::new(PriceModelParams::new(6, 1)?.with_rng_seed(1)).generate()?;
//! let outcome = AgonySearch::new(AgonySearchParams::default().with_rng_seed(2)).run(&graph)?;
//! assert_eq!(outcome.ranking().len(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod agony;
mod error;
mod generator;
mod graph;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::{
    agony::{
        AgonySearch, AgonySearchOutcome, AgonySearchParams, DEFAULT_MAX_ATTEMPTS, EdgeDirection,
        Improvement, Ranking, compute_agony, min_agony_ranking,
    },
    error::{
        AgonyError, AgonyErrorCode, GenerationError, GenerationErrorCode, GraphError,
        GraphErrorCode, ParameterConstraint,
    },
    generator::{
        AttachmentTable, DEFAULT_MAX_ATTACHMENT_PASSES, DegreeDistribution, PriceModel,
        PriceModelParams, generate,
    },
    graph::{Edge, Graph, MAX_NODES, NODE_LABELS, NodeId},
};
