//! Error types for the hierograph core library.
//!
//! Each public error enum carries a stable machine-readable code so drivers can
//! report failures without matching on display strings.

use std::fmt;

use thiserror::Error;

use crate::graph::NodeId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Identifies which generation precondition a caller violated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ParameterConstraint {
    /// The mean out-degree `m` was zero.
    MeanOutDegreeZero,
    /// The mean out-degree `m` was not strictly below the node count `n`.
    MeanOutDegreeNotBelowNodes,
    /// The node count `n` exceeded the label alphabet.
    ExceedsLabelAlphabet,
}

impl fmt::Display for ParameterConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::MeanOutDegreeZero => "m must be >= 1",
            Self::MeanOutDegreeNotBelowNodes => "m must be < n",
            Self::ExceedsLabelAlphabet => "n must not exceed the label alphabet",
        };
        f.write_str(text)
    }
}

/// An error produced while assembling a [`crate::Graph`] by hand.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// An edge endpoint referenced a node the graph does not contain.
    #[error("node {node} is not part of a graph with {node_count} nodes")]
    UnknownNode {
        /// The offending endpoint.
        node: NodeId,
        /// Number of nodes the graph holds.
        node_count: usize,
    },
    /// The graph cannot hold more nodes than there are labels.
    #[error("a graph holds at most {capacity} labelled nodes (requested {requested})")]
    CapacityExceeded {
        /// Number of nodes requested.
        requested: usize,
        /// Size of the label alphabet.
        capacity: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// An edge endpoint referenced a node the graph does not contain.
        UnknownNode => UnknownNode { .. } => "GRAPH_UNKNOWN_NODE",
        /// The graph cannot hold more nodes than there are labels.
        CapacityExceeded => CapacityExceeded { .. } => "GRAPH_CAPACITY_EXCEEDED",
    }
}

/// Error type produced by the Price's model generator.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GenerationError {
    /// `n` or `m` fell outside the supported range.
    #[error("invalid generation parameters n={nodes}, m={mean_out_degree}: {constraint}")]
    InvalidParameter {
        /// Requested node count.
        nodes: usize,
        /// Requested mean out-degree.
        mean_out_degree: usize,
        /// The precondition that failed.
        constraint: ParameterConstraint,
    },
    /// No attachment succeeded for a new node within the pass ceiling.
    #[error("node {node} received no incoming edge after {passes} attachment passes")]
    Stalled {
        /// The node that could not be attached.
        node: NodeId,
        /// Number of passes attempted before giving up.
        passes: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GenerationError`] variants.
    enum GenerationErrorCode for GenerationError {
        /// `n` or `m` fell outside the supported range.
        InvalidParameter => InvalidParameter { .. } => "GENERATION_INVALID_PARAMETER",
        /// No attachment succeeded for a new node within the pass ceiling.
        Stalled => Stalled { .. } => "GENERATION_STALLED",
    }
}

impl GenerationError {
    /// Returns the violated constraint when this is an
    /// [`GenerationError::InvalidParameter`] error.
    #[must_use]
    pub const fn constraint(&self) -> Option<ParameterConstraint> {
        match self {
            Self::InvalidParameter { constraint, .. } => Some(*constraint),
            Self::Stalled { .. } => None,
        }
    }
}

/// Error type produced while scoring or searching rankings.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AgonyError {
    /// An edge endpoint had no entry in the supplied ranking.
    #[error("ranking has no entry for node {node}")]
    MissingRank {
        /// The node lacking a rank.
        node: NodeId,
    },
    /// The graph has no nodes to draw ranks from.
    #[error("cannot rank a graph without nodes")]
    EmptyGraph,
}

define_error_codes! {
    /// Stable codes describing [`AgonyError`] variants.
    enum AgonyErrorCode for AgonyError {
        /// An edge endpoint had no entry in the supplied ranking.
        MissingRank => MissingRank { .. } => "AGONY_MISSING_RANK",
        /// The graph has no nodes to draw ranks from.
        EmptyGraph => EmptyGraph => "AGONY_EMPTY_GRAPH",
    }
}
