//! Shared test utilities for `hierograph-core`.

use hierograph_test_support::proptest_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::graph::{Graph, NodeId};

/// Builds a standard proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds the path `0 -> 1 -> ... -> len - 1`.
#[must_use]
pub(crate) fn chain(len: usize) -> Graph {
    let mut graph = Graph::with_nodes(len).expect("chain length must fit the alphabet");
    for target in 1..len {
        graph
            .add_edge(NodeId::new(target - 1), NodeId::new(target))
            .expect("chain endpoints exist");
    }
    graph
}
