// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Interface boundaries of the external collaborators.
//!
//! The core consumes a power-flow solver only as an optional guard or
//! scorer, and a grid-model adapter only as the producer of the base
//! adjacency description and the consumer of chosen coordinates.  Neither
//! is implemented here.

use crate::adjacency::AdjacencyList;
use crate::topology::TopologyCoords;
use crate::{EdgeId, NodeId};

/// Outcome of a power-flow evaluation.
///
/// Non-convergence is ordinary data, not an error: a coordinate for which
/// the solver fails to converge is simply not admissible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerFlowStatus {
    /// The solver converged on the evaluated topology.
    Converged,
    /// The solver did not converge; the result carries no numbers.
    NotConverged,
}

/// Result of evaluating one topology coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerFlowReport {
    /// Whether the solver converged.
    pub status: PowerFlowStatus,
    /// Highest per-unit branch loading observed, for converged runs.
    pub max_loading: Option<f64>,
}

impl PowerFlowReport {
    /// Returns true if the evaluation converged.
    pub fn converged(&self) -> bool {
        self.status == PowerFlowStatus::Converged
    }
}

/// A numerical evaluator of topology coordinates.
pub trait PowerFlowEvaluator<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// Evaluates the network configured as described by the coordinate.
    fn evaluate(&mut self, coords: &TopologyCoords<N, E>) -> PowerFlowReport;
}

/// Adapts an evaluator into an admissibility guard.
///
/// A candidate for which the evaluation does not converge is pruned; the
/// traversal itself is never aborted.
pub fn evaluator_guard<N, E, V>(mut evaluator: V) -> impl FnMut(&TopologyCoords<N, E>) -> bool
where
    N: NodeId,
    E: EdgeId,
    V: PowerFlowEvaluator<N, E>,
{
    move |coords| evaluator.evaluate(coords).converged()
}

/// The grid-model adapter seam.
///
/// Implementations translate between a concrete network model and the
/// coordinate representation used here.
pub trait NetworkAdapter<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// The adapter's own error type.
    type Error;

    /// Derives the base adjacency description from the network model.
    fn adjacency(&self) -> AdjacencyList<N, E>;

    /// Applies the alterations described by the coordinate to the network
    /// model.
    fn apply(&mut self, coords: &TopologyCoords<N, E>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::search::{accept_all, descendants};
    use crate::topology::test_utils::two_rings;
    use crate::topology::TopologySpace;
    use crate::TopologyConfig;

    /// Converges only while nothing is switched.
    struct SwitchAverse;

    impl PowerFlowEvaluator<u64, char> for SwitchAverse {
        fn evaluate(&mut self, coords: &TopologyCoords<u64, char>) -> PowerFlowReport {
            if coords.e_coord().is_empty() {
                PowerFlowReport {
                    status: PowerFlowStatus::Converged,
                    max_loading: Some(0.8),
                }
            } else {
                PowerFlowReport {
                    status: PowerFlowStatus::NotConverged,
                    max_loading: None,
                }
            }
        }
    }

    #[test]
    fn test_non_convergence_prunes_without_aborting() {
        let config = TopologyConfig::default();
        let space = Arc::new(TopologySpace::try_new(&two_rings(), &config).unwrap());
        let root = space.root();

        let all = descendants(&root, 1, accept_all).unwrap();
        let admitted = descendants(&root, 1, evaluator_guard(SwitchAverse)).unwrap();

        // The two edge switches are pruned; the six splits survive.
        assert_eq!(all.len(), 9);
        assert_eq!(admitted.len(), 7);
        assert!(admitted.iter().all(|c| c.e_coord().is_empty()));
    }
}
