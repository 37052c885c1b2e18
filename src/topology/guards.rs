// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Admissibility guards: total predicates over candidate coordinates.
//!
//! A guard never errors; it answers whether one candidate coordinate is
//! admissible, and the search engine drops the inadmissible ones.  Guard
//! *construction* is where configuration errors surface: a base graph that
//! already violates the requested property is rejected before any search
//! work is done.

use std::collections::BTreeMap;

use crate::adjacency::{self, AdjacencyList};
use crate::topology::spaces::check_min_degree;
use crate::topology::TopologyCoords;
use crate::{EdgeId, Error, NodeId};

/// A boxed admissibility predicate.
pub type Guard<'a, C> = Box<dyn FnMut(&C) -> bool + 'a>;

/// Combines several guards with a short-circuiting logical AND.
pub struct GuardSet<'a, C>(Vec<Guard<'a, C>>);

impl<'a, C> GuardSet<'a, C> {
    /// Creates an empty guard set, which admits everything.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a guard to the set.
    pub fn push(&mut self, guard: impl FnMut(&C) -> bool + 'a) {
        self.0.push(Box::new(guard));
    }

    /// Returns true if every guard admits the coordinate, stopping at the
    /// first rejection.
    pub fn admits(&mut self, coords: &C) -> bool {
        self.0.iter_mut().all(|guard| guard(coords))
    }
}

impl<C> Default for GuardSet<'_, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the minimum-degree guard for the given base graph.
///
/// Fails fast if the base graph already violates `min_degree`.  The
/// returned predicate recomputes only the degrees affected by a candidate
/// coordinate: endpoint degrees of switched edges, and in-service edge
/// counts of split cells.
pub fn degree_guard<N, E>(
    adj: &AdjacencyList<N, E>,
    min_degree: usize,
) -> Result<impl FnMut(&TopologyCoords<N, E>) -> bool, Error>
where
    N: NodeId,
    E: EdgeId,
{
    let degrees = adjacency::degree_map(adj);
    check_min_degree(&degrees, min_degree)?;

    let endpoints = adjacency::edge_endpoints(adj);
    let incident: BTreeMap<N, _> = adj.keys().map(|n| (*n, adjacency::incident(adj, n))).collect();

    tracing::debug!(min_degree, nodes = degrees.len(), "Degree guard built.");

    Ok(move |coords: &TopologyCoords<N, E>| {
        let mut degrees = degrees.clone();

        for edge in coords.e_coord().iter() {
            let Some(nodes) = endpoints.get(edge) else {
                continue;
            };
            for node in nodes {
                let Some(degree) = degrees.get_mut(node) else {
                    continue;
                };
                *degree -= 1;
                if *degree < min_degree {
                    return false;
                }
            }
        }

        for (node, split) in coords.n_coord().iter() {
            let Some(edges) = incident.get(node) else {
                return false;
            };
            for cell in split.cells() {
                let in_service = cell
                    .iter()
                    .filter(|e| edges.contains(e) && !coords.e_coord().contains(e))
                    .count();
                if in_service < min_degree {
                    return false;
                }
            }
        }

        true
    })
}
