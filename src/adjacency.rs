// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Pure functions over the adjacency description of the base network.
//!
//! The [`AdjacencyList`] is the static input of the whole crate: it is never
//! mutated, and everything else (spaces, coordinates, guards) is derived
//! from it.  The functions here are total and side-effect free, so they are
//! safe to call repeatedly during a search.

use std::collections::{BTreeMap, BTreeSet};

use crate::coords::{ECoord, NCoord};
use crate::{EdgeId, NodeId};

/// Mapping from a node to its neighboring nodes, and for each neighbor the
/// set of edges connecting the two.  Parallel edges are represented by
/// multiple entries in the inner set.
pub type AdjacencyList<N, E> = BTreeMap<N, BTreeMap<N, BTreeSet<E>>>;

/// A node of the *effective* graph implied by a topology coordinate.
///
/// Unsplit nodes appear as [`Whole`][EffectiveNode::Whole]; a split node is
/// replaced by one [`Part`][EffectiveNode::Part] per partition cell, indexed
/// in the cell order of the split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectiveNode<N>
where
    N: NodeId,
{
    /// A node of the base network that is not split.
    Whole(N),
    /// The sub-node holding the cell with the given index of a split node.
    Part(N, usize),
}

/// Returns the set of all edges appearing in any adjacency entry.
pub fn elements<N, E>(adj: &AdjacencyList<N, E>) -> BTreeSet<E>
where
    N: NodeId,
    E: EdgeId,
{
    adj.values()
        .flat_map(|neighbors| neighbors.values())
        .flatten()
        .copied()
        .collect()
}

/// Returns the set of edges touching the given node.
pub fn incident<N, E>(adj: &AdjacencyList<N, E>, node: &N) -> BTreeSet<E>
where
    N: NodeId,
    E: EdgeId,
{
    adj.get(node)
        .map(|neighbors| neighbors.values().flatten().copied().collect())
        .unwrap_or_default()
}

/// Returns the number of edges touching the given node.
pub fn degree<N, E>(adj: &AdjacencyList<N, E>, node: &N) -> usize
where
    N: NodeId,
    E: EdgeId,
{
    incident(adj, node).len()
}

/// Returns the degree of every node in the adjacency list.
pub fn degree_map<N, E>(adj: &AdjacencyList<N, E>) -> BTreeMap<N, usize>
where
    N: NodeId,
    E: EdgeId,
{
    adj.keys().map(|n| (*n, degree(adj, n))).collect()
}

/// Returns, for every edge, the set of nodes it touches.
///
/// This is the inverse of [`incident`], computed once and shared by the
/// guards and the effective-graph construction.
pub fn edge_endpoints<N, E>(adj: &AdjacencyList<N, E>) -> BTreeMap<E, BTreeSet<N>>
where
    N: NodeId,
    E: EdgeId,
{
    let mut endpoints: BTreeMap<E, BTreeSet<N>> = BTreeMap::new();
    for (node, neighbors) in adj {
        for edge in neighbors.values().flatten() {
            endpoints.entry(*edge).or_default().insert(*node);
        }
    }
    endpoints
}

/// Returns the incident-edge set of every node of the effective graph
/// implied by the given coordinate components.
///
/// Unsplit nodes keep their full incident set minus the switched edges.
/// Split nodes are replaced by one sub-node per partition cell, each holding
/// the cell's edges minus the switched edges.  Terminal elements stored in
/// split cells are not edges of the adjacency list and do not appear in the
/// result.
pub fn effective_incidence<N, E>(
    adj: &AdjacencyList<N, E>,
    e_coord: &ECoord<E>,
    n_coord: &NCoord<N, E>,
) -> BTreeMap<EffectiveNode<N>, BTreeSet<E>>
where
    N: NodeId,
    E: EdgeId,
{
    let mut incidence = BTreeMap::new();

    for node in adj.keys() {
        let edges = incident(adj, node);
        match n_coord.get(node) {
            None => {
                let in_service = edges
                    .iter()
                    .filter(|e| !e_coord.contains(e))
                    .copied()
                    .collect();
                incidence.insert(EffectiveNode::Whole(*node), in_service);
            }
            Some(split) => {
                for (cell_index, cell) in split.cells().enumerate() {
                    let in_service = cell
                        .iter()
                        .filter(|e| edges.contains(e) && !e_coord.contains(e))
                        .copied()
                        .collect();
                    incidence.insert(EffectiveNode::Part(*node, cell_index), in_service);
                }
            }
        }
    }

    incidence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::NodeSplit;
    use crate::topology::test_utils::{alist, set};

    #[test]
    fn test_elements_and_incidence() {
        // 1 -a- 2 -b- 3 -c- 4 -d- 1
        let adj = alist(&[(1, 2, 'a'), (2, 3, 'b'), (3, 4, 'c'), (4, 1, 'd')]);

        assert_eq!(elements(&adj), set(['a', 'b', 'c', 'd']));
        assert_eq!(incident(&adj, &1), set(['a', 'd']));
        assert_eq!(incident(&adj, &3), set(['b', 'c']));
        assert_eq!(incident(&adj, &9), BTreeSet::new());
        assert_eq!(degree(&adj, &2), 2);
        assert_eq!(degree(&adj, &9), 0);

        let degrees = degree_map(&adj);
        assert!(degrees.values().all(|d| *d == 2));

        let endpoints = edge_endpoints(&adj);
        assert_eq!(endpoints[&'a'], set([1, 2]));
        assert_eq!(endpoints[&'c'], set([3, 4]));
    }

    #[test]
    fn test_effective_incidence_unsplit() {
        let adj = alist(&[(1, 2, 'a'), (2, 3, 'b'), (3, 4, 'c'), (4, 1, 'd')]);

        let e_coord = ECoord::default().with('a');
        let incidence = effective_incidence(&adj, &e_coord, &NCoord::default());

        assert_eq!(incidence[&EffectiveNode::Whole(1)], set(['d']));
        assert_eq!(incidence[&EffectiveNode::Whole(2)], set(['b']));
        assert_eq!(incidence[&EffectiveNode::Whole(3)], set(['b', 'c']));
    }

    #[test]
    fn test_effective_incidence_split() {
        // Node 1 with degree 4: star with neighbors 2..=5.
        let adj = alist(&[
            (1, 2, 'a'),
            (1, 3, 'b'),
            (1, 4, 'c'),
            (1, 5, 'd'),
            (2, 3, 'e'),
            (4, 5, 'f'),
            (3, 4, 'g'),
            (2, 5, 'h'),
        ]);

        let split = NodeSplit::new([set(['a', 'b']), set(['c', 'd'])]);
        let n_coord = NCoord::default().with(1, split);
        let incidence = effective_incidence(&adj, &ECoord::default(), &n_coord);

        assert!(!incidence.contains_key(&EffectiveNode::Whole(1)));
        assert_eq!(incidence[&EffectiveNode::Part(1, 0)], set(['a', 'b']));
        assert_eq!(incidence[&EffectiveNode::Part(1, 1)], set(['c', 'd']));
        assert_eq!(incidence[&EffectiveNode::Whole(2)], set(['a', 'e', 'h']));

        // Switching an edge removes it from the owning sub-node as well.
        let e_coord = ECoord::default().with('c');
        let incidence = effective_incidence(&adj, &e_coord, &n_coord);
        assert_eq!(incidence[&EffectiveNode::Part(1, 1)], set(['d']));
        assert_eq!(incidence[&EffectiveNode::Whole(4)], set(['f', 'g']));
    }
}
