// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The k-edge-connectivity guard.
//!
//! This is the single most expensive predicate in the system: every
//! evaluation materializes the effective graph of the candidate coordinate
//! and runs a flow-based connectivity test on it.  It is therefore meant to
//! be invoked lazily, once per candidate produced by the move enumeration,
//! never eagerly over the whole space.

use std::collections::{BTreeMap, VecDeque};

use petgraph::graph::{NodeIndex, UnGraph};

use crate::adjacency::{self, AdjacencyList, EffectiveNode};
use crate::coords::{ECoord, NCoord};
use crate::topology::TopologyCoords;
use crate::{EdgeId, Error, NodeId};

/// Builds the k-edge-connectivity guard for the given base graph.
///
/// Fails fast if the base graph itself is not k-edge-connected.  The
/// returned predicate rebuilds the effective graph implied by a candidate
/// coordinate and tests that it is still k-edge-connected.
pub fn k_edge_guard<N, E>(
    adj: &AdjacencyList<N, E>,
    k: usize,
) -> Result<impl FnMut(&TopologyCoords<N, E>) -> bool, Error>
where
    N: NodeId,
    E: EdgeId,
{
    let base = effective_graph(adj, &ECoord::default(), &NCoord::default());
    if !is_k_edge_connected(&base, k) {
        return Err(Error::not_connected(format!(
            "Base graph is not {}-edge-connected.",
            k
        )));
    }

    tracing::debug!(
        k,
        nodes = base.node_count(),
        edges = base.edge_count(),
        "Connectivity guard built."
    );

    let adj = adj.clone();
    Ok(move |coords: &TopologyCoords<N, E>| {
        let graph = effective_graph(&adj, coords.e_coord(), coords.n_coord());
        is_k_edge_connected(&graph, k)
    })
}

/// Materializes the effective graph of a coordinate as an undirected
/// multigraph.
///
/// Sub-nodes of split nodes become vertices of their own; switched edges
/// are absent.  An in-service edge connects the two effective nodes whose
/// incidence sets contain it; an edge left with fewer than two effective
/// endpoints (one end in no cell of a split) connects nothing.
pub(crate) fn effective_graph<N, E>(
    adj: &AdjacencyList<N, E>,
    e_coord: &ECoord<E>,
    n_coord: &NCoord<N, E>,
) -> UnGraph<(), ()>
where
    N: NodeId,
    E: EdgeId,
{
    let incidence = adjacency::effective_incidence(adj, e_coord, n_coord);

    let mut graph = UnGraph::new_undirected();
    let mut indices: BTreeMap<EffectiveNode<N>, NodeIndex> = BTreeMap::new();
    for node in incidence.keys() {
        indices.insert(*node, graph.add_node(()));
    }

    let mut ends: BTreeMap<E, Vec<NodeIndex>> = BTreeMap::new();
    for (node, edges) in &incidence {
        for edge in edges {
            ends.entry(*edge).or_default().push(indices[node]);
        }
    }

    for nodes in ends.into_values() {
        if let [a, b] = nodes[..] {
            graph.add_edge(a, b, ());
        }
    }

    graph
}

/// Returns true if the graph cannot be disconnected by removing fewer than
/// `k` edges.
///
/// Uses the flow characterization: the graph is k-edge-connected iff the
/// local edge connectivity between a fixed node and every other node is at
/// least k.  Each pair needs at most `k` augmenting-path searches.
pub(crate) fn is_k_edge_connected(graph: &UnGraph<(), ()>, k: usize) -> bool {
    let nodes: Vec<NodeIndex> = graph.node_indices().collect();
    if k == 0 || nodes.len() < 2 {
        return true;
    }

    let source = nodes[0];
    nodes[1..]
        .iter()
        .all(|&target| local_edge_connectivity(graph, source, target, k) >= k)
}

/// Counts edge-disjoint paths between `source` and `target`, stopping at
/// `cap`.
///
/// Unit-capacity max flow by breadth-first augmenting paths.  Each
/// undirected edge carries flow in {-1, 0, 1} relative to its stored
/// direction; a path may traverse an edge in either direction with the
/// remaining capacity.
fn local_edge_connectivity(
    graph: &UnGraph<(), ()>,
    source: NodeIndex,
    target: NodeIndex,
    cap: usize,
) -> usize {
    // Incidence with traversal direction: +1 along the stored direction,
    // -1 against it.
    let mut outgoing: Vec<Vec<(usize, NodeIndex, i8)>> = vec![Vec::new(); graph.node_count()];
    for (index, edge) in graph.raw_edges().iter().enumerate() {
        outgoing[edge.source().index()].push((index, edge.target(), 1));
        outgoing[edge.target().index()].push((index, edge.source(), -1));
    }

    let mut flow: Vec<i8> = vec![0; graph.edge_count()];
    let mut value = 0;

    while value < cap {
        let mut parent: Vec<Option<(NodeIndex, usize, i8)>> = vec![None; graph.node_count()];
        let mut queue = VecDeque::from([source]);

        'search: while let Some(node) = queue.pop_front() {
            for &(edge, next, direction) in &outgoing[node.index()] {
                if next == source || parent[next.index()].is_some() {
                    continue;
                }
                // No residual capacity left in this traversal direction.
                if flow[edge] == direction {
                    continue;
                }
                parent[next.index()] = Some((node, edge, direction));
                if next == target {
                    break 'search;
                }
                queue.push_back(next);
            }
        }

        if parent[target.index()].is_none() {
            break;
        }

        let mut at = target;
        while at != source {
            let Some((previous, edge, direction)) = parent[at.index()] else {
                break;
            };
            flow[edge] += direction;
            at = previous;
        }
        value += 1;
    }

    value
}
