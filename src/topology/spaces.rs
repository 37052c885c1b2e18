// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Construction of the coordinate spaces from the base graph.
//!
//! The spaces are built once, before any search: [`make_e_space`] collects
//! the edges that may legally be switched, and [`make_n_space`] enumerates
//! every legal split of every node.  The split enumeration is the expensive
//! combinatorial step of the whole system and is deliberately paid here,
//! once per node, instead of during traversal.

use std::collections::{BTreeMap, BTreeSet};

use crate::adjacency::{self, AdjacencyList};
use crate::coords::{ESpace, NSpace, NodeSplit};
use crate::{EdgeId, Error, NodeId, TopologyConfig};

/// Fails with a configuration error if any node is below the minimum degree.
pub(crate) fn check_min_degree<N>(
    degrees: &BTreeMap<N, usize>,
    min_degree: usize,
) -> Result<(), Error>
where
    N: NodeId,
{
    let below_min: Vec<N> = degrees
        .iter()
        .filter(|(_, d)| **d < min_degree)
        .map(|(n, _)| *n)
        .collect();

    if !below_min.is_empty() {
        return Err(Error::minimum_degree(format!(
            "Nodes {:?} are below the minimum degree {}.",
            below_min, min_degree
        )));
    }

    Ok(())
}

/// Builds the space of switchable edges.
///
/// Fails if the base graph already violates the minimum degree.  Edges with
/// an endpoint sitting exactly at the minimum degree can never be switched
/// and are excluded, along with the caller-supplied exclusions.
pub fn make_e_space<N, E>(
    edges: impl IntoIterator<Item = E>,
    adj: &AdjacencyList<N, E>,
    min_degree: usize,
    exclude: &BTreeSet<E>,
) -> Result<ESpace<E>, Error>
where
    N: NodeId,
    E: EdgeId,
{
    let degrees = adjacency::degree_map(adj);
    check_min_degree(&degrees, min_degree)?;

    let mut excluded = exclude.clone();
    for (node, degree) in &degrees {
        if *degree == min_degree {
            excluded.extend(adjacency::incident(adj, node));
        }
    }

    let space = ESpace::new(edges.into_iter().filter(|e| !excluded.contains(e)));
    tracing::debug!(
        switchable = space.len(),
        excluded = excluded.len(),
        "Edge space built."
    );

    Ok(space)
}

/// Builds the space of legal node splits.
///
/// `nodes` maps each splittable node to its candidate elements; elements
/// that are not edges of the adjacency list are treated as terminal elements
/// and distributed over the split cells.  Fails if the base graph already
/// violates the minimum degree.
pub fn make_n_space<N, E>(
    nodes: impl IntoIterator<Item = (N, BTreeSet<E>)>,
    adj: &AdjacencyList<N, E>,
    config: &TopologyConfig<N, E>,
) -> Result<NSpace<N, E>, Error>
where
    N: NodeId,
    E: EdgeId,
{
    check_min_degree(&adjacency::degree_map(adj), config.min_degree)?;

    let mut space = BTreeMap::new();
    for (node, elements) in nodes {
        let splits = node_splits(
            &node,
            &elements,
            adj,
            config.min_degree,
            config.max_splits_for(&node),
        )?;
        space.insert(node, splits);
    }

    tracing::debug!(
        nodes = space.len(),
        splits = space.values().map(BTreeSet::len).sum::<usize>(),
        "Node space built."
    );

    Ok(NSpace::new(space))
}

/// Enumerates every legal split of one node.
///
/// The intersection of `elements` with the node's incident edges is
/// partitioned into 2..=`max_splits` disjoint cells of at least `min_degree`
/// edges each; the remaining (terminal) elements are then distributed over
/// the produced cells in every possible way.  Unordered duplicates are
/// collapsed.  Fails if the node is unknown or its degree is below
/// `min_degree`.
pub fn node_splits<N, E>(
    node: &N,
    elements: &BTreeSet<E>,
    adj: &AdjacencyList<N, E>,
    min_degree: usize,
    max_splits: usize,
) -> Result<BTreeSet<NodeSplit<E>>, Error>
where
    N: NodeId,
    E: EdgeId,
{
    if !adj.contains_key(node) {
        return Err(Error::node_not_found(format!(
            "Node {:?} not found in the adjacency list.",
            node
        )));
    }

    let incident = adjacency::incident(adj, node);
    if incident.len() < min_degree {
        return Err(Error::minimum_degree(format!(
            "Node {:?} has degree {} below the minimum degree {}.",
            node,
            incident.len(),
            min_degree
        )));
    }

    let connected: BTreeSet<E> = elements.intersection(&incident).copied().collect();
    let rest: BTreeSet<E> = elements.difference(&incident).copied().collect();

    let mut partitions = splits(&connected, min_degree, max_splits);
    // The one-cell result is the unsplit node, not a split.
    partitions.retain(|cells| cells.len() >= 2);

    let distributed = distribute(&rest, partitions);

    Ok(distributed.into_iter().map(NodeSplit::new).collect())
}

/// All ordered partitions of `items` into disjoint cells of at least
/// `min_size` members each, with at most `max_splits` cells.
///
/// The undivided whole is always among the results (callers drop it when
/// only proper splits are wanted).  Beyond that, the first cell is picked by
/// combination over legal sizes and the remainder is partitioned with one
/// cell fewer.  Callers collapse the ordered duplicates.
fn splits<E>(items: &BTreeSet<E>, min_size: usize, max_splits: usize) -> Vec<Vec<BTreeSet<E>>>
where
    E: EdgeId,
{
    let mut found = vec![vec![items.clone()]];
    if items.len() < 2 * min_size || max_splits < 2 {
        return found;
    }

    let ordered: Vec<E> = items.iter().copied().collect();

    for size in min_size..=(items.len() - min_size) {
        for cell in combinations(&ordered, size) {
            let cell: BTreeSet<E> = cell.into_iter().collect();
            let remainder: BTreeSet<E> = items.difference(&cell).copied().collect();
            for mut sub_split in splits(&remainder, min_size, max_splits - 1) {
                let mut cells = Vec::with_capacity(sub_split.len() + 1);
                cells.push(cell.clone());
                cells.append(&mut sub_split);
                found.push(cells);
            }
        }
    }

    found
}

/// All ways to assign every element of `rest` to one cell of each partition.
fn distribute<E>(rest: &BTreeSet<E>, partitions: Vec<Vec<BTreeSet<E>>>) -> Vec<Vec<BTreeSet<E>>>
where
    E: EdgeId,
{
    let mut current = partitions;

    for element in rest {
        let mut grown = Vec::with_capacity(current.len());
        for cells in &current {
            for index in 0..cells.len() {
                let mut placed = cells.clone();
                placed[index].insert(*element);
                grown.push(placed);
            }
        }
        current = grown;
    }

    current
}

/// All `size`-element combinations of `items`, by index worklist.
fn combinations<E>(items: &[E], size: usize) -> Vec<Vec<E>>
where
    E: EdgeId,
{
    if size > items.len() {
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut indices: Vec<usize> = (0..size).collect();

    loop {
        found.push(indices.iter().map(|&i| items[i]).collect());

        // Rightmost index that can still advance.
        let mut at = size;
        loop {
            if at == 0 {
                return found;
            }
            at -= 1;
            if indices[at] != at + items.len() - size {
                break;
            }
        }

        indices[at] += 1;
        for next in at + 1..size {
            indices[next] = indices[next - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::test_utils::{alist, set};

    #[test]
    fn test_combinations() {
        let items = ['a', 'b', 'c', 'd'];
        assert_eq!(combinations(&items, 2).len(), 6);
        assert_eq!(combinations(&items, 4), vec![items.to_vec()]);
        assert_eq!(combinations(&items, 0), vec![Vec::<char>::new()]);
        assert!(combinations(&items, 5).is_empty());
    }

    #[test]
    fn test_e_space_excludes_minimum_degree_endpoints() {
        // 4-cycle: every edge sits at a degree-2 endpoint.
        let adj = alist(&[(1, 2, 'a'), (2, 3, 'b'), (3, 4, 'c'), (4, 1, 'd')]);

        let space = make_e_space("abcd".chars(), &adj, 2, &BTreeSet::new()).unwrap();
        assert!(space.is_empty());

        // min_degree 1: nothing is at the floor, caller exclusions apply.
        let space = make_e_space("abcd".chars(), &adj, 1, &set(['d'])).unwrap();
        assert_eq!(space, ESpace::new("abc".chars()));
    }

    #[test]
    fn test_e_space_fails_below_minimum_degree() {
        let adj = alist(&[(1, 2, 'a'), (2, 3, 'b'), (3, 4, 'c'), (4, 1, 'd')]);

        assert_eq!(
            make_e_space("abcd".chars(), &adj, 3, &BTreeSet::new()),
            Err(Error::minimum_degree(
                "Nodes [1, 2, 3, 4] are below the minimum degree 3."
            ))
        );
    }

    #[test]
    fn test_node_splits_degree_four_star() {
        let adj = alist(&[(1, 2, 'a'), (1, 3, 'b'), (1, 4, 'c'), (1, 5, 'd')]);

        let found = node_splits(&1, &set(['a', 'b', 'c', 'd']), &adj, 2, 2).unwrap();

        // The 3 distinct unordered 2|2 partitions of 4 edges.
        let expected: BTreeSet<_> = [
            NodeSplit::new([set(['a', 'b']), set(['c', 'd'])]),
            NodeSplit::new([set(['a', 'c']), set(['b', 'd'])]),
            NodeSplit::new([set(['a', 'd']), set(['b', 'c'])]),
        ]
        .into_iter()
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_node_splits_at_the_degree_floor_is_empty() {
        let adj = alist(&[(1, 2, 'a'), (2, 3, 'b'), (3, 1, 'c')]);

        let found = node_splits(&1, &set(['a', 'c']), &adj, 2, 2).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_node_splits_errors() {
        let adj = alist(&[(1, 2, 'a'), (2, 3, 'b'), (3, 1, 'c')]);

        assert_eq!(
            node_splits(&9, &set(['a']), &adj, 2, 2),
            Err(Error::node_not_found(
                "Node 9 not found in the adjacency list."
            ))
        );
        assert_eq!(
            node_splits(&1, &set(['a', 'c']), &adj, 3, 2),
            Err(Error::minimum_degree(
                "Node 1 has degree 2 below the minimum degree 3."
            ))
        );
    }

    #[test]
    fn test_node_splits_distributes_terminal_elements() {
        let adj = alist(&[(1, 2, 'a'), (1, 3, 'b'), (1, 4, 'c'), (1, 5, 'd')]);

        // 't' is not an edge of the adjacency list: it goes to one cell of
        // each of the 3 base partitions, in both possible ways.
        let found = node_splits(&1, &set(['a', 'b', 'c', 'd', 't']), &adj, 2, 2).unwrap();
        assert_eq!(found.len(), 6);
        assert!(found.contains(&NodeSplit::new([set(['a', 'b', 't']), set(['c', 'd'])])));
        assert!(found.contains(&NodeSplit::new([set(['a', 'b']), set(['c', 'd', 't'])])));
    }

    #[test]
    fn test_three_way_splits() {
        let adj = alist(&[
            (1, 2, 'a'),
            (1, 3, 'b'),
            (1, 4, 'c'),
            (1, 5, 'd'),
            (1, 6, 'e'),
            (1, 7, 'f'),
        ]);
        let elements = set(['a', 'b', 'c', 'd', 'e', 'f']);

        // 6 edges, cells of >= 2: 2|4 and 3|3 and 2|2|2 shapes.
        let pairs = node_splits(&1, &elements, &adj, 2, 2).unwrap();
        let with_triples = node_splits(&1, &elements, &adj, 2, 3).unwrap();

        // C(6,2)/1 + C(6,3)/2 = 15 + 10 two-cell partitions; 15 more of
        // shape 2|2|2.
        assert_eq!(pairs.len(), 25);
        assert_eq!(with_triples.len(), 40);
        assert!(with_triples.is_superset(&pairs));
    }

    #[test]
    fn test_n_space_respects_per_node_overrides() {
        let adj = alist(&[
            (1, 2, 'a'),
            (1, 3, 'b'),
            (1, 4, 'c'),
            (1, 5, 'd'),
            (2, 3, 'e'),
            (3, 4, 'f'),
            (4, 5, 'g'),
            (5, 2, 'h'),
        ]);

        let nodes = [(1, set(['a', 'b', 'c', 'd'])), (2, set(['a', 'e', 'h']))];

        let config = TopologyConfig::default();
        let space = make_n_space(nodes.clone(), &adj, &config).unwrap();
        assert_eq!(space.get(&1).unwrap().len(), 3);
        // Degree 3 cannot be divided into two cells of 2.
        assert!(space.get(&2).unwrap().is_empty());

        let mut config = TopologyConfig::default();
        config.max_splits_per_node.insert(1, 1);
        let space = make_n_space(nodes, &adj, &config).unwrap();
        // A single-cell budget leaves node 1 unsplittable.
        assert!(space.get(&1).unwrap().is_empty());
    }
}
