// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The legal moves between topology coordinates.
//!
//! Children add one alteration (switch one more edge, or split one more
//! node); parents remove one.  The two dimensions are coupled: a move is
//! not offered when it would leave some split cell without a single
//! in-service edge, since such a cell no longer describes a sub-node of the
//! effective graph.  Enumeration order is deterministic for fixed inputs,
//! following the element order of the underlying spaces.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::coords::NodeSplit;
use crate::search::{DagCoords, GraphCoords};
use crate::topology::TopologyCoords;
use crate::{EdgeId, NodeId};

impl<N, E> TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// Returns the children in the edge dimension: one per switchable edge
    /// still in service, with the node coordinate held fixed.
    pub fn e_children(&self) -> Vec<Self> {
        self.space
            .e_space()
            .iter()
            .filter(|edge| !self.e_coord.contains(edge))
            .filter(|&edge| {
                self.n_coord
                    .iter()
                    .all(|(_, split)| self.split_stays_in_service(split, Some(edge)))
            })
            .map(|edge| Self {
                e_coord: self.e_coord.with(*edge),
                n_coord: self.n_coord.clone(),
                space: Arc::clone(&self.space),
            })
            .collect()
    }

    /// Returns the parents in the edge dimension: one per switched edge put
    /// back in service, with the node coordinate held fixed.
    pub fn e_parents(&self) -> Vec<Self> {
        self.e_coord
            .iter()
            .map(|edge| Self {
                e_coord: self.e_coord.without(edge),
                n_coord: self.n_coord.clone(),
                space: Arc::clone(&self.space),
            })
            .collect()
    }

    /// Returns the children in the node dimension: one per legal split of a
    /// node not yet split, with the edge coordinate held fixed.
    pub fn n_children(&self) -> Vec<Self> {
        let mut children = Vec::new();

        for (node, splits) in self.space.n_space().iter() {
            if self.n_coord.contains(node) {
                continue;
            }
            for split in splits {
                if !self.split_stays_in_service(split, None) {
                    continue;
                }
                children.push(Self {
                    e_coord: self.e_coord.clone(),
                    n_coord: self.n_coord.with(*node, split.clone()),
                    space: Arc::clone(&self.space),
                });
            }
        }

        children
    }

    /// Returns the parents in the node dimension: one per split node
    /// rejoined, with the edge coordinate held fixed.
    pub fn n_parents(&self) -> Vec<Self> {
        self.n_coord
            .iter()
            .map(|(node, _)| Self {
                e_coord: self.e_coord.clone(),
                n_coord: self.n_coord.without(node),
                space: Arc::clone(&self.space),
            })
            .collect()
    }

    /// True if every cell of the split keeps at least one in-service edge
    /// when `extra` is also switched out.
    fn split_stays_in_service(&self, split: &NodeSplit<E>, extra: Option<&E>) -> bool {
        split.cells().all(|cell| self.cell_in_service(cell, extra))
    }

    fn cell_in_service(&self, cell: &BTreeSet<E>, extra: Option<&E>) -> bool {
        cell.iter().any(|element| {
            self.space.is_edge(element)
                && !self.e_coord.contains(element)
                && Some(element) != extra
        })
    }
}

impl<N, E> GraphCoords for TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    fn adjacent(&self) -> Vec<Self> {
        let mut all = self.children();
        all.extend(self.parents());
        all
    }
}

impl<N, E> DagCoords for TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    fn children(&self) -> Vec<Self> {
        let mut all = self.e_children();
        all.extend(self.n_children());
        all
    }

    fn parents(&self) -> Vec<Self> {
        let mut all = self.e_parents();
        all.extend(self.n_parents());
        all
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::search::{accept_all, descendants, DagCoords};
    use crate::topology::test_utils::{four_cycle, two_rings};
    use crate::topology::TopologySpace;
    use crate::TopologyConfig;

    fn two_rings_space() -> Arc<TopologySpace<u64, char>> {
        let config = TopologyConfig::default();
        Arc::new(TopologySpace::try_new(&two_rings(), &config).unwrap())
    }

    #[test]
    fn test_no_edge_children_on_a_cycle() {
        let config = TopologyConfig::default();
        let space = Arc::new(TopologySpace::try_new(&four_cycle(), &config).unwrap());

        let root = space.root();
        assert!(root.e_children().is_empty());
        assert!(root.n_children().is_empty());
        assert!(root.children().is_empty());
        assert!(root.parents().is_empty());
    }

    #[test]
    fn test_children_counts() {
        let space = two_rings_space();
        let root = space.root();

        // 2 switchable edges; 3 splits each for nodes 1 and 5.
        assert_eq!(root.e_children().len(), 2);
        assert_eq!(root.n_children().len(), 6);
        assert_eq!(root.children().len(), 8);
    }

    #[test]
    fn test_children_have_no_duplicates_and_no_self() {
        let space = two_rings_space();
        let root = space.root();

        for coords in [root.clone(), root.children().swap_remove(0)] {
            let children = coords.children();
            let unique: HashSet<_> = children.iter().cloned().collect();
            assert_eq!(unique.len(), children.len());
            assert!(!children.contains(&coords));
        }
    }

    #[test]
    fn test_parents_invert_children() {
        let space = two_rings_space();
        let root = space.root();

        for child in root.children() {
            assert!(child.is_child(&root));
            assert!(root.is_parent(&child));
            assert!(child.parents().contains(&root));
        }
    }

    #[test]
    fn test_node_round_trip() {
        let space = two_rings_space();
        let root = space.root();

        for child in root.n_children() {
            let restored: Vec<_> = child
                .n_parents()
                .into_iter()
                .filter(|p| p.n_coord() == root.n_coord())
                .collect();
            assert_eq!(restored, vec![root.clone()]);
        }
    }

    #[test]
    fn test_moves_are_deterministic() {
        let space = two_rings_space();
        let root = space.root();
        assert_eq!(root.children(), root.children());
        assert_eq!(
            descendants(&root, 2, accept_all).unwrap(),
            descendants(&root, 2, accept_all).unwrap()
        );
    }

    #[test]
    fn test_switch_emptying_a_cell_is_not_offered() {
        let space = two_rings_space();
        let root = space.root();

        // Split node 1 into {a, d} | {p, q}: both joining edges end up in
        // one cell.
        let split_child = root
            .n_children()
            .into_iter()
            .find(|c| {
                c.n_coord()
                    .get(&1)
                    .is_some_and(|s| s.cells().any(|cell| cell.contains(&'p') && cell.contains(&'q')))
            })
            .unwrap();

        // Switching p leaves q in service for the cell; allowed.
        let after_p = split_child
            .e_children()
            .into_iter()
            .find(|c| c.e_coord().contains(&'p'))
            .unwrap();

        // Switching q as well would empty the cell; the move disappears.
        assert!(after_p.e_children().is_empty());
    }

    #[test]
    fn test_split_with_a_switched_out_cell_is_not_offered() {
        let space = two_rings_space();
        let mut coords = space.root();

        for edge in ['p', 'q'] {
            coords = coords
                .e_children()
                .into_iter()
                .find(|c| c.e_coord().contains(&edge))
                .unwrap();
        }

        // With p and q both out, the {a, d} | {p, q} splits of nodes 1 and
        // 5 are gone; the four splits keeping one joining edge per cell
        // remain.
        let children = coords.n_children();
        assert_eq!(children.len(), 4);
        assert!(children.iter().all(|c| {
            c.n_coord().iter().all(|(_, split)| {
                split
                    .cells()
                    .all(|cell| cell.iter().any(|e| !coords.e_coord().contains(e)))
            })
        }));
    }
}
