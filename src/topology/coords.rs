// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Immutable value types for topology coordinates and their universes.
//!
//! All types here are thin newtypes over ordered collections, so structural
//! equality, hashing, ordering, and deterministic iteration come directly
//! from the representation.  Instances are never mutated; `with`/`without`
//! construct fresh values.

use std::collections::{btree_map, btree_set, BTreeMap, BTreeSet};

use crate::{EdgeId, NodeId};

/// The set of edges currently switched out of service.
///
/// Every edge in an `ECoord` belongs to the [`ESpace`] it was derived from.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ECoord<E>(BTreeSet<E>)
where
    E: EdgeId;

impl<E> Default for ECoord<E>
where
    E: EdgeId,
{
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<E> ECoord<E>
where
    E: EdgeId,
{
    /// Returns true if the given edge is switched out.
    pub fn contains(&self, edge: &E) -> bool {
        self.0.contains(edge)
    }

    /// Returns the number of switched edges.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no edge is switched out.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the switched edges, in edge order.
    pub fn iter(&self) -> btree_set::Iter<'_, E> {
        self.0.iter()
    }

    /// Returns a new `ECoord` with the given edge switched out.
    pub fn with(&self, edge: E) -> Self {
        let mut edges = self.0.clone();
        edges.insert(edge);
        Self(edges)
    }

    /// Returns a new `ECoord` with the given edge back in service.
    pub fn without(&self, edge: &E) -> Self {
        let mut edges = self.0.clone();
        edges.remove(edge);
        Self(edges)
    }
}

impl<E> FromIterator<E> for ECoord<E>
where
    E: EdgeId,
{
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One partition of a node's incident elements into at least two disjoint,
/// non-empty cells.
///
/// Partitions are unordered: two splits with the same cells compare equal
/// regardless of the order they were enumerated in.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeSplit<E>(BTreeSet<BTreeSet<E>>)
where
    E: EdgeId;

impl<E> NodeSplit<E>
where
    E: EdgeId,
{
    /// Creates a split from the given cells.
    pub fn new(cells: impl IntoIterator<Item = BTreeSet<E>>) -> Self {
        Self(cells.into_iter().collect())
    }

    /// Returns the number of cells in the split.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the split has no cells.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the cells, in cell order.
    ///
    /// The cell order is what assigns sub-node indices in
    /// [`EffectiveNode::Part`][crate::EffectiveNode::Part].
    pub fn cells(&self) -> btree_set::Iter<'_, BTreeSet<E>> {
        self.0.iter()
    }
}

/// The mapping from split nodes to their chosen split.
///
/// A node absent from the mapping is not split; all its incident elements
/// remain on the single original node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NCoord<N, E>(BTreeMap<N, NodeSplit<E>>)
where
    N: NodeId,
    E: EdgeId;

impl<N, E> Default for NCoord<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<N, E> NCoord<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// Returns true if the given node is split.
    pub fn contains(&self, node: &N) -> bool {
        self.0.contains_key(node)
    }

    /// Returns the split chosen for the given node, if it is split.
    pub fn get(&self, node: &N) -> Option<&NodeSplit<E>> {
        self.0.get(node)
    }

    /// Returns the number of split nodes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no node is split.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the split nodes and their splits, in node
    /// order.
    pub fn iter(&self) -> btree_map::Iter<'_, N, NodeSplit<E>> {
        self.0.iter()
    }

    /// Returns a new `NCoord` with the given node split as given.
    pub fn with(&self, node: N, split: NodeSplit<E>) -> Self {
        let mut splits = self.0.clone();
        splits.insert(node, split);
        Self(splits)
    }

    /// Returns a new `NCoord` with the given node no longer split.
    pub fn without(&self, node: &N) -> Self {
        let mut splits = self.0.clone();
        splits.remove(node);
        Self(splits)
    }
}

/// The universe of edges eligible to be switched.
///
/// Derived once from the base graph; excludes edges whose removal would
/// immediately push an incident node below the minimum degree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ESpace<E>(BTreeSet<E>)
where
    E: EdgeId;

impl<E> ESpace<E>
where
    E: EdgeId,
{
    /// Creates an edge space from the given edges.
    pub fn new(edges: impl IntoIterator<Item = E>) -> Self {
        Self(edges.into_iter().collect())
    }

    /// Returns true if the given edge is eligible to be switched.
    pub fn contains(&self, edge: &E) -> bool {
        self.0.contains(edge)
    }

    /// Returns the number of switchable edges.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no edge is switchable.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the switchable edges, in edge order.
    pub fn iter(&self) -> btree_set::Iter<'_, E> {
        self.0.iter()
    }
}

/// The universe of legal splits for every splittable node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NSpace<N, E>(BTreeMap<N, BTreeSet<NodeSplit<E>>>)
where
    N: NodeId,
    E: EdgeId;

impl<N, E> NSpace<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// Creates a node space from the given per-node splits.
    pub fn new(splits: impl IntoIterator<Item = (N, BTreeSet<NodeSplit<E>>)>) -> Self {
        Self(splits.into_iter().collect())
    }

    /// Returns the legal splits for the given node.
    ///
    /// Nodes without a legal split map to an empty set.
    pub fn get(&self, node: &N) -> Option<&BTreeSet<NodeSplit<E>>> {
        self.0.get(node)
    }

    /// Returns an iterator over the nodes and their legal splits, in node
    /// order.
    pub fn iter(&self) -> btree_map::Iter<'_, N, BTreeSet<NodeSplit<E>>> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::test_utils::set;

    #[test]
    fn test_e_coord() {
        let empty: ECoord<char> = ECoord::default();
        assert!(empty.is_empty());

        let one = empty.with('a');
        let two = one.with('b');
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert!(two.contains(&'a') && two.contains(&'b'));
        assert_eq!(two.without(&'b'), one);
        assert_eq!(two.with('a'), two);

        let rebuilt: ECoord<char> = ['b', 'a'].into_iter().collect();
        assert_eq!(rebuilt, two);
    }

    #[test]
    fn test_node_split_is_unordered() {
        let ab_cd = NodeSplit::new([set(['a', 'b']), set(['c', 'd'])]);
        let cd_ab = NodeSplit::new([set(['c', 'd']), set(['a', 'b'])]);
        assert_eq!(ab_cd, cd_ab);
        assert_eq!(ab_cd.len(), 2);
    }

    #[test]
    fn test_n_coord() {
        let split = NodeSplit::new([set(['a', 'b']), set(['c', 'd'])]);
        let empty: NCoord<u64, char> = NCoord::default();

        let one = empty.with(1, split.clone());
        assert!(empty.is_empty());
        assert!(one.contains(&1));
        assert_eq!(one.get(&1), Some(&split));
        assert_eq!(one.without(&1), empty);
        assert_eq!(one.without(&2), one);
    }
}
