// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the configuration options for building a
//! [`TopologySpace`][crate::TopologySpace].

use std::collections::{BTreeMap, BTreeSet};

use crate::{EdgeId, NodeId};

/// Configuration options for building a coordinate space.
#[derive(Clone, Debug)]
pub struct TopologyConfig<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// The minimum number of in-service edges every node, and every sub-node
    /// created by a split, must keep.
    pub min_degree: usize,

    /// The maximum number of cells a single node split may produce.
    pub max_splits: usize,

    /// Per-node overrides for `max_splits`.
    pub max_splits_per_node: BTreeMap<N, usize>,

    /// Edges that must never be switched, in addition to the ones excluded
    /// by the minimum-degree rule.
    pub exclude_edges: BTreeSet<E>,
}

impl<N, E> Default for TopologyConfig<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    fn default() -> Self {
        Self {
            min_degree: 2,
            max_splits: 2,
            max_splits_per_node: BTreeMap::new(),
            exclude_edges: BTreeSet::new(),
        }
    }
}

impl<N, E> TopologyConfig<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// Returns the maximum number of split cells allowed for the given node.
    pub(crate) fn max_splits_for(&self, node: &N) -> usize {
        self.max_splits_per_node
            .get(node)
            .copied()
            .unwrap_or(self.max_splits)
    }
}
