// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Topology coordinates: the implicit DAG of structural alterations to the
//! base network, and the machinery to build and prune it.

pub mod connectivity;
pub mod coords;
pub mod guards;
mod moves;
pub mod spaces;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::adjacency::{self, AdjacencyList};
use crate::coords::{ECoord, ESpace, NCoord, NSpace};
use crate::{EdgeId, Error, NodeId, TopologyConfig};

/// The universes of legal moves, shared read-only by every coordinate
/// derived from them.
///
/// Built once from the base graph; coordinates hold an [`Arc`] to their
/// space, so navigating the DAG never copies it.
#[derive(Debug)]
pub struct TopologySpace<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    e_space: ESpace<E>,
    n_space: NSpace<N, E>,
    edges: BTreeSet<E>,
}

impl<N, E> TopologySpace<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// Builds the coordinate space for the given base graph.
    ///
    /// Every node is a split candidate with its full incident-edge set;
    /// returns an error if the base graph already violates the configured
    /// minimum degree.
    pub fn try_new(adj: &AdjacencyList<N, E>, config: &TopologyConfig<N, E>) -> Result<Self, Error> {
        let edges = adjacency::elements(adj);
        let e_space = spaces::make_e_space(
            edges.iter().copied(),
            adj,
            config.min_degree,
            &config.exclude_edges,
        )?;

        let nodes = adj.keys().map(|n| (*n, adjacency::incident(adj, n)));
        let n_space = spaces::make_n_space(nodes, adj, config)?;

        Ok(Self {
            e_space,
            n_space,
            edges,
        })
    }

    /// Assembles a space from prebuilt universes.
    ///
    /// `edges` is the full edge set of the base graph, used to tell edges
    /// from terminal elements inside split cells.
    pub fn from_spaces(e_space: ESpace<E>, n_space: NSpace<N, E>, edges: BTreeSet<E>) -> Self {
        Self {
            e_space,
            n_space,
            edges,
        }
    }

    /// The universe of switchable edges.
    pub fn e_space(&self) -> &ESpace<E> {
        &self.e_space
    }

    /// The universe of legal node splits.
    pub fn n_space(&self) -> &NSpace<N, E> {
        &self.n_space
    }

    /// Returns the root coordinate: the unaltered base topology.
    pub fn root(self: &Arc<Self>) -> TopologyCoords<N, E> {
        TopologyCoords {
            e_coord: ECoord::default(),
            n_coord: NCoord::default(),
            space: Arc::clone(self),
        }
    }

    /// Returns true if the given cell member is an edge of the base graph.
    pub(crate) fn is_edge(&self, element: &E) -> bool {
        self.edges.contains(element)
    }
}

/// One alternative network configuration: the pair of a switched-edge set
/// and a node-split assignment.
///
/// Coordinates are immutable and are the vertex type of the implicit DAG;
/// moving along the DAG constructs fresh coordinates sharing the same
/// space.  Equality and hashing cover the two coordinate components only.
#[derive(Clone)]
pub struct TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    e_coord: ECoord<E>,
    n_coord: NCoord<N, E>,
    space: Arc<TopologySpace<N, E>>,
}

impl<N, E> TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    /// The set of edges switched out of service.
    pub fn e_coord(&self) -> &ECoord<E> {
        &self.e_coord
    }

    /// The mapping of split nodes to their chosen splits.
    pub fn n_coord(&self) -> &NCoord<N, E> {
        &self.n_coord
    }

    /// The space this coordinate was derived from.
    pub fn space(&self) -> &TopologySpace<N, E> {
        &self.space
    }
}

impl<N, E> PartialEq for TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    fn eq(&self, other: &Self) -> bool {
        self.e_coord == other.e_coord && self.n_coord == other.n_coord
    }
}

impl<N, E> Eq for TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
}

impl<N, E> std::hash::Hash for TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e_coord.hash(state);
        self.n_coord.hash(state);
    }
}

impl<N, E> std::fmt::Debug for TopologyCoords<N, E>
where
    N: NodeId,
    E: EdgeId,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopologyCoords")
            .field("e_coord", &self.e_coord)
            .field("n_coord", &self.n_coord)
            .finish()
    }
}
