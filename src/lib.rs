// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

/*!
# Grid Topology Search

This is a library for enumerating and searching the alternative topologies of
an electrical network: the configurations reachable from a base grid by
switching edges out of service and by splitting nodes into sub-nodes.

The configurations form an implicit Directed Acyclic Graph (DAG) whose
vertices are [`TopologyCoords`] and whose arcs add or remove one alteration
at a time.  The DAG is never materialized; neighbors are constructed on
demand, so even combinatorially large spaces can be walked lazily.

## The `NodeId` and `EdgeId` traits

The library doesn't know about concrete node and edge types; anything
copyable, ordered and hashable works, via the blanket-implemented [`NodeId`]
and [`EdgeId`] traits.  The base network is described by an
[`AdjacencyList`], which supports parallel edges.

## Spaces and coordinates

A [`TopologySpace`] is built once from the base graph with
[`try_new`][TopologySpace::try_new]: it enumerates the switchable edges and
every legal split of every node, under the limits in a [`TopologyConfig`].
Construction fails with an [`Error`] if the base graph already violates the
configured minimum degree.

[`root`][TopologySpace::root] yields the coordinate of the unaltered base
topology.  From there, [`e_children`][TopologyCoords::e_children] and
[`n_children`][TopologyCoords::n_children] add one alteration, their parent
counterparts remove one, and the traversal functions in [`search`] walk the
DAG breadth first to a bounded depth.

## Guards

Candidates are pruned by guards, plain predicates over coordinates.  The
built-in ones are [`degree_guard`][guards::degree_guard] and
[`k_edge_guard`][connectivity::k_edge_guard]; external power-flow solvers
plug in through [`PowerFlowEvaluator`] and
[`evaluator_guard`][evaluator_guard].  A rejected candidate is dropped, and
the search continues elsewhere.
*/

pub mod adjacency;
pub use adjacency::{AdjacencyList, EffectiveNode};

mod config;
pub use config::TopologyConfig;

mod error;
pub use error::Error;

mod evaluator;
pub use evaluator::{
    evaluator_guard, NetworkAdapter, PowerFlowEvaluator, PowerFlowReport, PowerFlowStatus,
};

pub mod search;

mod topology;
pub use topology::{connectivity, coords, guards, spaces, TopologyCoords, TopologySpace};

mod traits;
pub use traits::{EdgeId, NodeId};
