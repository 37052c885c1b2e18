// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the traits that need to be implemented by the types
//! that identify nodes and edges of the base network.
//!
//! Both are blanket-implemented, so any copyable, totally ordered, hashable
//! id type (grid bus and branch ids in the motivating use case) works out of
//! the box.

use std::fmt::Debug;
use std::hash::Hash;

/// Identifier of a node in the base network.
pub trait NodeId: Copy + Eq + Ord + Hash + Debug {}

impl<T> NodeId for T where T: Copy + Eq + Ord + Hash + Debug {}

/// Identifier of an edge, or of a terminal element attached to a node, in
/// the base network.
pub trait EdgeId: Copy + Eq + Ord + Hash + Debug {}

impl<T> EdgeId for T where T: Copy + Eq + Ord + Hash + Debug {}
