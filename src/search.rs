// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! The generic, depth-bounded search engine over implicitly defined graphs.
//!
//! Graphs here are never materialized: a coordinate knows how to produce its
//! neighbors on demand, and the engine explores the implied graph level by
//! level, deduplicating and filtering through a caller-supplied guard.  Any
//! type implementing the traits below can be explored; topology coordinates
//! are one instantiation.

mod explore;

pub use explore::{
    accept_all, adjacent, ancestors, area, children, descendants, explore, neighborhood, parents,
    reach,
};

use std::hash::Hash;

/// A coordinate of an implicitly defined graph.
///
/// Equality and hashing must be structural: two coordinates naming the same
/// vertex must compare equal, because the engine deduplicates through them.
pub trait GraphCoords: Clone + Eq + Hash {
    /// Returns the coordinates adjacent to this one.
    ///
    /// The order must be deterministic for a fixed coordinate, so that
    /// searches are reproducible.
    fn adjacent(&self) -> Vec<Self>;

    /// Returns true if `other` is adjacent to this coordinate.
    fn is_adjacent(&self, other: &Self) -> bool {
        self.adjacent().iter().any(|coords| coords == other)
    }
}

/// A coordinate of an implicitly defined directed acyclic graph.
pub trait DagCoords: GraphCoords {
    /// Returns the child coordinates of this one.
    fn children(&self) -> Vec<Self>;

    /// Returns the parent coordinates of this one.
    fn parents(&self) -> Vec<Self>;

    /// Returns true if this coordinate is a child of `other`.
    fn is_child(&self, other: &Self) -> bool {
        self.parents().iter().any(|coords| coords == other)
    }

    /// Returns true if this coordinate is a parent of `other`.
    fn is_parent(&self, other: &Self) -> bool {
        self.children().iter().any(|coords| coords == other)
    }
}
