// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Depth-bounded, guard-filtered, deduplicated exploration primitives.
//!
//! All functions are pure with respect to their inputs and produce results
//! in a deterministic order: the output is in discovery order, and the
//! one-step neighbor order of the coordinate type fixes discovery order.
//! The `seen` set owned by each call is the only mutable state; it is never
//! shared across calls.

use std::collections::HashSet;

use crate::search::{DagCoords, GraphCoords};
use crate::Error;

/// The guard that admits every coordinate.
pub fn accept_all<C>(_: &C) -> bool {
    true
}

/// Returns the adjacent coordinates admitted by the guard.
pub fn adjacent<C>(coords: &C, mut guard: impl FnMut(&C) -> bool) -> Vec<C>
where
    C: GraphCoords,
{
    coords.adjacent().into_iter().filter(|c| guard(c)).collect()
}

/// Returns the child coordinates admitted by the guard.
pub fn children<C>(coords: &C, mut guard: impl FnMut(&C) -> bool) -> Vec<C>
where
    C: DagCoords,
{
    coords.children().into_iter().filter(|c| guard(c)).collect()
}

/// Returns the parent coordinates admitted by the guard.
pub fn parents<C>(coords: &C, mut guard: impl FnMut(&C) -> bool) -> Vec<C>
where
    C: DagCoords,
{
    coords.parents().into_iter().filter(|c| guard(c)).collect()
}

/// Returns every coordinate within `depth` steps of the start, in any
/// direction.
///
/// The start coordinate is included; depth 0 yields just the start.
pub fn neighborhood<C>(
    coords: &C,
    depth: i64,
    guard: impl FnMut(&C) -> bool,
) -> Result<Vec<C>, Error>
where
    C: GraphCoords,
{
    explore(coords, |c| c.adjacent(), depth, guard)
}

/// Returns every coordinate within `depth` child-steps of the start.
///
/// The start coordinate is included; depth 0 yields just the start.
pub fn descendants<C>(
    coords: &C,
    depth: i64,
    guard: impl FnMut(&C) -> bool,
) -> Result<Vec<C>, Error>
where
    C: DagCoords,
{
    explore(coords, |c| c.children(), depth, guard)
}

/// Returns every coordinate within `depth` parent-steps of the start.
///
/// The start coordinate is included; depth 0 yields just the start.
pub fn ancestors<C>(coords: &C, depth: i64, guard: impl FnMut(&C) -> bool) -> Result<Vec<C>, Error>
where
    C: DagCoords,
{
    explore(coords, |c| c.parents(), depth, guard)
}

/// The canonical level-by-level frontier expansion.
///
/// At each of `depth` rounds, the guarded one-step image of the current
/// frontier is computed, coordinates already seen are dropped, and the rest
/// become the new frontier.  Terminates after exactly `depth` rounds or when
/// the frontier empties, whichever comes first.  The start coordinate is
/// part of the result and is never re-emitted.
pub fn explore<C>(
    coords: &C,
    mut direction: impl FnMut(&C) -> Vec<C>,
    depth: i64,
    mut guard: impl FnMut(&C) -> bool,
) -> Result<Vec<C>, Error>
where
    C: GraphCoords,
{
    let depth = check_depth(depth)?;

    let mut seen = HashSet::new();
    seen.insert(coords.clone());

    let mut found = vec![coords.clone()];
    let mut frontier = vec![coords.clone()];

    for _ in 0..depth {
        if frontier.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for coords in &frontier {
            for candidate in direction(coords) {
                if guard(&candidate) && seen.insert(candidate.clone()) {
                    next.push(candidate);
                }
            }
        }
        found.extend(next.iter().cloned());
        frontier = next;
    }

    Ok(found)
}

/// Resumes an exploration from a previously computed frontier.
///
/// Coordinates in `exclude` (typically the `seen` set of an earlier call)
/// and the starting frontier itself are never emitted.  Returns every newly
/// discovered coordinate across all rounds.
pub fn reach<C>(
    frontier: impl IntoIterator<Item = C>,
    mut direction: impl FnMut(&C) -> Vec<C>,
    depth: i64,
    exclude: &HashSet<C>,
    mut guard: impl FnMut(&C) -> bool,
) -> Result<Vec<C>, Error>
where
    C: GraphCoords,
{
    let depth = check_depth(depth)?;

    let mut seen = exclude.clone();
    let mut frontier: Vec<C> = frontier
        .into_iter()
        .filter(|c| seen.insert(c.clone()))
        .collect();

    let mut found = Vec::new();

    for _ in 0..depth {
        if frontier.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for coords in &frontier {
            for candidate in direction(coords) {
                if guard(&candidate) && seen.insert(candidate.clone()) {
                    next.push(candidate);
                }
            }
        }
        found.extend(next.iter().cloned());
        frontier = next;
    }

    Ok(found)
}

/// Returns only the frontier discovered at the final depth.
///
/// Like [`reach`], but rounds before the last one contribute nothing to the
/// result.  Depth 0 yields the empty set: no round, no discovery.
pub fn area<C>(
    frontier: impl IntoIterator<Item = C>,
    mut direction: impl FnMut(&C) -> Vec<C>,
    depth: i64,
    exclude: &HashSet<C>,
    mut guard: impl FnMut(&C) -> bool,
) -> Result<Vec<C>, Error>
where
    C: GraphCoords,
{
    let depth = check_depth(depth)?;
    if depth == 0 {
        return Ok(Vec::new());
    }

    let mut seen = exclude.clone();
    let mut frontier: Vec<C> = frontier
        .into_iter()
        .filter(|c| seen.insert(c.clone()))
        .collect();

    for _ in 0..depth {
        let mut next = Vec::new();
        for coords in &frontier {
            for candidate in direction(coords) {
                if guard(&candidate) && seen.insert(candidate.clone()) {
                    next.push(candidate);
                }
            }
        }
        frontier = next;
        if frontier.is_empty() {
            break;
        }
    }

    Ok(frontier)
}

fn check_depth(depth: i64) -> Result<u64, Error> {
    u64::try_from(depth)
        .map_err(|_| Error::invalid_depth(format!("Depth must be non-negative, got {}.", depth)))
}
