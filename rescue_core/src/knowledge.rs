//! Per-agent belief state and the merge protocol.
//!
//! A [`KnowledgeStore`] is a pair of grow-only sets. Merging is plain set
//! union, which makes it commutative, associative and idempotent: agents can
//! exchange knowledge in any order, any number of times, without losing or
//! corrupting facts.

use crate::grid::{Coordinate, Grid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What one agent believes about the grid.
///
/// Every fact is a subset of ground truth: facts only enter through
/// [`KnowledgeStore::perceive`] or through merging with another store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeStore {
    /// Victims this agent knows about
    victims: BTreeSet<Coordinate>,

    /// Obstacles this agent knows about
    obstacles: BTreeSet<Coordinate>,
}

impl KnowledgeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn victims(&self) -> &BTreeSet<Coordinate> {
        &self.victims
    }

    pub fn obstacles(&self) -> &BTreeSet<Coordinate> {
        &self.obstacles
    }

    pub fn knows_victim(&self, c: Coordinate) -> bool {
        self.victims.contains(&c)
    }

    pub fn believes_blocked(&self, c: Coordinate) -> bool {
        self.obstacles.contains(&c)
    }

    /// Records what can be sensed from `position`.
    ///
    /// A victim is only noticed when standing on it. Obstacles are noticed in
    /// all four adjacent cells. Returns the number of new facts.
    pub fn perceive(&mut self, grid: &Grid, position: Coordinate) -> usize {
        let mut learned = 0;
        if grid.is_victim(position) && self.victims.insert(position) {
            learned += 1;
        }
        for cell in grid.adjacent(position) {
            if grid.is_blocked(cell) && self.obstacles.insert(cell) {
                learned += 1;
            }
        }
        learned
    }

    /// Unions `other` into `self`. Returns the number of new facts.
    pub fn merge(&mut self, other: &KnowledgeStore) -> usize {
        let before = self.fact_count();
        self.victims.extend(other.victims.iter().copied());
        self.obstacles.extend(other.obstacles.iter().copied());
        self.fact_count() - before
    }

    /// Returns the union of two stores without modifying either.
    pub fn merged(&self, other: &KnowledgeStore) -> KnowledgeStore {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Bidirectional merge: afterwards both stores hold the union.
    pub fn exchange(a: &mut KnowledgeStore, b: &mut KnowledgeStore) {
        a.merge(b);
        b.merge(a);
    }

    /// Total number of known victims and obstacles.
    pub fn fact_count(&self) -> usize {
        self.victims.len() + self.obstacles.len()
    }

    /// True if every fact in `self` is also in `other`.
    pub fn is_subset(&self, other: &KnowledgeStore) -> bool {
        self.victims.is_subset(&other.victims) && self.obstacles.is_subset(&other.obstacles)
    }
}
