//! Search agent and its per-tick decision cycle.
//!
//! Each tick an agent either keeps following its planned route or, when it has
//! none, picks a target and plans one:
//!
//! ```text
//!   NoPlan ──choose target──► plan ──route──► Following ──route drained──► NoPlan
//!     │                         │
//!     │ no target               │ no route
//!     ▼                         ▼
//!    Idle                  SearchFailed (stays NoPlan)
//! ```
//!
//! Target selection prefers known, not-yet-visited victims, then falls back to
//! the nearest unvisited cell not believed blocked. Ties on distance go to the
//! larger `x`, then the larger `y`.

use crate::error::ConfigurationError;
use crate::grid::{manhattan, Coordinate, Grid};
use crate::knowledge::KnowledgeStore;
use crate::pathfinder::a_star;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Tunables for an agent's decision cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Ticks a target stays excluded after a failed search.
    ///
    /// Zero disables exclusion: an unreachable target is selected again on
    /// the very next tick, until new knowledge opens a route to it.
    pub retry_cooldown_ticks: u64,
}

/// What an agent did during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Moved one cell
    Moved { from: Coordinate, to: Coordinate },

    /// Nothing left to rescue or explore
    Idle,

    /// A target was chosen but no route to it exists under current belief
    SearchFailed(Coordinate),
}

/// Where an agent is in its decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    NoPlan,
    Following,
    Idle,
}

/// A search agent.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Unique identifier
    id: String,

    /// Current cell
    position: Coordinate,

    /// Beliefs about victims and obstacles
    knowledge: KnowledgeStore,

    /// Cells this agent has physically occupied
    visited: BTreeSet<Coordinate>,

    /// Remaining route, front first
    path: VecDeque<Coordinate>,

    config: AgentConfig,

    /// Failed targets mapped to the last tick they stay excluded
    excluded: BTreeMap<Coordinate, u64>,

    /// Ticks stepped so far
    clock: u64,

    state: AgentState,

    /// Pathfinder invocations
    searches: u64,

    /// Pathfinder invocations that found no route
    failed_searches: u64,
}

impl Agent {
    /// Creates an agent at `position` with no knowledge, no visits and no plan.
    pub fn new(id: impl Into<String>, position: Coordinate) -> Self {
        Self::with_config(id, position, AgentConfig::default())
    }

    /// Creates an agent with a custom configuration.
    pub fn with_config(id: impl Into<String>, position: Coordinate, config: AgentConfig) -> Self {
        Self {
            id: id.into(),
            position,
            knowledge: KnowledgeStore::new(),
            visited: BTreeSet::new(),
            path: VecDeque::new(),
            config,
            excluded: BTreeMap::new(),
            clock: 0,
            state: AgentState::NoPlan,
            searches: 0,
            failed_searches: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn visited(&self) -> &BTreeSet<Coordinate> {
        &self.visited
    }

    pub fn path(&self) -> &VecDeque<Coordinate> {
        &self.path
    }

    pub fn config(&self) -> AgentConfig {
        self.config
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn searches(&self) -> u64 {
        self.searches
    }

    pub fn failed_searches(&self) -> u64 {
        self.failed_searches
    }

    /// Senses the current cell and marks it visited.
    ///
    /// Returns the number of new facts learned.
    pub fn perceive(&mut self, grid: &Grid) -> usize {
        self.visited.insert(self.position);
        self.knowledge.perceive(grid, self.position)
    }

    /// Unions a peer's knowledge into this agent's store.
    pub fn absorb(&mut self, peer: &KnowledgeStore) -> usize {
        self.knowledge.merge(peer)
    }

    fn is_excluded(&self, c: Coordinate) -> bool {
        self.excluded.contains_key(&c)
    }

    /// Picks the next target, or `None` if there is nothing left to do.
    pub fn choose_target(&self, grid: &Grid) -> Option<Coordinate> {
        let from = self.position;
        let rank = |c: &Coordinate| (manhattan(from, *c), Reverse(c.x), Reverse(c.y));

        let victim = self
            .knowledge
            .victims()
            .iter()
            .copied()
            .filter(|v| !self.visited.contains(v) && !self.is_excluded(*v))
            .min_by_key(rank);
        if victim.is_some() {
            return victim;
        }

        grid.cells()
            .filter(|c| {
                !self.visited.contains(c)
                    && !self.knowledge.believes_blocked(*c)
                    && !self.is_excluded(*c)
            })
            .min_by_key(rank)
    }

    /// Runs one decision cycle: plan if needed, then move one cell.
    ///
    /// An agent that has never perceived senses its starting cell first, so a
    /// route is never planned through an adjacent wall it has not seen.
    pub fn step(&mut self, grid: &Grid) -> StepOutcome {
        self.clock += 1;
        let clock = self.clock;
        self.excluded.retain(|_, until| *until >= clock);

        if self.visited.is_empty() {
            self.perceive(grid);
        }

        // A route through a cell now known to be blocked is stale.
        if self.path.iter().any(|c| self.knowledge.believes_blocked(*c)) {
            self.path.clear();
        }

        if self.path.is_empty() {
            let Some(target) = self.choose_target(grid) else {
                self.state = AgentState::Idle;
                return StepOutcome::Idle;
            };

            self.searches += 1;
            let route = a_star(grid, self.position, target, self.knowledge.obstacles());
            if route.is_empty() {
                self.failed_searches += 1;
                if self.config.retry_cooldown_ticks > 0 {
                    self.excluded.insert(target, clock + self.config.retry_cooldown_ticks);
                }
                self.state = AgentState::NoPlan;
                return StepOutcome::SearchFailed(target);
            }
            self.path = route.into();
        }

        let from = self.position;
        let Some(to) = self.path.pop_front() else {
            self.state = AgentState::NoPlan;
            return StepOutcome::Idle;
        };
        debug_assert!(!grid.is_blocked(to), "{} stepped onto obstacle {}", self.id, to);

        self.position = to;
        self.perceive(grid);
        self.state = if self.path.is_empty() {
            AgentState::NoPlan
        } else {
            AgentState::Following
        };
        StepOutcome::Moved { from, to }
    }
}

/// Builds `count` agents named `drone-0 .. drone-{count-1}`, all at the base.
pub fn create_roster(
    grid: &Grid,
    count: usize,
    config: AgentConfig,
) -> Result<Vec<Agent>, ConfigurationError> {
    let roster: Vec<Agent> = (0..count)
        .map(|i| Agent::with_config(format!("drone-{}", i), grid.base(), config))
        .collect();
    validate_roster(grid, &roster)?;
    Ok(roster)
}

/// Checks that a roster is non-empty, uniquely named and placed on free cells.
pub fn validate_roster(grid: &Grid, roster: &[Agent]) -> Result<(), ConfigurationError> {
    if roster.is_empty() {
        return Err(ConfigurationError::EmptyRoster);
    }
    let mut seen = HashSet::new();
    for agent in roster {
        if !seen.insert(agent.id()) {
            return Err(ConfigurationError::DuplicateAgent(agent.id().to_string()));
        }
        if !grid.in_bounds(agent.position()) || grid.is_blocked(agent.position()) {
            return Err(ConfigurationError::InvalidAgentPosition {
                agent: agent.id().to_string(),
                coordinate: agent.position(),
            });
        }
    }
    Ok(())
}
