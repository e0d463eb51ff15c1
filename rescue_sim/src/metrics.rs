//! Run metrics and end-of-run diagnostics.

use rescue_core::{Agent, AgentState, Coordinate, Grid, StepOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Aggregate metrics for a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Ticks actually executed
    pub steps: u64,

    /// Victims currently co-located with at least one agent
    pub rescued: usize,

    /// Victims known to at least one agent
    pub discovered: usize,

    /// Fraction of cells visited by at least one agent, in `[0, 1]`
    pub coverage: f64,

    /// Pathfinder invocations across all agents
    pub searches: u64,

    /// Pathfinder invocations that found no route
    pub failed_searches: u64,
}

impl SimulationMetrics {
    /// Fills in the end-of-run fields from the final agent states.
    pub fn finalize(&mut self, grid: &Grid, agents: &[Agent]) {
        let discovered: BTreeSet<Coordinate> = agents
            .iter()
            .flat_map(|a| a.knowledge().victims().iter().copied())
            .collect();
        let visited: BTreeSet<Coordinate> = agents
            .iter()
            .flat_map(|a| a.visited().iter().copied())
            .collect();

        self.discovered = discovered.len();
        self.coverage = visited.len() as f64 / grid.cell_count() as f64;
        self.searches = agents.iter().map(Agent::searches).sum();
        self.failed_searches = agents.iter().map(Agent::failed_searches).sum();
    }
}

/// Number of ground-truth victims with at least one agent standing on them.
pub fn count_rescued(grid: &Grid, agents: &[Agent]) -> usize {
    grid.victims()
        .iter()
        .filter(|&&v| agents.iter().any(|a| a.position() == v))
        .count()
}

/// Final state of one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: String,
    pub position: Coordinate,
    pub state: AgentState,
    pub visited: Vec<Coordinate>,
    pub known_victims: Vec<Coordinate>,
    pub known_obstacles: Vec<Coordinate>,
    pub searches: u64,
    pub failed_searches: u64,
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id().to_string(),
            position: agent.position(),
            state: agent.state(),
            visited: agent.visited().iter().copied().collect(),
            known_victims: agent.knowledge().victims().iter().copied().collect(),
            known_obstacles: agent.knowledge().obstacles().iter().copied().collect(),
            searches: agent.searches(),
            failed_searches: agent.failed_searches(),
        }
    }
}

/// What happened during a single tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSummary {
    /// 1-based tick index
    pub tick: u64,

    /// One outcome per agent, in roster order
    pub outcomes: Vec<StepOutcome>,

    /// Rescued count after every agent acted
    pub rescued: usize,
}

/// Complete result of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub metrics: SimulationMetrics,

    /// Ground-truth victim count
    pub total_victims: usize,

    /// One snapshot per agent, in roster order
    pub agents: Vec<AgentSnapshot>,
}

impl SimulationReport {
    /// True if every victim was reached.
    pub fn all_rescued(&self) -> bool {
        self.metrics.rescued == self.total_victims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_unions_agents() {
        let grid = Grid::new(2, 2, Coordinate::new(0, 0), [Coordinate::new(1, 1)], []).unwrap();
        let mut a = Agent::new("a", Coordinate::new(0, 0));
        let mut b = Agent::new("b", Coordinate::new(1, 1));
        a.perceive(&grid);
        b.perceive(&grid);

        let mut metrics = SimulationMetrics::default();
        metrics.finalize(&grid, &[a.clone(), b.clone()]);

        assert_eq!(metrics.discovered, 1);
        assert!((metrics.coverage - 0.5).abs() < 1e-9);
        assert_eq!(count_rescued(&grid, &[a, b]), 1);
    }

    #[test]
    fn test_snapshot_is_sorted() {
        let grid = Grid::new(3, 3, Coordinate::new(1, 1), [], [Coordinate::new(2, 1), Coordinate::new(0, 1)]).unwrap();
        let mut agent = Agent::new("drone-0", grid.base());
        agent.perceive(&grid);

        let snapshot = AgentSnapshot::from(&agent);
        assert_eq!(snapshot.known_obstacles, vec![Coordinate::new(0, 1), Coordinate::new(2, 1)]);
        assert_eq!(snapshot.visited, vec![Coordinate::new(1, 1)]);
    }
}
