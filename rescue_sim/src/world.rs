//! Simulation - the tick-driven orchestrator.
//!
//! # Tick protocol
//!
//! ```text
//! start:  every agent perceives at the base
//! tick t: for each agent i in roster order
//!             exchange knowledge (both directions) with every other agent
//!             step agent i (choose target, plan, move one cell, perceive)
//!         count rescued victims; stop early if all are reached
//! ```
//!
//! Communication for agent `i` happens right before its own move, so an agent
//! late in the roster may act on knowledge an earlier agent only gained this
//! tick. By the time the last agent has communicated, every store holds the
//! union of everything known at the start of that agent's round.

use crate::error::SimError;
use crate::generator::GridGenerator;
use crate::metrics::{count_rescued, AgentSnapshot, SimulationMetrics, SimulationReport, TickSummary};

use rescue_core::{create_roster, validate_roster, Agent, AgentConfig, ConfigurationError, Grid, StepOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed for grid generation
    pub seed: u64,

    /// Number of agents to spawn
    pub num_agents: usize,

    /// Grid width in cells
    pub width: usize,

    /// Grid height in cells
    pub height: usize,

    /// Victims to scatter
    pub num_victims: usize,

    /// Obstacles to scatter
    pub num_obstacles: usize,

    /// Maximum ticks to run
    pub step_limit: u64,

    /// Ticks a failed target stays excluded (0 = never excluded)
    pub retry_cooldown_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_agents: 3,
            width: 10,
            height: 10,
            num_victims: 4,
            num_obstacles: 10,
            step_limit: 50,
            retry_cooldown_ticks: 0,
        }
    }
}

impl SimConfig {
    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of agents.
    pub fn with_agents(mut self, num_agents: usize) -> Self {
        self.num_agents = num_agents;
        self
    }

    /// Sets the grid dimensions.
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets victim and obstacle counts.
    pub fn with_population(mut self, num_victims: usize, num_obstacles: usize) -> Self {
        self.num_victims = num_victims;
        self.num_obstacles = num_obstacles;
        self
    }

    /// Sets the tick limit.
    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Sets the failed-target cooldown.
    pub fn with_retry_cooldown(mut self, ticks: u64) -> Self {
        self.retry_cooldown_ticks = ticks;
        self
    }

    /// Agent settings derived from this config.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfig {
            retry_cooldown_ticks: self.retry_cooldown_ticks,
        }
    }
}

/// The simulation - ground truth plus the agent roster.
pub struct Simulation {
    /// Ground truth, read-only for the whole run
    grid: Grid,

    /// Agents in roster order
    agents: Vec<Agent>,

    /// Maximum ticks
    step_limit: u64,

    /// Ticks executed so far
    tick_count: u64,

    /// Whether the initial perception has happened
    started: bool,

    metrics: SimulationMetrics,
}

impl Simulation {
    /// Creates a simulation over an existing grid and roster.
    pub fn new(grid: Grid, agents: Vec<Agent>, step_limit: u64) -> Result<Self, ConfigurationError> {
        validate_roster(&grid, &agents)?;
        Ok(Self {
            grid,
            agents,
            step_limit,
            tick_count: 0,
            started: false,
            metrics: SimulationMetrics::default(),
        })
    }

    /// Generates a random grid and a roster at its base from `config`.
    pub fn from_config(config: &SimConfig) -> Result<Self, SimError> {
        let grid = GridGenerator::new(config.seed).generate(
            config.width,
            config.height,
            config.num_victims,
            config.num_obstacles,
        )?;
        let agents = create_roster(&grid, config.num_agents, config.agent_config())?;
        Ok(Self::new(grid, agents, config.step_limit)?)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }

    /// Number of victims currently reached by some agent.
    pub fn rescued(&self) -> usize {
        count_rescued(&self.grid, &self.agents)
    }

    /// True once every ground-truth victim has an agent on it.
    pub fn all_rescued(&self) -> bool {
        self.rescued() == self.grid.victims().len()
    }

    /// True once the tick limit is reached or every victim is rescued.
    pub fn is_finished(&self) -> bool {
        self.tick_count >= self.step_limit || (self.tick_count > 0 && self.all_rescued())
    }

    /// Initial phase: every agent perceives its starting cell. Runs once.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        for agent in &mut self.agents {
            agent.perceive(&self.grid);
        }
        self.started = true;
        info!(
            "Simulation started: {}x{} grid, {} agents, {} victims, {} obstacles",
            self.grid.width(),
            self.grid.height(),
            self.agents.len(),
            self.grid.victims().len(),
            self.grid.obstacles().len()
        );
    }

    /// Bidirectional knowledge exchange between agent `index` and every peer.
    pub fn communicate(&mut self, index: usize) {
        for peer in 0..self.agents.len() {
            if peer != index {
                self.exchange(index, peer);
            }
        }
    }

    /// One communication round for the whole roster, without moving anyone.
    pub fn communication_round(&mut self) {
        for index in 0..self.agents.len() {
            self.communicate(index);
        }
    }

    fn exchange(&mut self, a: usize, b: usize) {
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.agents.split_at_mut(high);
        let first = &mut head[low];
        let second = &mut tail[0];
        first.absorb(second.knowledge());
        second.absorb(first.knowledge());
    }

    /// Runs one tick and returns what each agent did.
    pub fn tick(&mut self) -> TickSummary {
        self.start();
        self.tick_count += 1;

        let mut outcomes = Vec::with_capacity(self.agents.len());
        for index in 0..self.agents.len() {
            self.communicate(index);
            let outcome = self.agents[index].step(&self.grid);
            if let StepOutcome::SearchFailed(target) = outcome {
                debug!(
                    "tick {}: {} found no route to {}",
                    self.tick_count,
                    self.agents[index].id(),
                    target
                );
            }
            outcomes.push(outcome);
        }

        let rescued = self.rescued();
        self.metrics.steps = self.tick_count;
        self.metrics.rescued = rescued;
        debug!(
            "tick {}: rescued {}/{}",
            self.tick_count,
            rescued,
            self.grid.victims().len()
        );

        TickSummary {
            tick: self.tick_count,
            outcomes,
            rescued,
        }
    }

    /// Runs until all victims are rescued or the tick limit is reached.
    pub fn run(&mut self) -> SimulationReport {
        self.run_with(|_, _| {})
    }

    /// Like [`Simulation::run`], calling `on_tick` after every tick.
    pub fn run_with<F>(&mut self, mut on_tick: F) -> SimulationReport
    where
        F: FnMut(&Simulation, &TickSummary),
    {
        self.start();
        while !self.is_finished() {
            let summary = self.tick();
            on_tick(self, &summary);
            if self.all_rescued() {
                info!("All {} victims rescued after {} ticks", summary.rescued, summary.tick);
                break;
            }
        }

        let report = self.report();
        info!(
            "Run finished: steps={} rescued={}/{} discovered={} coverage={:.1}%",
            report.metrics.steps,
            report.metrics.rescued,
            report.total_victims,
            report.metrics.discovered,
            report.metrics.coverage * 100.0
        );
        report
    }

    /// Finalizes metrics and captures every agent's state.
    pub fn report(&mut self) -> SimulationReport {
        self.metrics.steps = self.tick_count;
        self.metrics.rescued = self.rescued();
        self.metrics.finalize(&self.grid, &self.agents);
        SimulationReport {
            metrics: self.metrics.clone(),
            total_victims: self.grid.victims().len(),
            agents: self.agents.iter().map(AgentSnapshot::from).collect(),
        }
    }
}
