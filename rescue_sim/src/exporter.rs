//! JSON exporter for run replays.
//!
//! Records the grid layout, one frame per executed tick and the final report,
//! so a run can be replayed or inspected offline.

use crate::error::SimError;
use crate::metrics::{SimulationReport, TickSummary};
use crate::world::{SimConfig, Simulation};

use rescue_core::{Coordinate, Grid, StepOutcome};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;

/// Static grid layout, with cell lists sorted for stable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridLayout {
    pub width: usize,
    pub height: usize,
    pub base: Coordinate,
    pub victims: Vec<Coordinate>,
    pub obstacles: Vec<Coordinate>,
}

impl From<&Grid> for GridLayout {
    fn from(grid: &Grid) -> Self {
        let mut victims: Vec<_> = grid.victims().iter().copied().collect();
        let mut obstacles: Vec<_> = grid.obstacles().iter().copied().collect();
        victims.sort();
        obstacles.sort();
        Self {
            width: grid.width(),
            height: grid.height(),
            base: grid.base(),
            victims,
            obstacles,
        }
    }
}

/// An agent's position after a tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentFrame {
    pub agent_id: String,
    pub position: Coordinate,
    pub outcome: StepOutcome,
}

/// A single tick of simulation data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickFrame {
    pub tick: u64,
    pub rescued: usize,
    pub agents: Vec<AgentFrame>,
}

impl TickFrame {
    /// Captures the roster after `summary`'s tick.
    pub fn capture(sim: &Simulation, summary: &TickSummary) -> Self {
        let agents = sim
            .agents()
            .iter()
            .zip(&summary.outcomes)
            .map(|(agent, outcome)| AgentFrame {
                agent_id: agent.id().to_string(),
                position: agent.position(),
                outcome: *outcome,
            })
            .collect();
        Self {
            tick: summary.tick,
            rescued: summary.rescued,
            agents,
        }
    }
}

/// Complete run export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunExport {
    /// Seed used
    pub seed: u64,

    /// Generator config, absent for explicitly described grids
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<SimConfig>,

    /// Grid layout
    pub grid: GridLayout,

    /// All frames
    pub frames: Vec<TickFrame>,

    /// Final report, once the run is over
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<SimulationReport>,
}

impl RunExport {
    /// Creates a new export container.
    pub fn new(seed: u64, grid: &Grid) -> Self {
        Self {
            seed,
            config: None,
            grid: GridLayout::from(grid),
            frames: Vec::new(),
            report: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: TickFrame) {
        self.frames.push(frame);
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, report: SimulationReport) {
        self.report = Some(report);
    }

    /// Runs `sim` to completion, recording every tick.
    pub fn record(seed: u64, config: Option<&SimConfig>, sim: &mut Simulation) -> Self {
        let mut export = Self::new(seed, sim.grid());
        export.config = config.cloned();
        let report = sim.run_with(|sim, summary| export.add_frame(TickFrame::capture(sim, summary)));
        export.finalize(report);
        export
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> Result<(), SimError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rescue_core::{create_roster, AgentConfig};

    #[test]
    fn test_record_captures_every_tick() {
        let grid = Grid::new(3, 1, Coordinate::new(0, 0), [Coordinate::new(2, 0)], []).unwrap();
        let roster = create_roster(&grid, 1, AgentConfig::default()).unwrap();
        let mut sim = Simulation::new(grid, roster, 10).unwrap();

        let export = RunExport::record(9, None, &mut sim);

        assert_eq!(export.frames.len(), 2);
        assert_eq!(export.frames[1].agents[0].position, Coordinate::new(2, 0));
        assert_eq!(export.frames[1].rescued, 1);
        assert_eq!(export.report.as_ref().map(|r| r.metrics.steps), Some(2));

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["seed"], 9);
        assert_eq!(json["grid"]["victims"][0]["x"], 2);
        assert!(json.get("config").is_none());
    }

    #[test]
    fn test_record_echoes_generator_config() {
        let config = SimConfig::default()
            .with_seed(5)
            .with_size(5, 5)
            .with_population(2, 3)
            .with_step_limit(8);
        let mut sim = Simulation::from_config(&config).unwrap();

        let export = RunExport::record(config.seed, Some(&config), &mut sim);

        assert_eq!(export.config.as_ref(), Some(&config));
        assert!(export.frames.len() <= 8);

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["config"]["seed"], 5);
        let echoed: SimConfig = serde_json::from_value(json["config"].clone()).unwrap();
        assert_eq!(echoed, config);
    }
}
