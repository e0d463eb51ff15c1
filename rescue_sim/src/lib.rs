//! Rescue Swarm Simulation Harness
//!
//! This crate drives a team of [`rescue_core::Agent`]s over a grid, one tick
//! at a time, and measures how well they cover it and reach victims.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Simulation                         │
//! │  ┌─────────┐   exchange    ┌─────────┐                   │
//! │  │ Agent 0 │◄─────────────►│ Agent 1 │  ...              │
//! │  └────┬────┘   knowledge   └────┬────┘                   │
//! │       │ perceive / move         │                        │
//! │  ┌────▼─────────────────────────▼────┐                   │
//! │  │        Grid (ground truth)        │                   │
//! │  └───────────────────────────────────┘                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every run is deterministic: the grid comes from a seeded generator and
//! every tie in target selection and planning is broken by coordinate.
//!
//! # Usage
//!
//! ```ignore
//! use rescue_sim::{SimConfig, Simulation};
//!
//! let config = SimConfig {
//!     seed: 42,
//!     num_agents: 3,
//!     ..Default::default()
//! };
//!
//! let mut sim = Simulation::from_config(&config)?;
//! let report = sim.run();
//! println!("rescued {}/{}", report.metrics.rescued, report.total_victims);
//! ```

mod error;
mod exporter;
mod generator;
mod metrics;
mod runner;
mod world;
pub mod render;

pub use error::SimError;
pub use exporter::{AgentFrame, GridLayout, RunExport, TickFrame};
pub use generator::GridGenerator;
pub use metrics::{count_rescued, AgentSnapshot, SimulationMetrics, SimulationReport, TickSummary};
pub use runner::{RunResult, SeedRunner};
pub use world::{SimConfig, Simulation};
