//! Rescue Core - Cooperative Grid Search Primitives
//!
//! This library holds the pieces every search agent is built from:
//! 1. **Grid geometry**: bounds, ground-truth obstacles and victims, neighbours
//! 2. **Pathfinder**: A* over an agent's *believed* obstacles
//! 3. **Knowledge store**: grow-only beliefs merged by set union
//! 4. **Agent**: the perceive → choose target → plan → move cycle
//!
//! Orchestration (ticks, communication rounds, metrics) lives in `rescue_sim`.

pub mod agent;
pub mod error;
pub mod grid;
pub mod knowledge;
pub mod pathfinder;

// Re-export key types for convenience
pub use agent::{create_roster, validate_roster, Agent, AgentConfig, AgentState, StepOutcome};
pub use error::ConfigurationError;
pub use grid::{manhattan, CellType, Coordinate, Grid};
pub use knowledge::KnowledgeStore;
pub use pathfinder::a_star;
