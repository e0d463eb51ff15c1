//! Error types for running and exporting simulations.

use rescue_core::ConfigurationError;
use thiserror::Error;

/// Errors that can occur while setting up, running or exporting a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// Grid or roster violates its invariants
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Random generation was asked for more victims and obstacles than fit
    #[error("Cannot place {requested} victims and obstacles on {available} free cells")]
    Overcommit { requested: usize, available: usize },

    /// Command-line options that cannot be combined
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Export file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
