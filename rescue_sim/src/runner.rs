//! Seed runner - executes one configuration across many seeds.

use crate::error::SimError;
use crate::metrics::SimulationMetrics;
use crate::world::{SimConfig, Simulation};

use tracing::{info, warn};

/// Result of one seeded run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Seed used
    pub seed: u64,

    /// Final metrics
    pub metrics: SimulationMetrics,

    /// Ground-truth victim count
    pub total_victims: usize,

    /// Whether every victim was reached before the tick limit
    pub all_rescued: bool,
}

/// Runs a configuration over a range of seeds.
pub struct SeedRunner {
    config: SimConfig,
}

impl SeedRunner {
    /// Creates a runner for `config`. Its `seed` field is overridden per run.
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Runs a single seed.
    pub fn run(&self, seed: u64) -> Result<RunResult, SimError> {
        let config = self.config.clone().with_seed(seed);
        let mut sim = Simulation::from_config(&config)?;
        let report = sim.run();

        if report.metrics.failed_searches > 0 {
            warn!(
                "seed={}: {} searches found no route",
                seed, report.metrics.failed_searches
            );
        }

        Ok(RunResult {
            seed,
            all_rescued: report.all_rescued(),
            total_victims: report.total_victims,
            metrics: report.metrics,
        })
    }

    /// Runs `count` consecutive seeds starting at `base_seed`.
    pub fn run_many(&self, base_seed: u64, count: usize) -> Result<Vec<RunResult>, SimError> {
        let mut results = Vec::with_capacity(count);
        for offset in 0..count {
            let seed = base_seed.wrapping_add(offset as u64);
            let result = self.run(seed)?;
            info!(
                "seed={} steps={} rescued={}/{}",
                seed, result.metrics.steps, result.metrics.rescued, result.total_victims
            );
            results.push(result);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_is_deterministic() {
        let runner = SeedRunner::new(SimConfig::default());

        let first = runner.run(42).unwrap();
        let second = runner.run(42).unwrap();

        assert_eq!(first.metrics, second.metrics);
    }

    #[test]
    fn test_run_many_uses_consecutive_seeds() {
        let runner = SeedRunner::new(SimConfig::default().with_size(6, 6).with_step_limit(20));

        let results = runner.run_many(100, 3).unwrap();

        let seeds: Vec<_> = results.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![100, 101, 102]);
        assert!(results.iter().all(|r| r.metrics.steps <= 20));
    }

    #[test]
    fn test_run_propagates_overcommit() {
        let runner = SeedRunner::new(SimConfig::default().with_size(2, 2));
        assert!(matches!(runner.run(1), Err(SimError::Overcommit { .. })));
    }
}
