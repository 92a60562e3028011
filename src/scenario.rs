//! Scenario runner for batch projections
//!
//! Holds a base configuration once, then allows running many positions or
//! growth assumptions against it without rebuilding an engine per call.

use crate::error::ProjectionError;
use crate::position::Position;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Pre-configured runner for batch and sweep projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
///
/// // Run many growth assumptions against one position
/// let configs = runner.growth_scenarios(&[-0.2, 0.05, 0.15]);
/// let results = runner.run_scenarios(&position, &configs)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Base configuration applied when no override is given
    base_config: ProjectionConfig,
}

impl ScenarioRunner {
    /// Create runner with the default configuration
    pub fn new() -> Self {
        Self {
            base_config: ProjectionConfig::default(),
        }
    }

    /// Create runner with a specific base configuration
    pub fn with_config(base_config: ProjectionConfig) -> Self {
        Self { base_config }
    }

    /// Run a single projection under the base configuration
    pub fn run(&self, position: &Position) -> Result<ProjectionResult, ProjectionError> {
        self.run_with(position, self.base_config.clone())
    }

    /// Run a single projection with an overriding config
    pub fn run_with(
        &self,
        position: &Position,
        config: ProjectionConfig,
    ) -> Result<ProjectionResult, ProjectionError> {
        let engine = ProjectionEngine::new(config);
        engine.project(position)
    }

    /// Run projections for multiple positions under the base configuration
    pub fn run_batch(
        &self,
        positions: &[Position],
    ) -> Result<Vec<ProjectionResult>, ProjectionError> {
        log::debug!("running batch of {} positions", positions.len());
        positions.iter().map(|p| self.run(p)).collect()
    }

    /// Run multiple configs against a single position
    pub fn run_scenarios(
        &self,
        position: &Position,
        configs: &[ProjectionConfig],
    ) -> Result<Vec<ProjectionResult>, ProjectionError> {
        configs
            .iter()
            .map(|config| self.run_with(position, config.clone()))
            .collect()
    }

    /// Build one config per growth rate, varying only that knob
    pub fn growth_scenarios(&self, annual_growth_rates: &[f64]) -> Vec<ProjectionConfig> {
        annual_growth_rates
            .iter()
            .map(|&rate| ProjectionConfig {
                annual_growth_rate: rate,
                ..self.base_config.clone()
            })
            .collect()
    }

    /// Get reference to the base config for inspection
    pub fn config(&self) -> &ProjectionConfig {
        &self.base_config
    }

    /// Get mutable reference to the base config for customization
    pub fn config_mut(&mut self) -> &mut ProjectionConfig {
        &mut self.base_config
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
