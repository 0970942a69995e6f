//! # EngineOptions
//!
//! The `EngineOptions` struct holds the run-level configuration of the
//! iteration engine: how many generations to run, the population size, the
//! random seed, how much the engine logs, when per-candidate work switches to
//! parallel execution and which diversity measure drives the
//! exploration/exploitation signal.
//!
//! ## Example
//!
//! ```rust
//! use swarmkp::engine::options::{EngineOptions, LogLevel};
//!
//! // Create a new EngineOptions instance with custom parameters
//! let custom_options = EngineOptions::new(200, LogLevel::Minimal, 30);
//!
//! // Or through the builder
//! let options = EngineOptions::builder()
//!     .max_iterations(500)
//!     .population_size(40)
//!     .seed(7)
//!     .build();
//! assert!(options.validate().is_ok());
//! ```

use std::time::Duration;

use crate::diversity::DiversityMetric;
use crate::error::{Result, SolverError};

/// Smallest iteration count a run accepts.
pub const MIN_ITERATIONS: usize = 4;

/// How much the engine reports through `tracing` while it runs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// One `info` event per generation plus a `debug` event with the
    /// generation's best and worst fitness.
    Verbose,
    /// One `info` event per generation.
    Minimal,
    /// Run start and end only.
    None,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    max_iterations: usize,
    log_level: LogLevel,
    population_size: usize,
    /// Minimum number of candidates to process in parallel
    parallel_threshold: usize,
    seed: Option<u64>,
    diversity_metric: DiversityMetric,
    time_limit: Option<Duration>,
}

impl EngineOptions {
    pub fn new(max_iterations: usize, log_level: LogLevel, population_size: usize) -> Self {
        Self {
            max_iterations,
            log_level,
            population_size,
            ..Self::default()
        }
    }

    /// Rejects options no run can start with.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError::Configuration`] when the population is empty,
    /// the iteration count is below [`MIN_ITERATIONS`] or the parallel
    /// threshold is zero.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(SolverError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }
        if self.max_iterations < MIN_ITERATIONS {
            return Err(SolverError::Configuration(format!(
                "Number of iterations must be at least {}, got {}",
                MIN_ITERATIONS, self.max_iterations
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(SolverError::Configuration(
                "Parallel threshold cannot be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get_max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    /// Returns the minimum number of candidates to process in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn get_diversity_metric(&self) -> DiversityMetric {
        self.diversity_metric
    }

    /// Wall-clock budget checked between generations.
    pub fn get_time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.max_iterations = max_iterations;
    }

    pub fn set_log_level(&mut self, log_level: LogLevel) {
        self.log_level = log_level;
    }

    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    pub fn set_diversity_metric(&mut self, metric: DiversityMetric) {
        self.diversity_metric = metric;
    }

    pub fn set_time_limit(&mut self, limit: Option<Duration>) {
        self.time_limit = limit;
    }

    /// Returns a builder for creating an `EngineOptions` instance.
    pub fn builder() -> EngineOptionsBuilder {
        EngineOptionsBuilder::default()
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            log_level: LogLevel::None,
            population_size: 20,
            parallel_threshold: 1000,
            seed: None,
            diversity_metric: DiversityMetric::Hussain,
            time_limit: None,
        }
    }
}

/// Builder for `EngineOptions`.
#[derive(Debug, Clone, Default)]
pub struct EngineOptionsBuilder {
    max_iterations: Option<usize>,
    log_level: Option<LogLevel>,
    population_size: Option<usize>,
    parallel_threshold: Option<usize>,
    seed: Option<u64>,
    diversity_metric: Option<DiversityMetric>,
    time_limit: Option<Duration>,
}

impl EngineOptionsBuilder {
    pub fn max_iterations(mut self, value: usize) -> Self {
        self.max_iterations = Some(value);
        self
    }

    pub fn log_level(mut self, value: LogLevel) -> Self {
        self.log_level = Some(value);
        self
    }

    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn diversity_metric(mut self, value: DiversityMetric) -> Self {
        self.diversity_metric = Some(value);
        self
    }

    pub fn time_limit(mut self, value: Duration) -> Self {
        self.time_limit = Some(value);
        self
    }

    /// Builds the `EngineOptions` instance, filling unset fields with defaults.
    pub fn build(self) -> EngineOptions {
        let defaults = EngineOptions::default();
        EngineOptions {
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            population_size: self.population_size.unwrap_or(defaults.population_size),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
            seed: self.seed,
            diversity_metric: self.diversity_metric.unwrap_or(defaults.diversity_metric),
            time_limit: self.time_limit,
        }
    }
}
