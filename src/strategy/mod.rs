//! # Algorithm Strategies
//!
//! An [`Algorithm`] proposes the next population from the current one. The
//! set of algorithms is closed: each variant carries its own typed
//! parameters, and [`Algorithm::step`] dispatches through a single match, so
//! a variant can never be called without the inputs it needs.
//!
//! Every step consumes the generation's [`AlgorithmState`] and returns a
//! [`StepOutcome`] holding the proposed population and the updated state.
//!
//! ## Example
//!
//! ```rust
//! use swarmkp::population::Population;
//! use swarmkp::problem::{Bounds, Objective};
//! use swarmkp::rng::RandomNumberGenerator;
//! use swarmkp::strategy::{Algorithm, StepContext};
//!
//! let algorithm = Algorithm::from_name("GWO", None).unwrap();
//! let population = Population::from_fn(4, 3, |i, j| ((i + j) % 2) as f64).unwrap();
//! let fitness = vec![1.0, 2.0, 3.0, 4.0];
//! let best = population.row(3).to_vec();
//! let mut rng = RandomNumberGenerator::from_seed(1);
//!
//! let state = algorithm.init_state(population.len(), population.dimension(), Objective::Maximize);
//! let ctx = StepContext {
//!     iteration: 0,
//!     max_iterations: 10,
//!     population: &population,
//!     fitness: &fitness,
//!     best: &best,
//!     bounds: Bounds::unit(),
//!     objective: Objective::Maximize,
//! };
//! let outcome = algorithm.step(&ctx, state, &mut rng).unwrap();
//! assert_eq!(outcome.population.len(), 4);
//! ```

pub mod eoo;
pub mod ga;
pub mod gwo;
pub mod pso;

use std::fmt;

use crate::error::{Result, SolverError};
use crate::population::Population;
use crate::problem::{Bounds, Objective};
use crate::rng::RandomNumberGenerator;

pub use ga::GaParams;
pub use pso::PsoParams;

/// Read-only inputs of one strategy step, captured at generation start.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    /// Zero-based index of the iteration being computed.
    pub iteration: usize,
    pub max_iterations: usize,
    pub population: &'a Population,
    pub fitness: &'a [f64],
    pub best: &'a [f64],
    pub bounds: Bounds,
    pub objective: Objective,
}

impl StepContext<'_> {
    fn validate(&self) -> Result<()> {
        if self.population.is_empty() {
            return Err(SolverError::EmptyPopulation);
        }
        if self.fitness.len() != self.population.len() {
            return Err(SolverError::Strategy(format!(
                "Fitness vector has {} entries for {} candidates",
                self.fitness.len(),
                self.population.len()
            )));
        }
        if self.best.len() != self.population.dimension() {
            return Err(SolverError::Strategy(format!(
                "Best candidate has dimension {}, population has {}",
                self.best.len(),
                self.population.dimension()
            )));
        }
        Ok(())
    }
}

/// Velocity and personal-best memory of a swarm.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmState {
    pub velocity: Vec<Vec<f64>>,
    pub personal_best: Vec<Vec<f64>>,
    pub personal_best_score: Vec<f64>,
}

impl SwarmState {
    /// Zero velocities and personal bests that every real score improves on.
    pub fn new(size: usize, dimension: usize, objective: Objective) -> Self {
        Self {
            velocity: vec![vec![0.0; dimension]; size],
            personal_best: vec![vec![0.0; dimension]; size],
            personal_best_score: vec![objective.worst(); size],
        }
    }

    /// Replaces each personal best the evaluated population strictly improves on.
    pub fn update_personal_bests(
        &mut self,
        population: &Population,
        fitness: &[f64],
        objective: Objective,
    ) {
        for (i, (row, &score)) in population.iter().zip(fitness).enumerate() {
            if objective.is_better(score, self.personal_best_score[i]) {
                self.personal_best_score[i] = score;
                self.personal_best[i].clone_from(row);
            }
        }
    }
}

/// Auxiliary state an algorithm carries from one generation to the next.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AlgorithmState {
    #[default]
    Stateless,
    Swarm(SwarmState),
}

impl AlgorithmState {
    pub fn swarm(&self) -> Option<&SwarmState> {
        match self {
            AlgorithmState::Swarm(swarm) => Some(swarm),
            AlgorithmState::Stateless => None,
        }
    }

    pub fn swarm_mut(&mut self) -> Option<&mut SwarmState> {
        match self {
            AlgorithmState::Swarm(swarm) => Some(swarm),
            AlgorithmState::Stateless => None,
        }
    }
}

/// Result of one strategy step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub population: Population,
    pub state: AlgorithmState,
}

/// The supported metaheuristics.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    /// Particle swarm optimization.
    Pso(PsoParams),
    /// Grey wolf optimizer.
    Gwo,
    /// Eurasian oystercatcher optimizer.
    Eoo,
    /// Genetic algorithm working directly on binary candidates.
    Ga(GaParams),
}

impl Algorithm {
    /// Resolves an algorithm by its short name.
    ///
    /// `params` is the algorithm-specific parameter string; `GA` requires
    /// one of the form `"cross:0.9;muta:0.01"`, the other algorithms ignore it.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError::Configuration`] for unknown names and for a
    /// missing or malformed parameter string.
    pub fn from_name(name: &str, params: Option<&str>) -> Result<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "PSO" => Ok(Algorithm::Pso(PsoParams::default())),
            "GWO" => Ok(Algorithm::Gwo),
            "EOO" => Ok(Algorithm::Eoo),
            "GA" => {
                let raw = params.ok_or_else(|| {
                    SolverError::Configuration(
                        "Parameters 'cross' and 'muta' not provided for GA".to_string(),
                    )
                })?;
                Ok(Algorithm::Ga(GaParams::parse(raw)?))
            }
            other => Err(SolverError::Configuration(format!(
                "Unknown algorithm '{}'",
                other
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Pso(_) => "PSO",
            Algorithm::Gwo => "GWO",
            Algorithm::Eoo => "EOO",
            Algorithm::Ga(_) => "GA",
        }
    }

    /// Whether the algorithm already produces binary candidates and skips discretization.
    pub fn is_discrete_native(&self) -> bool {
        matches!(self, Algorithm::Ga(_))
    }

    pub fn needs_swarm_state(&self) -> bool {
        matches!(self, Algorithm::Pso(_))
    }

    /// Smallest population the update rule is defined for.
    pub fn min_population(&self) -> usize {
        match self {
            Algorithm::Gwo => 3,
            Algorithm::Ga(_) => 2,
            Algorithm::Pso(_) | Algorithm::Eoo => 1,
        }
    }

    /// Checks the algorithm's parameters against a population size.
    pub fn validate(&self, population_size: usize) -> Result<()> {
        if population_size < self.min_population() {
            return Err(SolverError::Configuration(format!(
                "{} needs a population of at least {}, got {}",
                self.name(),
                self.min_population(),
                population_size
            )));
        }
        match self {
            Algorithm::Pso(params) => params.validate(),
            Algorithm::Ga(params) => params.validate(),
            Algorithm::Gwo | Algorithm::Eoo => Ok(()),
        }
    }

    /// Allocates the state the algorithm keeps across generations.
    pub fn init_state(&self, size: usize, dimension: usize, objective: Objective) -> AlgorithmState {
        if self.needs_swarm_state() {
            AlgorithmState::Swarm(SwarmState::new(size, dimension, objective))
        } else {
            AlgorithmState::Stateless
        }
    }

    /// Proposes the next population.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError::Configuration`] when a swarm algorithm is
    /// stepped without swarm state, and a [`SolverError::Strategy`] when the
    /// context is inconsistent or the proposal has the wrong shape.
    pub fn step(
        &self,
        ctx: &StepContext<'_>,
        state: AlgorithmState,
        rng: &mut RandomNumberGenerator,
    ) -> Result<StepOutcome> {
        ctx.validate()?;
        if ctx.population.len() < self.min_population() {
            return Err(SolverError::Configuration(format!(
                "{} needs a population of at least {}, got {}",
                self.name(),
                self.min_population(),
                ctx.population.len()
            )));
        }

        let outcome = match (self, state) {
            (Algorithm::Pso(params), AlgorithmState::Swarm(swarm)) => {
                let (population, swarm) = pso::step(params, ctx, swarm, rng)?;
                StepOutcome {
                    population,
                    state: AlgorithmState::Swarm(swarm),
                }
            }
            (Algorithm::Pso(_), AlgorithmState::Stateless) => {
                return Err(SolverError::Configuration(
                    "PSO requires velocity and personal-best state".to_string(),
                ))
            }
            (Algorithm::Gwo, state) => StepOutcome {
                population: gwo::step(ctx, rng)?,
                state,
            },
            (Algorithm::Eoo, state) => StepOutcome {
                population: eoo::step(ctx, rng)?,
                state,
            },
            (Algorithm::Ga(params), state) => StepOutcome {
                population: ga::step(params, ctx, rng)?,
                state,
            },
        };

        outcome
            .population
            .ensure_shape(ctx.population.len(), ctx.population.dimension())?;
        Ok(outcome)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
