use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{
    cancel::CancellationToken,
    options::{EngineOptions, LogLevel},
    record::{IterationRecord, ResultSink, RunSummary},
};
use crate::{
    discretization::DiscretizationScheme,
    diversity::exploration_exploitation,
    error::{OptionExt, Result, SolverError},
    population::{Candidate, Population},
    problem::Problem,
    rng::RandomNumberGenerator,
    strategy::{Algorithm, StepContext, StepOutcome},
};

/// Lifecycle of an [`IterationEngine`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed and ready to run.
    Initializing,
    /// Repairing and scoring the initial population.
    Evaluating,
    /// Computing the given generation.
    Iterating(usize),
    /// Building the summary and closing the sink.
    Finalizing,
    /// Done. The engine cannot run again.
    Terminated,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Initializing => f.write_str("initializing"),
            EngineState::Evaluating => f.write_str("evaluating"),
            EngineState::Iterating(generation) => write!(f, "iterating ({})", generation),
            EngineState::Finalizing => f.write_str("finalizing"),
            EngineState::Terminated => f.write_str("terminated"),
        }
    }
}

/// Drives one run of an [`Algorithm`] against a [`Problem`].
///
/// Every generation the algorithm proposes a population, the discretization
/// scheme maps it to binary candidates (unless the algorithm already works in
/// binary), the problem repairs infeasible candidates and scores them, and the
/// engine updates the best-so-far solution and the diversity signal before
/// handing an [`IterationRecord`] to the sink.
///
/// Per-candidate work runs on rayon once the population reaches the
/// configured parallel threshold. Each candidate draws from its own forked
/// random stream, so a seeded run produces the same result either way.
#[derive(Debug)]
pub struct IterationEngine<P: Problem> {
    problem: P,
    algorithm: Algorithm,
    scheme: Option<DiscretizationScheme>,
    options: EngineOptions,
    cancellation: CancellationToken,
    state: EngineState,
}

impl<P: Problem> IterationEngine<P> {
    /// Creates an engine after checking that the pieces fit together.
    ///
    /// # Arguments
    ///
    /// * `problem` - The domain being optimized.
    /// * `algorithm` - The metaheuristic proposing new populations.
    /// * `scheme` - Discretization applied to continuous proposals on binary
    ///   problems. Ignored for algorithms that are natively binary.
    /// * `options` - Run-level configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError::Configuration`] if:
    /// - The options are invalid (see [`EngineOptions::validate`])
    /// - The algorithm cannot run with the configured population size
    /// - The problem has no decision variables
    /// - A continuous algorithm targets a binary problem without a scheme
    /// - A natively binary algorithm targets a continuous problem
    pub fn new(
        problem: P,
        algorithm: Algorithm,
        scheme: Option<DiscretizationScheme>,
        options: EngineOptions,
    ) -> Result<Self> {
        options.validate()?;
        algorithm.validate(options.get_population_size())?;

        if problem.dimension() == 0 {
            return Err(SolverError::Configuration(
                "Problem has no decision variables".to_string(),
            ));
        }
        if problem.is_binary() && !algorithm.is_discrete_native() && scheme.is_none() {
            return Err(SolverError::Configuration(format!(
                "{} proposes continuous candidates and needs a discretization scheme",
                algorithm
            )));
        }
        if !problem.is_binary() && algorithm.is_discrete_native() {
            return Err(SolverError::Configuration(format!(
                "{} only works on binary problems",
                algorithm
            )));
        }

        let scheme = if algorithm.is_discrete_native() || !problem.is_binary() {
            None
        } else {
            scheme
        };

        Ok(Self {
            problem,
            algorithm,
            scheme,
            options,
            cancellation: CancellationToken::new(),
            state: EngineState::Initializing,
        })
    }

    /// Replaces the engine's cancellation token with a shared one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// A handle that stops the run at the next generation boundary.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    pub fn scheme(&self) -> Option<DiscretizationScheme> {
        self.scheme
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Runs the engine to completion, streaming one record per generation
    /// (generation 0 included) into `sink`.
    ///
    /// A cancelled or timed-out run still finalizes normally and reports
    /// `cancelled = true` in its summary.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The engine has already run
    /// - The problem samples candidates of the wrong dimension
    /// - Repair fails or leaves a candidate infeasible
    /// - A fitness value is not finite
    /// - The algorithm step fails
    /// - The sink fails to record or finish
    ///
    /// The engine is terminated afterwards whether or not the run succeeded.
    pub fn run<S: ResultSink>(&mut self, sink: &mut S) -> Result<RunSummary> {
        if self.state != EngineState::Initializing {
            return Err(SolverError::Evolution(format!(
                "Engine cannot run from state '{}'",
                self.state
            )));
        }

        let result = self.execute(sink);
        if let Err(e) = &result {
            warn!(algorithm = %self.algorithm, error = %e, "run failed");
        }
        self.state = EngineState::Terminated;
        result
    }

    fn execute<S: ResultSink>(&mut self, sink: &mut S) -> Result<RunSummary> {
        let started = Instant::now();
        let size = self.options.get_population_size();
        let dimension = self.problem.dimension();
        let max_iterations = self.options.get_max_iterations();
        let objective = self.problem.objective();
        let metric = self.options.get_diversity_metric();
        let mut rng = RandomNumberGenerator::from_optional_seed(self.options.get_seed());

        info!(
            algorithm = %self.algorithm,
            scheme = %self.scheme.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string()),
            population = size,
            dimension,
            max_iterations,
            seed = ?self.options.get_seed(),
            "starting run"
        );

        let initial = Population::new(
            (0..size)
                .map(|_| self.problem.sample(&mut rng))
                .collect::<Vec<_>>(),
        )?;
        initial.ensure_shape(size, dimension)?;
        let mut algorithm_state = self.algorithm.init_state(size, dimension, objective);

        self.state = EngineState::Evaluating;
        let generation_started = Instant::now();
        let (mut population, mut fitness) = self.repair_and_evaluate(initial)?;
        if let Some(swarm) = algorithm_state.swarm_mut() {
            swarm.update_personal_bests(&population, &fitness, objective);
        }

        let best_index = objective
            .best_index(&fitness)
            .ok_or_else_solver(|| SolverError::EmptyPopulation)?;
        let mut best: Candidate = population.row(best_index).to_vec();
        let mut best_fitness = fitness[best_index];

        let mut max_diversity = metric.measure(&population);
        let balance = exploration_exploitation(max_diversity, max_diversity);
        let record = IterationRecord {
            generation: 0,
            best_fitness,
            elapsed_secs: generation_started.elapsed().as_secs_f64(),
            exploration_pct: balance.exploration_pct,
            exploitation_pct: balance.exploitation_pct,
            diversity: max_diversity,
        };
        self.log_generation(&record, &fitness);
        sink.record(&record)?;

        let mut cancelled = false;
        let mut iterations_completed = 0;

        for iteration in 0..max_iterations {
            if self.should_stop(started) {
                cancelled = true;
                warn!(
                    algorithm = %self.algorithm,
                    completed = iterations_completed,
                    "run stopped before reaching the iteration limit"
                );
                break;
            }

            let generation = iteration + 1;
            self.state = EngineState::Iterating(generation);
            let generation_started = Instant::now();

            let StepOutcome {
                population: proposed,
                state,
            } = {
                let ctx = StepContext {
                    iteration,
                    max_iterations,
                    population: &population,
                    fitness: &fitness,
                    best: &best,
                    bounds: self.problem.bounds(),
                    objective,
                };
                self.algorithm.step(&ctx, algorithm_state, &mut rng)?
            };
            algorithm_state = state;

            let candidates = match self.scheme {
                Some(scheme) => self.discretize(scheme, proposed, &best, &population, &mut rng)?,
                None => proposed,
            };
            let (next, next_fitness) = self.repair_and_evaluate(candidates)?;
            population = next;
            fitness = next_fitness;

            if let Some(swarm) = algorithm_state.swarm_mut() {
                swarm.update_personal_bests(&population, &fitness, objective);
            }
            if let Some(index) = objective.best_index(&fitness) {
                if objective.is_better(fitness[index], best_fitness) {
                    best_fitness = fitness[index];
                    best.clone_from_slice(population.row(index));
                }
            }

            let diversity = metric.measure(&population);
            if diversity > max_diversity {
                max_diversity = diversity;
            }
            let balance = exploration_exploitation(diversity, max_diversity);

            let record = IterationRecord {
                generation,
                best_fitness,
                elapsed_secs: generation_started.elapsed().as_secs_f64(),
                exploration_pct: balance.exploration_pct,
                exploitation_pct: balance.exploitation_pct,
                diversity,
            };
            self.log_generation(&record, &fitness);
            sink.record(&record)?;
            iterations_completed = generation;
        }

        self.state = EngineState::Finalizing;
        let summary = RunSummary {
            best_candidate: best,
            best_fitness,
            total_elapsed_secs: started.elapsed().as_secs_f64(),
            iterations_completed,
            cancelled,
        };
        sink.finish(&summary)?;

        info!(
            algorithm = %self.algorithm,
            best_fitness = summary.best_fitness,
            optimum = ?self.problem.known_optimum(),
            iterations = summary.iterations_completed,
            elapsed_secs = summary.total_elapsed_secs,
            cancelled = summary.cancelled,
            "run finished"
        );
        Ok(summary)
    }

    fn should_stop(&self, started: Instant) -> bool {
        if self.cancellation.is_cancelled() {
            return true;
        }
        match self.options.get_time_limit() {
            Some(limit) => started.elapsed() >= limit,
            None => false,
        }
    }

    fn parallel(&self, count: usize) -> bool {
        count >= self.options.get_parallel_threshold()
    }

    /// Maps each proposed row to binary against the generation's best and the
    /// candidate's own row from the previous generation.
    fn discretize(
        &self,
        scheme: DiscretizationScheme,
        proposed: Population,
        best: &[f64],
        previous: &Population,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Population> {
        let streams = rng.fork_many(proposed.len());
        let rows = proposed.into_rows();

        let binary: Vec<Candidate> = if self.parallel(rows.len()) {
            rows.into_par_iter()
                .zip(streams)
                .enumerate()
                .map(|(i, (row, mut stream))| {
                    scheme.binarize(&row, best, previous.row(i), &mut stream)
                })
                .collect()
        } else {
            rows.into_iter()
                .zip(streams)
                .enumerate()
                .map(|(i, (row, mut stream))| {
                    scheme.binarize(&row, best, previous.row(i), &mut stream)
                })
                .collect()
        };

        Population::new(binary)
    }

    /// Repairs infeasible candidates and scores every candidate.
    fn repair_and_evaluate(&self, population: Population) -> Result<(Population, Vec<f64>)> {
        let problem = &self.problem;
        let evaluate = |candidate: Candidate| -> Result<(Candidate, f64)> {
            let candidate = if problem.is_feasible(&candidate) {
                candidate
            } else {
                problem.repair(candidate)?
            };
            if !problem.is_feasible(&candidate) {
                return Err(SolverError::Repair(
                    "Repair returned an infeasible candidate".to_string(),
                ));
            }

            let score = problem.fitness(&candidate);
            // Check for invalid fitness scores
            if !score.is_finite() {
                return Err(SolverError::FitnessCalculation(format!(
                    "Non-finite fitness score encountered: {}",
                    score
                )));
            }
            Ok((candidate, score))
        };

        let rows = population.into_rows();
        let scored: Vec<(Candidate, f64)> = if self.parallel(rows.len()) {
            rows.into_par_iter()
                .map(evaluate)
                .collect::<Result<Vec<_>>>()?
        } else {
            rows.into_iter().map(evaluate).collect::<Result<Vec<_>>>()?
        };

        let (rows, fitness): (Vec<Candidate>, Vec<f64>) = scored.into_iter().unzip();
        Ok((Population::new(rows)?, fitness))
    }

    fn log_generation(&self, record: &IterationRecord, fitness: &[f64]) {
        match self.options.get_log_level() {
            LogLevel::None => {}
            LogLevel::Minimal => self.log_record(record),
            LogLevel::Verbose => {
                self.log_record(record);
                let objective = self.problem.objective();
                let ranked = objective.rank(fitness);
                if let (Some(&first), Some(&last)) = (ranked.first(), ranked.last()) {
                    debug!(
                        generation = record.generation,
                        generation_best = fitness[first],
                        generation_worst = fitness[last],
                        optimum = ?self.problem.known_optimum(),
                        "generation fitness"
                    );
                }
            }
        }
    }

    fn log_record(&self, record: &IterationRecord) {
        info!(
            algorithm = %self.algorithm,
            generation = record.generation,
            best_fitness = record.best_fitness,
            diversity = record.diversity,
            xpl = record.exploration_pct,
            xpt = record.exploitation_pct,
            elapsed_secs = record.elapsed_secs,
            "generation complete"
        );
    }
}
