//! Grey wolf optimizer.
//!
//! The three best wolves (alpha, beta, delta) lead the pack. Every wolf moves
//! to the mean of three randomized pulls, one toward each leader. The control
//! parameter `a` falls linearly from 2 to 0, narrowing the pulls over time.

use super::StepContext;
use crate::error::{Result, SolverError};
use crate::population::Population;
use crate::problem::Objective;
use crate::rng::RandomNumberGenerator;

/// Indices of alpha, beta and delta under the given objective.
pub fn leaders(fitness: &[f64], objective: Objective) -> Result<[usize; 3]> {
    let ranked = objective.rank(fitness);
    match ranked.as_slice() {
        [alpha, beta, delta, ..] => Ok([*alpha, *beta, *delta]),
        _ => Err(SolverError::Configuration(format!(
            "GWO needs at least three candidates, got {}",
            fitness.len()
        ))),
    }
}

/// Control parameter `a` at a zero-based iteration.
pub fn control_parameter(iteration: usize, max_iterations: usize) -> f64 {
    if max_iterations == 0 {
        return 0.0;
    }
    2.0 - iteration as f64 * (2.0 / max_iterations as f64)
}

pub(crate) fn step(ctx: &StepContext<'_>, rng: &mut RandomNumberGenerator) -> Result<Population> {
    let [alpha, beta, delta] = leaders(ctx.fitness, ctx.objective)?;
    let pack = [
        ctx.population.row(alpha),
        ctx.population.row(beta),
        ctx.population.row(delta),
    ];
    let a = control_parameter(ctx.iteration, ctx.max_iterations);

    let rows: Vec<Vec<f64>> = ctx
        .population
        .iter()
        .map(|wolf| {
            wolf.iter()
                .enumerate()
                .map(|(j, &x)| {
                    let pulled: f64 = pack
                        .iter()
                        .map(|leader| {
                            let big_a = 2.0 * a * rng.uniform() - a;
                            let big_c = 2.0 * rng.uniform();
                            let distance = (big_c * leader[j] - x).abs();
                            leader[j] - big_a * distance
                        })
                        .sum();
                    pulled / 3.0
                })
                .collect()
        })
        .collect();

    Population::new(rows)
}
