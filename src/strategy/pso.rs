//! Particle swarm optimization.
//!
//! Each particle keeps a velocity that blends its inertia with pulls toward
//! its personal best and the global best:
//!
//! `v = w·v + c1·r1·(pbest − x) + c2·r2·(gbest − x)`, clamped to `±Vmax`,
//! then `x = x + v`. The inertia weight falls linearly from `w_max` to
//! `w_min` over the run and `Vmax` is a fraction of the upper bound.

use super::{StepContext, SwarmState};
use crate::error::{Result, SolverError};
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

/// Coefficients of the velocity update.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PsoParams {
    pub w_max: f64,
    pub w_min: f64,
    /// Cognitive acceleration (pull toward the personal best).
    pub c1: f64,
    /// Social acceleration (pull toward the global best).
    pub c2: f64,
    /// `Vmax` as a fraction of the upper bound.
    pub velocity_clamp: f64,
}

impl Default for PsoParams {
    fn default() -> Self {
        Self {
            w_max: 0.9,
            w_min: 0.1,
            c1: 2.0,
            c2: 2.0,
            velocity_clamp: 0.1,
        }
    }
}

impl PsoParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.velocity_clamp > 0.0 && self.velocity_clamp.is_finite()) {
            return Err(SolverError::Configuration(format!(
                "PSO velocity clamp must be positive, got {}",
                self.velocity_clamp
            )));
        }
        if self.w_min > self.w_max {
            return Err(SolverError::Configuration(format!(
                "PSO inertia range is inverted: w_min {} > w_max {}",
                self.w_min, self.w_max
            )));
        }
        Ok(())
    }

    /// Inertia weight at a zero-based iteration.
    pub fn inertia(&self, iteration: usize, max_iterations: usize) -> f64 {
        if max_iterations == 0 {
            return self.w_max;
        }
        self.w_max - iteration as f64 * ((self.w_max - self.w_min) / max_iterations as f64)
    }
}

pub(crate) fn step(
    params: &PsoParams,
    ctx: &StepContext<'_>,
    mut swarm: SwarmState,
    rng: &mut RandomNumberGenerator,
) -> Result<(Population, SwarmState)> {
    if swarm.velocity.len() != ctx.population.len()
        || swarm.personal_best.len() != ctx.population.len()
    {
        return Err(SolverError::Strategy(format!(
            "Swarm state tracks {} particles, population has {}",
            swarm.velocity.len(),
            ctx.population.len()
        )));
    }

    let v_max = ctx.bounds.upper.abs() * params.velocity_clamp;
    let w = params.inertia(ctx.iteration, ctx.max_iterations);

    let rows: Vec<Vec<f64>> = ctx
        .population
        .iter()
        .zip(swarm.velocity.iter_mut())
        .zip(&swarm.personal_best)
        .map(|((x, v), pbest)| {
            x.iter()
                .zip(v.iter_mut())
                .zip(pbest)
                .zip(ctx.best)
                .map(|(((&xj, vj), &pj), &gj)| {
                    let r1 = rng.uniform();
                    let r2 = rng.uniform();
                    let next = w * *vj + params.c1 * r1 * (pj - xj) + params.c2 * r2 * (gj - xj);
                    *vj = next.clamp(-v_max, v_max);
                    xj + *vj
                })
                .collect()
        })
        .collect();

    Ok((Population::new(rows)?, swarm))
}
