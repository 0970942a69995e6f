//! Eurasian oystercatcher optimizer.
//!
//! Every bird draws a length `L` in `[3, 5)`; its time `T` and energy
//! coefficient `C` are `L` rescaled into fixed ranges. An era term `E` falls
//! linearly from 0.5 to -0.5 across the run. The new position is
//! `C·x + T + E + L·r·(best − x)`.

use super::StepContext;
use crate::error::Result;
use crate::population::Population;
use crate::rng::RandomNumberGenerator;

const L_MIN: f64 = 3.0;
const L_MAX: f64 = 5.0;

/// Per-bird coefficients derived from one uniform draw of `L`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub length: f64,
    pub time: f64,
    pub energy: f64,
}

impl Coefficients {
    pub fn from_length(length: f64) -> Self {
        let span = L_MAX - L_MIN;
        Self {
            length,
            time: ((length - L_MAX) / span) * 10.0 - 5.0,
            energy: ((length - L_MIN) / span) * 2.0 + 0.6,
        }
    }
}

/// Era term at a zero-based iteration: 0.5 at the start, -0.5 at the last iteration.
///
/// Normalized by `max_iterations - 1`, not by the population size, so the
/// schedule spans the whole run whatever `N` is. A single-iteration run is
/// pinned at -0.5.
pub fn era(iteration: usize, max_iterations: usize) -> f64 {
    if max_iterations <= 1 {
        return -0.5;
    }
    let remaining = max_iterations.saturating_sub(iteration).max(1);
    (remaining - 1) as f64 / (max_iterations - 1) as f64 - 0.5
}

pub(crate) fn step(ctx: &StepContext<'_>, rng: &mut RandomNumberGenerator) -> Result<Population> {
    let e = era(ctx.iteration, ctx.max_iterations);

    let rows: Vec<Vec<f64>> = ctx
        .population
        .iter()
        .map(|bird| {
            let k = Coefficients::from_length(rng.uniform_range(L_MIN, L_MAX));
            let r = rng.uniform();
            bird.iter()
                .zip(ctx.best)
                .map(|(&x, &b)| {
                    let y = k.time + e + k.length * r * (b - x);
                    x * k.energy + y
                })
                .collect()
        })
        .collect();

    Population::new(rows)
}
