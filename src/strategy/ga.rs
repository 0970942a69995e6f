//! Genetic algorithm on binary candidates.
//!
//! The generation's best candidate survives unchanged; the rest of the next
//! population is bred from binary tournament winners through one-point
//! crossover and per-gene bit-flip mutation.

use super::StepContext;
use crate::error::{Result, SolverError};
use crate::population::{Candidate, Population};
use crate::problem::Objective;
use crate::rng::RandomNumberGenerator;

const TOURNAMENT_SIZE: usize = 2;

/// Crossover and mutation rates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GaParams {
    pub crossover_rate: f64,
    pub mutation_rate: f64,
}

impl GaParams {
    pub fn new(crossover_rate: f64, mutation_rate: f64) -> Result<Self> {
        let params = Self {
            crossover_rate,
            mutation_rate,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parses `"cross:0.9;muta:0.01"`. Keys may also be spelled
    /// `crossover` and `mutation`; whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut crossover_rate = None;
        let mut mutation_rate = None;

        for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once(':').ok_or_else(|| {
                SolverError::Configuration(format!("GA parameter '{}' is not key:value", pair))
            })?;
            let value: f64 = value.trim().parse().map_err(|_| {
                SolverError::Configuration(format!("GA parameter '{}' is not a number", pair))
            })?;
            match key.trim().to_ascii_lowercase().as_str() {
                "cross" | "crossover" => crossover_rate = Some(value),
                "muta" | "mutation" => mutation_rate = Some(value),
                other => {
                    return Err(SolverError::Configuration(format!(
                        "Unknown GA parameter '{}'",
                        other
                    )))
                }
            }
        }

        match (crossover_rate, mutation_rate) {
            (Some(c), Some(m)) => Self::new(c, m),
            (None, _) => Err(SolverError::Configuration(
                "GA parameter 'cross' is missing".to_string(),
            )),
            (_, None) => Err(SolverError::Configuration(
                "GA parameter 'muta' is missing".to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("crossover", self.crossover_rate),
            ("mutation", self.mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SolverError::Configuration(format!(
                    "GA {} rate must lie in [0, 1], got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }
}

/// Index of the better of `TOURNAMENT_SIZE` uniformly drawn candidates.
fn tournament(fitness: &[f64], objective: Objective, rng: &mut RandomNumberGenerator) -> usize {
    let mut winner = rng.index(fitness.len());
    for _ in 1..TOURNAMENT_SIZE {
        let challenger = rng.index(fitness.len());
        if objective.is_better(fitness[challenger], fitness[winner]) {
            winner = challenger;
        }
    }
    winner
}

/// Swaps the tails of two parents after a random cut point.
fn one_point_crossover(
    first: &[f64],
    second: &[f64],
    rng: &mut RandomNumberGenerator,
) -> (Candidate, Candidate) {
    if first.len() < 2 {
        return (first.to_vec(), second.to_vec());
    }
    let cut = 1 + rng.index(first.len() - 1);
    let mut a = first[..cut].to_vec();
    a.extend_from_slice(&second[cut..]);
    let mut b = second[..cut].to_vec();
    b.extend_from_slice(&first[cut..]);
    (a, b)
}

fn mutate(child: &mut [f64], rate: f64, rng: &mut RandomNumberGenerator) {
    for gene in child.iter_mut() {
        if rng.chance(rate) {
            *gene = if *gene >= 0.5 { 0.0 } else { 1.0 };
        }
    }
}

pub(crate) fn step(
    params: &GaParams,
    ctx: &StepContext<'_>,
    rng: &mut RandomNumberGenerator,
) -> Result<Population> {
    let size = ctx.population.len();
    let elite = ctx
        .objective
        .best_index(ctx.fitness)
        .ok_or(SolverError::EmptyPopulation)?;

    let mut next: Vec<Candidate> = Vec::with_capacity(size);
    next.push(ctx.population.row(elite).to_vec());

    while next.len() < size {
        let p1 = ctx.population.row(tournament(ctx.fitness, ctx.objective, rng));
        let p2 = ctx.population.row(tournament(ctx.fitness, ctx.objective, rng));

        let (mut c1, mut c2) = if rng.chance(params.crossover_rate) {
            one_point_crossover(p1, p2, rng)
        } else {
            (p1.to_vec(), p2.to_vec())
        };
        mutate(&mut c1, params.mutation_rate, rng);
        mutate(&mut c2, params.mutation_rate, rng);

        next.push(c1);
        if next.len() < size {
            next.push(c2);
        }
    }

    Population::new(next)
}
