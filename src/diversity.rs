//! # Diversity
//!
//! Population dispersion and the exploration/exploitation balance derived
//! from it. The tracker is stateless: the caller owns the running maximum
//! and passes it in.
//!
//! ## Example
//!
//! ```rust
//! use swarmkp::diversity::{exploration_exploitation, DiversityMetric, SearchPhase};
//! use swarmkp::population::Population;
//!
//! let population = Population::new(vec![vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
//! let div = DiversityMetric::Hussain.measure(&population);
//! assert_eq!(div, 0.25);
//!
//! let balance = exploration_exploitation(div, 0.5);
//! assert_eq!(balance.exploration_pct, 50.0);
//! assert_eq!(balance.phase, SearchPhase::Exploration);
//! ```

use crate::population::Population;

/// Dispersion measure over a population.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiversityMetric {
    /// Mean absolute deviation from the per-dimension mean (Hussain et al.).
    #[default]
    Hussain,
    /// Mean absolute deviation from the per-dimension median.
    Median,
}

impl DiversityMetric {
    pub fn measure(self, population: &Population) -> f64 {
        let centre = match self {
            DiversityMetric::Hussain => population.centroid(),
            DiversityMetric::Median => medians(population),
        };
        mean_absolute_deviation(population, &centre)
    }
}

/// Hussain diversity of a population.
pub fn diversity(population: &Population) -> f64 {
    DiversityMetric::Hussain.measure(population)
}

fn mean_absolute_deviation(population: &Population, centre: &[f64]) -> f64 {
    let cells = (population.len() * population.dimension()) as f64;
    if cells == 0.0 {
        return 0.0;
    }
    let total: f64 = population
        .iter()
        .map(|row| {
            row.iter()
                .zip(centre)
                .map(|(x, c)| (c - x).abs())
                .sum::<f64>()
        })
        .sum();
    total / cells
}

fn medians(population: &Population) -> Vec<f64> {
    (0..population.dimension())
        .map(|j| {
            let mut column: Vec<f64> = population.iter().map(|row| row[j]).collect();
            column.sort_by(|a, b| a.total_cmp(b));
            let mid = column.len() / 2;
            if column.len() % 2 == 0 {
                (column[mid - 1] + column[mid]) / 2.0
            } else {
                column[mid]
            }
        })
        .collect()
}

/// Which side of the balance dominates.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Exploration,
    Exploitation,
}

/// Exploration and exploitation percentages; they always sum to 100.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplorationBalance {
    pub exploration_pct: f64,
    pub exploitation_pct: f64,
    pub phase: SearchPhase,
}

/// Splits the current diversity, relative to the largest seen so far, into
/// exploration and exploitation percentages.
///
/// Exploration is rounded to two decimals and clamped to `[0, 100]`. A
/// non-positive maximum means the population has never spread out, which
/// reads as full exploitation.
pub fn exploration_exploitation(current: f64, max_so_far: f64) -> ExplorationBalance {
    let exploration_pct = if max_so_far > 0.0 && current.is_finite() {
        round2(current / max_so_far * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let exploitation_pct = 100.0 - exploration_pct;
    let phase = if exploration_pct >= exploitation_pct {
        SearchPhase::Exploration
    } else {
        SearchPhase::Exploitation
    };
    ExplorationBalance {
        exploration_pct,
        exploitation_pct,
        phase,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
