//! # Problem Adapters
//!
//! A [`Problem`] exposes everything the engine needs to know about one
//! optimization domain: how to score a candidate, whether it satisfies the
//! hard constraints, how to pull an infeasible candidate back into the
//! feasible region and how to sample an initial population.
//!
//! The 0/1 Knapsack problem is the reference implementation, see
//! [`knapsack::KnapsackInstance`].
//!
//! ## Implementing the Trait
//!
//! ```rust
//! use swarmkp::error::Result;
//! use swarmkp::problem::{Bounds, Objective, Problem};
//!
//! #[derive(Debug)]
//! struct OneMax {
//!     bits: usize,
//! }
//!
//! impl Problem for OneMax {
//!     fn dimension(&self) -> usize {
//!         self.bits
//!     }
//!
//!     fn objective(&self) -> Objective {
//!         Objective::Maximize
//!     }
//!
//!     fn fitness(&self, candidate: &[f64]) -> f64 {
//!         candidate.iter().sum()
//!     }
//!
//!     fn is_feasible(&self, _candidate: &[f64]) -> bool {
//!         true
//!     }
//!
//!     fn repair(&self, candidate: Vec<f64>) -> Result<Vec<f64>> {
//!         Ok(candidate)
//!     }
//! }
//!
//! let problem = OneMax { bits: 4 };
//! assert_eq!(problem.fitness(&[1.0, 0.0, 1.0, 1.0]), 3.0);
//! assert_eq!(problem.bounds(), Bounds::unit());
//! ```

pub mod knapsack;

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::error::Result;
use crate::rng::RandomNumberGenerator;

pub use knapsack::{known_optimum, KnapsackInstance};

/// Whether a run seeks to minimize or maximize fitness.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Minimize,
    Maximize,
}

impl Objective {
    /// Returns `true` when `candidate` is strictly better than `incumbent`.
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Objective::Minimize => candidate < incumbent,
            Objective::Maximize => candidate > incumbent,
        }
    }

    /// The score every real fitness value improves upon.
    pub fn worst(self) -> f64 {
        match self {
            Objective::Minimize => f64::INFINITY,
            Objective::Maximize => f64::NEG_INFINITY,
        }
    }

    /// Orders two scores best-first. NaN always sorts last.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self {
                Objective::Minimize => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                Objective::Maximize => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
            },
        }
    }

    /// Indices of `fitness` ordered from best to worst.
    ///
    /// The sort is stable, so ties keep their population order.
    pub fn rank(self, fitness: &[f64]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..fitness.len()).collect();
        order.sort_by(|&a, &b| self.compare(fitness[a], fitness[b]));
        order
    }

    /// Index of the best fitness value, if any.
    pub fn best_index(self, fitness: &[f64]) -> Option<usize> {
        (0..fitness.len()).min_by(|&a, &b| self.compare(fitness[a], fitness[b]))
    }
}

/// Indices of `values` sorted ascending. NaN sorts last.
pub fn ascending_order(values: &[f64]) -> Vec<usize> {
    Objective::Minimize.rank(values)
}

/// Box bounds of the continuous search space.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// The `[0, 1]` box used by binary problems.
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Trait for optimization domains the engine can run against.
pub trait Problem: Debug + Send + Sync {
    /// Number of decision variables of a candidate.
    fn dimension(&self) -> usize;

    /// Optimization direction of [`Problem::fitness`].
    fn objective(&self) -> Objective;

    /// Bounds handed to continuous strategies.
    fn bounds(&self) -> Bounds {
        Bounds::unit()
    }

    /// Objective value of a candidate. Must not have side effects.
    fn fitness(&self, candidate: &[f64]) -> f64;

    /// Whether the candidate satisfies the hard constraints.
    fn is_feasible(&self, candidate: &[f64]) -> bool;

    /// Maps a candidate onto a feasible one.
    ///
    /// Must be deterministic and must return a feasible candidate or an error.
    fn repair(&self, candidate: Vec<f64>) -> Result<Vec<f64>>;

    /// Samples one initial candidate. Defaults to a uniform draw over `{0, 1}`
    /// per coordinate.
    fn sample(&self, rng: &mut RandomNumberGenerator) -> Vec<f64> {
        (0..self.dimension()).map(|_| rng.bit()).collect()
    }

    /// Whether candidates are 0/1 vectors. Continuous strategies then need a
    /// discretization scheme between their proposal and repair.
    fn is_binary(&self) -> bool {
        true
    }

    /// Published optimum for this instance, when known.
    fn known_optimum(&self) -> Option<f64> {
        None
    }
}

impl<P: Problem + ?Sized> Problem for &P {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn objective(&self) -> Objective {
        (**self).objective()
    }

    fn bounds(&self) -> Bounds {
        (**self).bounds()
    }

    fn fitness(&self, candidate: &[f64]) -> f64 {
        (**self).fitness(candidate)
    }

    fn is_feasible(&self, candidate: &[f64]) -> bool {
        (**self).is_feasible(candidate)
    }

    fn repair(&self, candidate: Vec<f64>) -> Result<Vec<f64>> {
        (**self).repair(candidate)
    }

    fn sample(&self, rng: &mut RandomNumberGenerator) -> Vec<f64> {
        (**self).sample(rng)
    }

    fn is_binary(&self) -> bool {
        (**self).is_binary()
    }

    fn known_optimum(&self) -> Option<f64> {
        (**self).known_optimum()
    }
}
