//! # Discretization
//!
//! Continuous strategies move candidates through real space; binary problems
//! need genes in `{0, 1}`. A [`DiscretizationScheme`] combines a
//! [`TransferFunction`] (coordinate to probability) with a
//! [`BinarizationRule`] (probability to gene) and is named the way the
//! benchmark tooling names it, e.g. `"V4-ELIT"` or `"S2-STD"`.
//!
//! ## Example
//!
//! ```rust
//! use swarmkp::discretization::DiscretizationScheme;
//! use swarmkp::rng::RandomNumberGenerator;
//!
//! let scheme: DiscretizationScheme = "V4-ELIT".parse().unwrap();
//! let mut rng = RandomNumberGenerator::from_seed(11);
//!
//! let binary = scheme.binarize(&[0.8, -2.5, 0.0], &[1.0, 1.0, 0.0], &[0.0, 1.0, 1.0], &mut rng);
//! assert!(binary.iter().all(|&g| g == 0.0 || g == 1.0));
//! assert_eq!(scheme.to_string(), "V4-ELIT");
//! ```

pub mod binarization;
pub mod transfer;

use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;
use crate::rng::RandomNumberGenerator;

pub use binarization::BinarizationRule;
pub use transfer::TransferFunction;

/// A named transfer function plus binarization rule.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiscretizationScheme {
    pub transfer: TransferFunction,
    pub rule: BinarizationRule,
}

impl DiscretizationScheme {
    pub fn new(transfer: TransferFunction, rule: BinarizationRule) -> Self {
        Self { transfer, rule }
    }

    /// Maps a continuous candidate to a binary one of the same dimension.
    ///
    /// `best` is the best-known solution and `reference` the candidate's
    /// binary row from the previous generation. Coordinates beyond the
    /// shorter of the two reference slices read as `0.0`.
    pub fn binarize(
        &self,
        candidate: &[f64],
        best: &[f64],
        reference: &[f64],
        rng: &mut RandomNumberGenerator,
    ) -> Vec<f64> {
        candidate
            .iter()
            .enumerate()
            .map(|(j, &x)| {
                let probability = self.transfer.apply(x);
                let best_gene = best.get(j).copied().unwrap_or(0.0);
                let reference_gene = reference.get(j).copied().unwrap_or(0.0);
                self.rule.gene(probability, best_gene, reference_gene, rng)
            })
            .collect()
    }
}

impl Default for DiscretizationScheme {
    fn default() -> Self {
        Self::new(TransferFunction::V4, BinarizationRule::Elitist)
    }
}

impl fmt::Display for DiscretizationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.transfer, self.rule)
    }
}

impl FromStr for DiscretizationScheme {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (transfer, rule) = s.split_once('-').ok_or_else(|| {
            SolverError::Configuration(format!(
                "Discretization scheme '{}' must look like TRANSFER-RULE, e.g. V4-ELIT",
                s
            ))
        })?;
        Ok(Self::new(transfer.parse()?, rule.parse()?))
    }
}
