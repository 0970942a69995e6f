//! Binarization rules turning transfer probabilities into genes.

use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;
use crate::rng::RandomNumberGenerator;

/// Threshold of the probability strategy rule.
const PS_ALPHA: f64 = 1.0 / 3.0;

/// How a transfer probability becomes a `0.0`/`1.0` gene.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinarizationRule {
    /// `1` with probability `p`.
    Standard,
    /// Complement of the reference gene with probability `p`, `0` otherwise.
    Complement,
    /// Reference gene, best gene or `1`, depending on where `p` falls.
    ProbabilityStrategy,
    /// Best gene with probability `p`, `0` otherwise.
    Elitist,
}

impl BinarizationRule {
    pub const ALL: [BinarizationRule; 4] = [
        BinarizationRule::Standard,
        BinarizationRule::Complement,
        BinarizationRule::ProbabilityStrategy,
        BinarizationRule::Elitist,
    ];

    /// Produces one gene from a probability, the best-known gene and the
    /// candidate's reference gene.
    pub fn gene(
        self,
        probability: f64,
        best: f64,
        reference: f64,
        rng: &mut RandomNumberGenerator,
    ) -> f64 {
        match self {
            BinarizationRule::Standard => bit(rng.uniform() <= probability),
            BinarizationRule::Complement => {
                if rng.uniform() <= probability {
                    bit(reference < 0.5)
                } else {
                    0.0
                }
            }
            BinarizationRule::ProbabilityStrategy => {
                if probability <= PS_ALPHA {
                    reference
                } else if probability <= (1.0 + PS_ALPHA) / 2.0 {
                    best
                } else {
                    1.0
                }
            }
            BinarizationRule::Elitist => {
                if rng.uniform() < probability {
                    best
                } else {
                    0.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinarizationRule::Standard => "STD",
            BinarizationRule::Complement => "COM",
            BinarizationRule::ProbabilityStrategy => "PS",
            BinarizationRule::Elitist => "ELIT",
        }
    }
}

fn bit(set: bool) -> f64 {
    if set {
        1.0
    } else {
        0.0
    }
}

impl fmt::Display for BinarizationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinarizationRule {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BinarizationRule::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| SolverError::Configuration(format!("Unknown binarization rule '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_extremes() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        for _ in 0..50 {
            assert_eq!(BinarizationRule::Standard.gene(1.0, 0.0, 0.0, &mut rng), 1.0);
            assert_eq!(BinarizationRule::Standard.gene(-1.0, 1.0, 1.0, &mut rng), 0.0);
        }
    }

    #[test]
    fn test_complement_flips_reference() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        assert_eq!(BinarizationRule::Complement.gene(1.0, 0.0, 1.0, &mut rng), 0.0);
        assert_eq!(BinarizationRule::Complement.gene(1.0, 0.0, 0.0, &mut rng), 1.0);
    }

    #[test]
    fn test_probability_strategy_bands() {
        let mut rng = RandomNumberGenerator::from_seed(3);
        let rule = BinarizationRule::ProbabilityStrategy;
        assert_eq!(rule.gene(0.2, 1.0, 0.0, &mut rng), 0.0);
        assert_eq!(rule.gene(0.5, 1.0, 0.0, &mut rng), 1.0);
        assert_eq!(rule.gene(0.5, 0.0, 1.0, &mut rng), 0.0);
        assert_eq!(rule.gene(0.9, 0.0, 0.0, &mut rng), 1.0);
    }

    #[test]
    fn test_elitist_copies_best_or_clears() {
        let mut rng = RandomNumberGenerator::from_seed(4);
        assert_eq!(BinarizationRule::Elitist.gene(1.0, 1.0, 0.0, &mut rng), 1.0);
        assert_eq!(BinarizationRule::Elitist.gene(0.0, 1.0, 1.0, &mut rng), 0.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("elit".parse::<BinarizationRule>().unwrap(), BinarizationRule::Elitist);
        assert!("ROULETTE".parse::<BinarizationRule>().is_err());
    }
}
