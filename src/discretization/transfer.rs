//! Transfer functions mapping a continuous coordinate to a probability.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::SolverError;

/// S-, V- and X-shaped transfer functions.
///
/// `S*` are sigmoids of increasing flatness, `V*` are symmetric around zero
/// and `X*` mirror the sigmoids.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferFunction {
    S1,
    S2,
    S3,
    S4,
    V1,
    V2,
    V3,
    V4,
    X1,
    X2,
    X3,
    X4,
}

impl TransferFunction {
    pub const ALL: [TransferFunction; 12] = [
        TransferFunction::S1,
        TransferFunction::S2,
        TransferFunction::S3,
        TransferFunction::S4,
        TransferFunction::V1,
        TransferFunction::V2,
        TransferFunction::V3,
        TransferFunction::V4,
        TransferFunction::X1,
        TransferFunction::X2,
        TransferFunction::X3,
        TransferFunction::X4,
    ];

    /// Applies the function to a single coordinate. The result lies in `[0, 1]`.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            TransferFunction::S1 => sigmoid(2.0 * x),
            TransferFunction::S2 => sigmoid(x),
            TransferFunction::S3 => sigmoid(x / 2.0),
            TransferFunction::S4 => sigmoid(x / 3.0),
            TransferFunction::V1 => erf(PI.sqrt() / 2.0 * x).abs(),
            TransferFunction::V2 => x.tanh().abs(),
            TransferFunction::V3 => (x / (1.0 + x * x).sqrt()).abs(),
            TransferFunction::V4 => (2.0 / PI * (PI / 2.0 * x).atan()).abs(),
            TransferFunction::X1 => sigmoid(-2.0 * x),
            TransferFunction::X2 => sigmoid(-x),
            TransferFunction::X3 => sigmoid(-x / 2.0),
            TransferFunction::X4 => sigmoid(-x / 3.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransferFunction::S1 => "S1",
            TransferFunction::S2 => "S2",
            TransferFunction::S3 => "S3",
            TransferFunction::S4 => "S4",
            TransferFunction::V1 => "V1",
            TransferFunction::V2 => "V2",
            TransferFunction::V3 => "V3",
            TransferFunction::V4 => "V4",
            TransferFunction::X1 => "X1",
            TransferFunction::X2 => "X2",
            TransferFunction::X3 => "X3",
            TransferFunction::X4 => "X4",
        }
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransferFunction {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        TransferFunction::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| SolverError::Configuration(format!("Unknown transfer function '{}'", s)))
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Error function, Abramowitz & Stegun 7.1.26 (absolute error below 1.5e-7).
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();
    sign * y
}
