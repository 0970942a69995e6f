//! # 0/1 Knapsack
//!
//! The reference [`Problem`] implementation. A candidate selects items with
//! genes equal to `1.0`; it is feasible when the selected weight does not
//! exceed the capacity and its fitness is the selected profit.
//!
//! Repair is the greedy trade-off heuristic: items are ordered by
//! profit/weight, the worst selected items are dropped until the candidate
//! fits, then the best unselected items are added back until the next one no
//! longer fits.
//!
//! ## Example
//!
//! ```rust
//! use swarmkp::problem::{KnapsackInstance, Problem};
//!
//! let kp = KnapsackInstance::new(
//!     "toy",
//!     vec![2.0, 3.0, 4.0, 5.0, 6.0],
//!     vec![3.0, 4.0, 5.0, 6.0, 7.0],
//!     10.0,
//! )
//! .unwrap();
//!
//! let all = vec![1.0; 5];
//! assert!(!kp.is_feasible(&all));
//!
//! let repaired = kp.repair(all).unwrap();
//! assert!(kp.is_feasible(&repaired));
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{trace, warn};

use super::{ascending_order, Objective, Problem};
use crate::error::{Result, SolverError};

/// Published optima of the standard benchmark instances, keyed by instance name.
const KNOWN_OPTIMA: &[(&str, f64)] = &[
    ("kn_f1_l-d_kp_10_269", 295.0),
    ("kn_f2_l-d_kp_20_878", 1024.0),
    ("kn_f3_l-d_kp_4_20", 35.0),
    ("kn_f4_l-d_kp_4_11", 23.0),
    ("kn_f5_l-d_kp_15_375", 481.0694),
    ("kn_f6_l-d_kp_10_60", 52.0),
    ("kn_f7_l-d_kp_7_50", 107.0),
    ("kn_f8_l-d_kp_23_10000", 9767.0),
    ("kn_f9_l-d_kp_5_80", 130.0),
    ("kn_f10_l-d_kp_20_879", 1025.0),
    ("knapPI_1_100_1000_1", 9147.0),
    ("knapPI_1_200_1000_1", 11238.0),
    ("knapPI_1_500_1000_1", 28857.0),
    ("knapPI_1_1000_1000_1", 54503.0),
    ("knapPI_1_2000_1000_1", 110625.0),
    ("knapPI_1_5000_1000_1", 276457.0),
    ("knapPI_1_10000_1000_1", 563647.0),
    ("knapPI_2_100_1000_1", 1514.0),
    ("knapPI_2_200_1000_1", 1634.0),
    ("knapPI_2_500_1000_1", 4566.0),
    ("knapPI_2_1000_1000_1", 9052.0),
    ("knapPI_2_2000_1000_1", 18051.0),
    ("knapPI_2_5000_1000_1", 44356.0),
    ("knapPI_2_10000_1000_1", 90204.0),
    ("knapPI_3_100_1000_1", 2397.0),
    ("knapPI_3_200_1000_1", 2697.0),
    ("knapPI_3_500_1000_1", 7117.0),
    ("knapPI_3_1000_1000_1", 14390.0),
    ("knapPI_3_2000_1000_1", 28919.0),
    ("knapPI_3_5000_1000_1", 72505.0),
    ("knapPI_3_10000_1000_1", 146919.0),
];

/// Looks up the published optimum of a benchmark instance.
///
/// Accepts a bare name or a path; directories and a trailing `.txt` are ignored.
pub fn known_optimum(instance: &str) -> Option<f64> {
    let name = instance_name(instance);
    KNOWN_OPTIMA
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, optimum)| *optimum)
}

fn instance_name(instance: &str) -> &str {
    let base = instance.rsplit(['/', '\\']).next().unwrap_or(instance);
    base.strip_suffix(".txt").unwrap_or(base)
}

/// Trade-off substituted for an item with zero weight and positive profit.
pub const ZERO_WEIGHT_TRADE_OFF: f64 = f64::MAX;

/// A 0/1 Knapsack instance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct KnapsackInstance {
    name: String,
    weights: Vec<f64>,
    profits: Vec<f64>,
    capacity: f64,
    trade_offs: Vec<f64>,
    /// Item indices sorted by ascending trade-off.
    order: Vec<usize>,
    /// Bound on the rounding gap between a running weight total and
    /// [`KnapsackInstance::selected_weight`]. Inside it repair checks feasibility exactly.
    weight_slack: f64,
}

impl KnapsackInstance {
    /// Creates an instance and precomputes the trade-off ordering used by repair.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Instance`] when the instance is empty, when
    /// weights and profits differ in length, when any weight or profit is
    /// negative or not finite, or when the capacity is not finite.
    pub fn new<S: Into<String>>(
        name: S,
        weights: Vec<f64>,
        profits: Vec<f64>,
        capacity: f64,
    ) -> Result<Self> {
        let name = name.into();

        if weights.is_empty() {
            return Err(SolverError::instance(name, "instance has no items"));
        }
        if weights.len() != profits.len() {
            return Err(SolverError::instance(
                name,
                format!(
                    "{} weights but {} profits",
                    weights.len(),
                    profits.len()
                ),
            ));
        }
        if let Some(idx) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
            return Err(SolverError::instance(
                name,
                format!("item {} has invalid weight {}", idx, weights[idx]),
            ));
        }
        if let Some(idx) = profits.iter().position(|p| !p.is_finite() || *p < 0.0) {
            return Err(SolverError::instance(
                name,
                format!("item {} has invalid profit {}", idx, profits[idx]),
            ));
        }
        if !capacity.is_finite() {
            return Err(SolverError::instance(
                name,
                format!("capacity {} is not finite", capacity),
            ));
        }

        let zero_weight = weights.iter().filter(|w| **w == 0.0).count();
        if zero_weight > 0 {
            warn!(instance = %name, zero_weight, "instance contains items with zero weight");
        }

        let trade_offs: Vec<f64> = weights
            .iter()
            .zip(&profits)
            .map(|(&w, &p)| trade_off(p, w))
            .collect();
        let order = ascending_order(&trade_offs);
        let total_weight: f64 = weights.iter().sum();
        let weight_slack = 2.0 * weights.len() as f64 * f64::EPSILON * total_weight;

        Ok(Self {
            name,
            weights,
            profits,
            capacity,
            trade_offs,
            order,
            weight_slack,
        })
    }

    /// Parses the line-oriented benchmark format.
    ///
    /// The first line holds `items capacity`; each of the following `items`
    /// lines holds `profit weight`, separated by whitespace.
    pub fn from_reader<S: Into<String>, R: BufRead>(name: S, reader: R) -> Result<Self> {
        let name = name.into();
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(SolverError::instance(name, "instance is empty")),
        };
        let mut fields = header.split_whitespace();
        let items: usize = parse_field(&name, fields.next(), "item count", 1)?;
        let capacity: f64 = parse_field(&name, fields.next(), "capacity", 1)?;

        let mut weights = Vec::with_capacity(items);
        let mut profits = Vec::with_capacity(items);
        for item in 0..items {
            let line_no = item + 2;
            let line = match lines.next() {
                Some(line) => line?,
                None => {
                    return Err(SolverError::instance(
                        name,
                        format!("expected {} items, found {}", items, item),
                    ))
                }
            };
            let mut fields = line.split_whitespace();
            profits.push(parse_field(&name, fields.next(), "profit", line_no)?);
            weights.push(parse_field(&name, fields.next(), "weight", line_no)?);
        }

        Self::new(name, weights, profits, capacity)
    }

    /// Opens and parses an instance file; the instance is named after the file stem.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| instance_name(&n.to_string_lossy()).to_string())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path).map_err(|e| {
            SolverError::instance(name.clone(), format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(name, BufReader::new(file))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn profits(&self) -> &[f64] {
        &self.profits
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn trade_offs(&self) -> &[f64] {
        &self.trade_offs
    }

    /// Total weight of the selected items.
    pub fn selected_weight(&self, candidate: &[f64]) -> f64 {
        dot(candidate, &self.weights)
    }

    /// Number of selected items.
    pub fn selected_count(&self, candidate: &[f64]) -> usize {
        candidate.iter().filter(|&&g| is_selected(g)).count()
    }

    /// Published optimum of this instance, or an instance error naming it.
    pub fn require_known_optimum(&self) -> Result<f64> {
        known_optimum(&self.name).ok_or_else(|| {
            SolverError::instance(self.name.clone(), "no known optimum for this instance")
        })
    }
}

impl Problem for KnapsackInstance {
    fn dimension(&self) -> usize {
        self.items()
    }

    fn objective(&self) -> Objective {
        Objective::Maximize
    }

    fn fitness(&self, candidate: &[f64]) -> f64 {
        dot(candidate, &self.profits)
    }

    fn is_feasible(&self, candidate: &[f64]) -> bool {
        self.selected_weight(candidate) <= self.capacity
    }

    fn repair(&self, candidate: Vec<f64>) -> Result<Vec<f64>> {
        if candidate.len() != self.items() {
            return Err(SolverError::Repair(format!(
                "candidate has {} genes, instance {} has {} items",
                candidate.len(),
                self.name,
                self.items()
            )));
        }

        let mut solution: Vec<f64> = candidate
            .into_iter()
            .map(|g| if is_selected(g) { 1.0 } else { 0.0 })
            .collect();
        let mut weight = self.selected_weight(&solution);

        let mut removal = self.order.iter();
        while weight > self.capacity {
            let Some(&item) = removal.next() else {
                return Err(SolverError::Repair(format!(
                    "instance {}: no selected item left to drop, weight {} exceeds capacity {}",
                    self.name, weight, self.capacity
                )));
            };
            if solution[item] == 1.0 {
                solution[item] = 0.0;
                weight -= self.weights[item];
                trace!(item, weight, "dropped item");
                if weight <= self.capacity + self.weight_slack {
                    weight = self.selected_weight(&solution);
                }
            }
        }

        for &item in self.order.iter().rev() {
            if solution[item] == 1.0 {
                continue;
            }
            solution[item] = 1.0;
            let next = weight + self.weights[item];
            let fits = if (next - self.capacity).abs() <= self.weight_slack {
                self.is_feasible(&solution)
            } else {
                next <= self.capacity
            };
            if !fits {
                solution[item] = 0.0;
                trace!(item, "rolled back item");
                break;
            }
            weight = next;
            trace!(item, weight, "added item");
        }

        if !self.is_feasible(&solution) {
            return Err(SolverError::Repair(format!(
                "instance {}: repaired candidate still exceeds capacity",
                self.name
            )));
        }
        Ok(solution)
    }

    fn known_optimum(&self) -> Option<f64> {
        known_optimum(&self.name)
    }
}

fn trade_off(profit: f64, weight: f64) -> f64 {
    if weight > 0.0 {
        profit / weight
    } else if profit > 0.0 {
        ZERO_WEIGHT_TRADE_OFF
    } else {
        0.0
    }
}

fn is_selected(gene: f64) -> bool {
    gene >= 0.5
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn parse_field<T: std::str::FromStr>(
    name: &str,
    field: Option<&str>,
    what: &str,
    line: usize,
) -> Result<T> {
    let raw = field.ok_or_else(|| {
        SolverError::instance(name, format!("line {}: missing {}", line, what))
    })?;
    raw.parse::<T>().map_err(|_| {
        SolverError::instance(name, format!("line {}: invalid {} '{}'", line, what, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn toy() -> KnapsackInstance {
        KnapsackInstance::new(
            "toy",
            vec![2.0, 3.0, 4.0, 5.0, 6.0],
            vec![3.0, 4.0, 5.0, 6.0, 7.0],
            10.0,
        )
        .unwrap()
    }

    #[test]
    fn test_fitness_and_feasibility() {
        let kp = toy();
        let candidate = [1.0, 1.0, 0.0, 0.0, 0.0];
        assert_eq!(kp.fitness(&candidate), 7.0);
        assert!(kp.is_feasible(&candidate));
        assert!(!kp.is_feasible(&[1.0; 5]));
    }

    #[test]
    fn test_repair_all_ones() {
        let kp = toy();
        let repaired = kp.repair(vec![1.0; 5]).unwrap();

        assert!(kp.selected_weight(&repaired) <= 10.0);
        assert!(kp.fitness(&repaired) >= 0.0);
        // Trade-offs descend with the index, so the last items are dropped first.
        assert_eq!(repaired, vec![1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let kp = toy();
        for mask in 0..32u32 {
            let candidate: Vec<f64> = (0..5).map(|i| ((mask >> i) & 1) as f64).collect();
            let once = kp.repair(candidate).unwrap();
            let twice = kp.repair(once.clone()).unwrap();
            assert_eq!(once, twice, "mask {:05b}", mask);
        }
    }

    #[test]
    fn test_repair_fills_feasible_candidate() {
        let kp = toy();
        let repaired = kp.repair(vec![0.0; 5]).unwrap();
        assert_eq!(repaired, vec![1.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_repair_adds_every_item_when_all_fit() {
        let kp = KnapsackInstance::new("loose", vec![1.0, 1.0], vec![1.0, 2.0], 10.0).unwrap();
        assert_eq!(kp.repair(vec![0.0, 0.0]).unwrap(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_repair_with_decimal_weights_at_capacity() {
        let weights = vec![0.1, 0.9, 0.1 * 3.0, 0.6, 0.1 * 3.0, 0.1];
        assert_eq!(weights[2], 0.30000000000000004);

        for profits in [vec![1.0; 6], vec![2.0, 9.0, 3.0, 5.0, 4.0, 1.0]] {
            let kp = KnapsackInstance::new("decimal", weights.clone(), profits, 1.3).unwrap();
            let repaired = kp.repair(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).unwrap();
            assert!(kp.is_feasible(&repaired));
            assert_eq!(kp.repair(repaired.clone()).unwrap(), repaired);
        }
    }

    #[test]
    fn test_repair_exhaustion_is_an_error() {
        let kp = KnapsackInstance::new("negative", vec![1.0], vec![1.0], -1.0).unwrap();
        assert!(matches!(kp.repair(vec![1.0]), Err(SolverError::Repair(_))));
    }

    #[test]
    fn test_repair_rejects_wrong_dimension() {
        assert!(matches!(toy().repair(vec![1.0]), Err(SolverError::Repair(_))));
    }

    #[test]
    fn test_zero_weight_trade_off_is_finite() {
        let kp =
            KnapsackInstance::new("zero", vec![0.0, 0.0, 2.0], vec![5.0, 0.0, 4.0], 1.0).unwrap();
        assert_eq!(kp.trade_offs(), &[ZERO_WEIGHT_TRADE_OFF, 0.0, 2.0]);
        assert!(kp.trade_offs().iter().all(|t| t.is_finite()));

        let repaired = kp.repair(vec![0.0, 0.0, 1.0]).unwrap();
        assert_eq!(repaired[0], 1.0);
        assert!(kp.is_feasible(&repaired));
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let err = KnapsackInstance::new("bad", vec![1.0], vec![1.0, 2.0], 3.0).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_new_rejects_negative_weight() {
        assert!(KnapsackInstance::new("bad", vec![-1.0], vec![1.0], 3.0).is_err());
    }

    #[test]
    fn test_from_reader() {
        let data = "3 10\n5 4\n6 5\n3 2\n";
        let kp = KnapsackInstance::from_reader("inline", Cursor::new(data)).unwrap();
        assert_eq!(kp.items(), 3);
        assert_eq!(kp.capacity(), 10.0);
        assert_eq!(kp.profits(), &[5.0, 6.0, 3.0]);
        assert_eq!(kp.weights(), &[4.0, 5.0, 2.0]);
    }

    #[test]
    fn test_from_reader_truncated() {
        let data = "3 10\n5 4\n";
        match KnapsackInstance::from_reader("short", Cursor::new(data)) {
            Err(SolverError::Instance {
                source_name,
                message,
            }) => {
                assert_eq!(source_name, "short");
                assert!(message.contains("expected 3 items"));
            }
            other => panic!("Expected Instance error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_reader_empty_and_garbage() {
        assert!(KnapsackInstance::from_reader("empty", Cursor::new("")).is_err());
        assert!(KnapsackInstance::from_reader("junk", Cursor::new("two 10\n")).is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        match KnapsackInstance::from_path("/nonexistent/knapPI_1_100_1000_1.txt") {
            Err(SolverError::Instance { source_name, .. }) => {
                assert_eq!(source_name, "knapPI_1_100_1000_1")
            }
            other => panic!("Expected Instance error, got {:?}", other),
        }
    }

    #[test]
    fn test_known_optimum_lookup() {
        assert_eq!(known_optimum("knapPI_1_100_1000_1"), Some(9147.0));
        assert_eq!(known_optimum("Instances/kn_f3_l-d_kp_4_20.txt"), Some(35.0));
        assert_eq!(known_optimum("unknown"), None);
        assert!(toy().require_known_optimum().is_err());
    }
}
