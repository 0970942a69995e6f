//! # Population
//!
//! A `Population` is an ordered set of equally sized candidate vectors. Rows
//! carry no identity beyond their index; a strategy step consumes one
//! population and produces the next one by value.
//!
//! ## Example
//!
//! ```rust
//! use swarmkp::population::Population;
//!
//! let population = Population::new(vec![vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
//! assert_eq!(population.len(), 2);
//! assert_eq!(population.dimension(), 2);
//! ```

use crate::error::{Result, SolverError};

/// One solution vector. Binary problems store `0.0`/`1.0` genes.
pub type Candidate = Vec<f64>;

/// An ordered collection of candidates of a common dimension.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    rows: Vec<Candidate>,
    dimension: usize,
}

impl Population {
    /// Builds a population from its rows.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::EmptyPopulation`] when `rows` is empty and a
    /// [`SolverError::Strategy`] when the rows disagree on their length.
    pub fn new(rows: Vec<Candidate>) -> Result<Self> {
        let dimension = rows.first().map(Vec::len).ok_or(SolverError::EmptyPopulation)?;
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != dimension) {
            return Err(SolverError::Strategy(format!(
                "Row {} has dimension {}, expected {}",
                idx,
                row.len(),
                dimension
            )));
        }
        Ok(Self { rows, dimension })
    }

    /// Builds a `size` × `dimension` population filled by `f(row, column)`.
    pub fn from_fn<F>(size: usize, dimension: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let rows = (0..size)
            .map(|i| (0..dimension).map(|j| f(i, j)).collect())
            .collect();
        Self::new(rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn rows(&self) -> &[Candidate] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Candidate> {
        self.rows
    }

    /// Checks that this population has the expected shape.
    pub fn ensure_shape(&self, size: usize, dimension: usize) -> Result<()> {
        if self.rows.len() != size || self.dimension != dimension {
            return Err(SolverError::Strategy(format!(
                "Expected a {}x{} population, got {}x{}",
                size,
                dimension,
                self.rows.len(),
                self.dimension
            )));
        }
        Ok(())
    }

    /// Per-dimension arithmetic mean of the population.
    pub fn centroid(&self) -> Vec<f64> {
        let n = self.rows.len() as f64;
        let mut sums = vec![0.0; self.dimension];
        for row in &self.rows {
            for (sum, value) in sums.iter_mut().zip(row) {
                *sum += value;
            }
        }
        sums.iter_mut().for_each(|s| *s /= n);
        sums
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
