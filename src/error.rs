//! # Error Types
//!
//! This module defines the error type shared by every stage of a run: option
//! validation, instance loading, strategy dispatch, repair and evaluation.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use swarmkp::error::{SolverError, Result};
//!
//! fn check_population(size: usize) -> Result<()> {
//!     if size == 0 {
//!         return Err(SolverError::EmptyPopulation);
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_population(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use swarmkp::error::{SolverError, OptionExt};
//!
//! fn best_index(fitness: &[f64]) -> swarmkp::error::Result<usize> {
//!     (0..fitness.len()).next().ok_or_else_solver(|| SolverError::EmptyPopulation)
//! }
//!
//! assert!(best_index(&[]).is_err());
//! ```

use thiserror::Error;

/// Represents errors that can occur while configuring or executing a run.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Invalid options, unknown algorithm or scheme names, missing parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed, missing or inconsistent problem instance data.
    #[error("Instance error [{source_name}]: {message}")]
    Instance {
        /// Identifier of the offending instance (file name or instance name).
        source_name: String,
        /// What was wrong with it.
        message: String,
    },

    /// A repair procedure ran out of moves without reaching feasibility.
    #[error("Repair error: {0}")]
    Repair(String),

    /// An algorithm strategy produced an unusable population.
    #[error("Strategy error: {0}")]
    Strategy(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when a fitness calculation fails.
    #[error("Fitness calculation error: {0}")]
    FitnessCalculation(String),

    /// Error that occurs when the iteration loop itself cannot proceed.
    #[error("Evolution error: {0}")]
    Evolution(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

impl SolverError {
    /// Builds a [`SolverError::Instance`] for the given instance identifier.
    pub fn instance<S: Into<String>, M: Into<String>>(source_name: S, message: M) -> Self {
        SolverError::Instance {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors that are raised before generation 0 runs.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SolverError::Configuration(_))
    }
}

/// A specialized Result type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, SolverError>` using `err_fn`.
    fn ok_or_else_solver<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SolverError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_solver<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> SolverError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_error_names_source() {
        let err = SolverError::instance("knapPI_1_100_1000_1", "missing optimum");
        let msg = err.to_string();
        assert!(msg.contains("knapPI_1_100_1000_1"));
        assert!(msg.contains("missing optimum"));
    }

    #[test]
    fn test_io_error_converts() {
        fn open() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(SolverError::Io(_))));
    }

    #[test]
    fn test_is_configuration() {
        assert!(SolverError::Configuration("x".into()).is_configuration());
        assert!(!SolverError::EmptyPopulation.is_configuration());
    }
}
