//! # Iteration Engine
//!
//! Runs a metaheuristic against a problem for a fixed number of generations,
//! keeping the best-so-far solution and the exploration/exploitation signal
//! up to date and streaming one [`record::IterationRecord`] per generation
//! into a [`record::ResultSink`].
//!
//! ## Example
//!
//! ```rust
//! use swarmkp::discretization::DiscretizationScheme;
//! use swarmkp::engine::{CsvSink, EngineOptions, IterationEngine};
//! use swarmkp::problem::KnapsackInstance;
//! use swarmkp::strategy::Algorithm;
//!
//! let instance = KnapsackInstance::new(
//!     "toy",
//!     vec![2.0, 3.0, 4.0, 5.0, 6.0],
//!     vec![3.0, 4.0, 5.0, 6.0, 7.0],
//!     10.0,
//! )
//! .unwrap();
//!
//! let options = EngineOptions::builder()
//!     .max_iterations(20)
//!     .population_size(10)
//!     .seed(42)
//!     .build();
//!
//! let scheme: DiscretizationScheme = "V4-ELIT".parse().unwrap();
//! let mut engine = IterationEngine::new(instance, Algorithm::Gwo, Some(scheme), options).unwrap();
//!
//! let mut sink = CsvSink::new(Vec::new());
//! let summary = engine.run(&mut sink).unwrap();
//! assert!(summary.best_fitness > 0.0);
//! assert_eq!(summary.iterations_completed, 20);
//! ```

pub mod cancel;
pub mod launcher;
pub mod options;
pub mod record;

pub use cancel::CancellationToken;
pub use launcher::{EngineState, IterationEngine};
pub use options::{EngineOptions, EngineOptionsBuilder, LogLevel, MIN_ITERATIONS};
pub use record::{CsvSink, IterationRecord, MemorySink, NullSink, ResultSink, RunSummary};
