pub mod discretization;
pub mod diversity;
pub mod engine;
pub mod error;
pub mod population;
pub mod problem;
pub mod rng;
pub mod strategy;

// Re-export commonly used types for convenience
pub use discretization::{BinarizationRule, DiscretizationScheme, TransferFunction};
pub use diversity::{DiversityMetric, ExplorationBalance, SearchPhase};
pub use engine::{
    CancellationToken, CsvSink, EngineOptions, EngineState, IterationEngine, IterationRecord,
    LogLevel, MemorySink, NullSink, ResultSink, RunSummary,
};
pub use error::{OptionExt, Result, SolverError};
pub use population::{Candidate, Population};
pub use problem::{KnapsackInstance, Objective, Problem};
pub use strategy::{Algorithm, GaParams, PsoParams};
