//! Per-generation records, the final summary and the sinks that receive them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::population::Candidate;

/// Snapshot of one generation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// 0 for the evaluated initial population, then 1..=max_iterations.
    pub generation: usize,
    /// Best fitness found so far.
    pub best_fitness: f64,
    /// Wall-clock seconds spent on this generation.
    pub elapsed_secs: f64,
    pub exploration_pct: f64,
    pub exploitation_pct: f64,
    pub diversity: f64,
}

/// Outcome of a finished run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub best_candidate: Candidate,
    pub best_fitness: f64,
    pub total_elapsed_secs: f64,
    /// Generations completed after generation 0.
    pub iterations_completed: usize,
    /// Whether a cancellation token or time limit ended the run early.
    pub cancelled: bool,
}

/// Receives the records of a run as they are produced.
pub trait ResultSink {
    fn record(&mut self, record: &IterationRecord) -> Result<()>;

    /// Called once after the last record.
    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn record(&mut self, record: &IterationRecord) -> Result<()> {
        (**self).record(record)
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        (**self).finish(summary)
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn record(&mut self, _record: &IterationRecord) -> Result<()> {
        Ok(())
    }
}

/// Keeps every record and the summary in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<IterationRecord>,
    pub summary: Option<RunSummary>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, record: &IterationRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}

/// Writes records as CSV with the header `iter,fitness,time,XPL,XPT,DIV`.
#[derive(Debug)]
pub struct CsvSink<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "iter,fitness,time,XPL,XPT,DIV")?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl CsvSink<BufWriter<File>> {
    /// Creates (or truncates) a CSV file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> ResultSink for CsvSink<W> {
    fn record(&mut self, record: &IterationRecord) -> Result<()> {
        self.ensure_header()?;
        writeln!(
            self.writer,
            "{},{:?},{:.3},{:?},{:?},{:?}",
            record.generation,
            record.best_fitness,
            record.elapsed_secs,
            record.exploration_pct,
            record.exploitation_pct,
            record.diversity
        )?;
        Ok(())
    }

    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        self.ensure_header()?;
        self.writer.flush()?;
        Ok(())
    }
}
