//! Core measurement pipeline for benchbed.
//!
//! This crate holds everything between a workload and its rendered report:
//! the warm-up/repetition protocol ([`runner`]), the statistical reduction of
//! timing samples ([`stats`]), the result data model ([`results`]) and the
//! report assembly ([`report`]).

pub mod report;
pub mod results;
pub mod runner;
pub mod stats;

// Re-export main types for convenience
pub use report::{
    ChartFiles, ChartRenderer, ChartSet, ComparisonSeries, LineSeries, ReportAssembler,
    ReportBundle, ReportError, ReportFormat, Reporter, TerminalReporter, GRAPHS_DIR,
};
pub use results::{BenchmarkOutcome, InfoValue, ResultSet, SystemInfo, TimingSample};
pub use runner::{
    BenchmarkRunner, RunSettings, RunnerError, Workload, WorkloadError, WorkloadResult,
};
pub use stats::{CriticalValueMode, StatisticsReducer, StatsError, SummaryStatistics};
