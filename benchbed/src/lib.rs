//! benchbed: repeatable CPU, memory and disk micro-benchmarks
//!
//! This library wires the measurement pipeline of `benchbed-core` to the
//! built-in workloads: configuration, test selection, report output and
//! SVG charts.

pub mod cli;
pub mod config;
pub mod orchestrator;
pub mod output;
pub mod svg;
pub mod system;

// Re-export core types for convenience
pub use benchbed_core::{
    BenchmarkOutcome, CriticalValueMode, ReportAssembler, ReportBundle, ReportError, ReportFormat,
    Reporter, ResultSet, SystemInfo, TerminalReporter,
};

// Re-export main types from this crate
pub use cli::Cli;
pub use config::{Config, TestKind, DEFAULT_CONFIG_FILE};
pub use orchestrator::{build_registry, Orchestrator, OrchestratorError};
pub use output::{write_bundle, RunDirectory};
pub use svg::SvgChartRenderer;
pub use system::collect_system_info;
