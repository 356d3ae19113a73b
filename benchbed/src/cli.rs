//! Command-line interface for benchbed.

use crate::config::{Config, TestKind};
use benchbed_core::{CriticalValueMode, ReportFormat};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "benchbed")]
#[command(about = "Repeatable CPU, memory and disk micro-benchmarks with statistical reports")]
#[command(version)]
pub struct Cli {
    /// Tests to run (repeatable or comma separated)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub tests: Vec<TestKind>,

    /// Number of measured repetitions per test
    #[arg(short, long)]
    pub repeat: Option<u32>,

    /// Workload invocations per repetition
    #[arg(short, long)]
    pub number: Option<u32>,

    /// Number of warm-up invocations
    #[arg(short, long)]
    pub warmup: Option<u32>,

    /// Seed for the workloads' random number generators
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Size in bytes for disk tests
    #[arg(long)]
    pub disk_size: Option<u64>,

    /// Base directory for run output
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Report formats to write (text, csv, json, markdown, chart)
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<ReportFormat>,

    /// Do not draw charts
    #[arg(long)]
    pub no_charts: bool,

    /// Use tabulated Student-t critical values instead of the exact distribution
    #[arg(long)]
    pub approximate_ci: bool,

    /// Path to config file (defaults to .benchbed.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only values given on the command line override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if !self.tests.is_empty() {
            config.run.tests = self.tests.clone();
        }

        if let Some(repeat) = self.repeat {
            config.run.repeat = repeat;
        }

        if let Some(number) = self.number {
            config.run.number = number;
        }

        if let Some(warmup) = self.warmup {
            config.run.warmup = warmup;
        }

        if self.seed.is_some() {
            config.run.seed = self.seed;
        }

        if let Some(disk_size) = self.disk_size {
            config.workloads.disk_size = disk_size;
        }

        if let Some(output_dir) = &self.output_dir {
            config.output.base_dir = output_dir.clone();
        }

        if !self.format.is_empty() {
            config.output.formats = self.format.clone();
        }

        if self.no_charts {
            config.output.formats.retain(|f| *f != ReportFormat::Chart);
        }

        if self.approximate_ci {
            config.statistics.critical_value = CriticalValueMode::Approximate;
        }
    }
}
