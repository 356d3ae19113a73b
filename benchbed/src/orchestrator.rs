//! Runs the selected workloads in order and collects their outcomes.
//!
//! The orchestrator owns the workload registry for the duration of a run.
//! Tests run strictly one after another in the fixed order CPU, Memory,
//! Disk Write, Disk Read, Disk Copy. A failing test is recorded and the run
//! moves on to the next one.

use std::collections::BTreeSet;

use benchbed_core::{BenchmarkRunner, ResultSet, RunSettings, RunnerError, StatisticsReducer};
use benchbed_workloads::{CpuWorkload, DiskSuite, MemoryWorkload, WorkloadRegistry};
use log::{debug, info};
use thiserror::Error;

use crate::config::{Config, TestKind};

pub const CPU_TEST: &str = "CPU Test";
pub const MEMORY_TEST: &str = "Memory Test";
pub const DISK_WRITE_TEST: &str = "Disk Write Test";
pub const DISK_READ_TEST: &str = "Disk Read Test";
pub const DISK_COPY_TEST: &str = "Disk Copy Test";

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The configuration cannot be turned into a run.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The runner rejected its inputs.
    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),
}

/// Register the workloads selected by `config`, in run order.
///
/// Selection order in the config does not matter and duplicates are ignored.
pub fn build_registry(config: &Config) -> WorkloadRegistry {
    let selected: BTreeSet<TestKind> = config.run.tests.iter().copied().collect();
    let seed = config.run.seed;
    let workloads = &config.workloads;
    let mut registry = WorkloadRegistry::new();

    for kind in selected {
        match kind {
            TestKind::Cpu => {
                registry.register(
                    CPU_TEST,
                    CpuWorkload::new(workloads.cpu_iterations, seed),
                    None,
                );
            }
            TestKind::Memory => {
                registry.register(
                    MEMORY_TEST,
                    MemoryWorkload::new(
                        workloads.memory_bytes,
                        workloads.memory_operations,
                        seed,
                    ),
                    None,
                );
            }
            TestKind::Disk => {
                let suite = DiskSuite::new(&workloads.scratch_dir, seed);
                let size = Some(workloads.disk_size);
                registry.register(DISK_WRITE_TEST, suite.write, size);
                registry.register(DISK_READ_TEST, suite.read, size);
                registry.register(DISK_COPY_TEST, suite.copy, size);
            }
        }
    }

    registry
}

/// Drives every registered workload through the runner.
pub struct Orchestrator {
    runner: BenchmarkRunner,
    registry: WorkloadRegistry,
}

impl Orchestrator {
    pub fn new(runner: BenchmarkRunner, registry: WorkloadRegistry) -> Self {
        Self { runner, registry }
    }

    /// Build the runner and the workload registry described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn from_config(config: &Config) -> Result<Self, OrchestratorError> {
        config
            .validate()
            .map_err(|e| OrchestratorError::InvalidConfig(e.to_string()))?;

        let settings = RunSettings::new(config.run.repeat, config.run.number, config.run.warmup);
        let reducer = StatisticsReducer::with_mode(config.statistics.critical_value);
        let runner = BenchmarkRunner::new(settings, reducer)?;

        Ok(Self::new(runner, build_registry(config)))
    }

    /// Names of the tests this orchestrator will run, in order.
    pub fn test_names(&self) -> Vec<String> {
        self.registry.list()
    }

    /// Run every test once.
    ///
    /// The registry, and with it any scratch file the disk tests created, is
    /// dropped before this returns, whether the tests succeeded or not.
    ///
    /// # Errors
    ///
    /// Only runner precondition violations abort the run; workload failures
    /// are recorded in the returned [`ResultSet`].
    pub fn run(self) -> Result<ResultSet, OrchestratorError> {
        let Self {
            runner,
            mut registry,
        } = self;

        info!("Running {} test(s)", registry.len());
        let mut results = ResultSet::new();
        for entry in registry.iter_mut() {
            let outcome = runner.run(entry.workload.as_mut(), &entry.name, entry.parameter)?;
            debug!(
                "{} finished: {}",
                entry.name,
                if outcome.is_success() { "ok" } else { "failed" }
            );
            results.push(outcome);
        }

        drop(registry);
        Ok(results)
    }
}
