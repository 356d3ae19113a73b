//! Warm-up and measurement protocol.
//!
//! The [`BenchmarkRunner`] invokes a [`Workload`] a fixed number of times to
//! warm up, then takes `repeat` measurements of `iterations_per_repeat`
//! invocations each, and reduces them with a [`StatisticsReducer`].
//! Workload failures, including panics, become failure outcomes so one
//! broken test never aborts the rest of a run.

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

use crate::results::{BenchmarkOutcome, TimingSample};
use crate::stats::{StatisticsReducer, StatsError};

/// A failure reported by a workload.
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The workload could not allocate the memory it needs.
    #[error("Memory allocation failed: {0}")]
    Allocation(String),

    /// A required parameter or input file was not available.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// The workload panicked.
    #[error("Workload panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Other(String),
}

/// Result of one workload invocation.
///
/// `Ok(Some(d))` reports an explicitly measured duration, `Ok(None)` leaves
/// timing to the runner.
pub type WorkloadResult = Result<Option<Duration>, WorkloadError>;

/// Anything the runner can time.
///
/// The optional parameter (a byte size for disk workloads) is passed
/// unchanged to every invocation.
pub trait Workload {
    fn execute(&mut self, parameter: Option<u64>) -> WorkloadResult;
}

impl<F> Workload for F
where
    F: FnMut(Option<u64>) -> WorkloadResult,
{
    fn execute(&mut self, parameter: Option<u64>) -> WorkloadResult {
        self(parameter)
    }
}

/// Errors that abort a single `run` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    /// The run settings violate a precondition.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<StatsError> for RunnerError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::InvalidInput(msg) => RunnerError::InvalidInput(msg),
        }
    }
}

/// Repetition protocol for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    /// Number of measurements, one duration each. Must be at least 1.
    pub repeat: u32,
    /// Workload invocations batched into one measurement. Must be at least 1.
    pub iterations_per_repeat: u32,
    /// Untimed invocations before measuring. May be 0.
    pub warmup: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            repeat: 5,
            iterations_per_repeat: 1,
            warmup: 1,
        }
    }
}

impl RunSettings {
    pub fn new(repeat: u32, iterations_per_repeat: u32, warmup: u32) -> Self {
        Self {
            repeat,
            iterations_per_repeat,
            warmup,
        }
    }

    /// Check the preconditions of the protocol.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidInput`] if `repeat` or
    /// `iterations_per_repeat` is zero.
    pub fn validate(&self) -> Result<(), RunnerError> {
        if self.repeat == 0 {
            return Err(RunnerError::InvalidInput(
                "repeat must be at least 1".to_string(),
            ));
        }
        if self.iterations_per_repeat == 0 {
            return Err(RunnerError::InvalidInput(
                "iterations per repeat must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Drives workloads through warm-up and measurement.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRunner {
    settings: RunSettings,
    reducer: StatisticsReducer,
}

impl BenchmarkRunner {
    /// Create a runner.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidInput`] if `settings` are invalid.
    pub fn new(settings: RunSettings, reducer: StatisticsReducer) -> Result<Self, RunnerError> {
        settings.validate()?;
        Ok(Self { settings, reducer })
    }

    /// Run one named benchmark.
    ///
    /// Workload failures are returned as `Ok(BenchmarkOutcome::Failure)`;
    /// only precondition violations produce `Err`.
    pub fn run<W>(
        &self,
        workload: &mut W,
        name: &str,
        parameter: Option<u64>,
    ) -> Result<BenchmarkOutcome, RunnerError>
    where
        W: Workload + ?Sized,
    {
        self.settings.validate()?;

        if self.settings.warmup > 0 {
            info!(
                "Warming up {} ({} iteration(s))...",
                name, self.settings.warmup
            );
            if let Err(err) = self.warm_up(workload, parameter) {
                warn!("{} failed during warm-up: {}", name, err);
                return Ok(BenchmarkOutcome::failure(name, err.to_string()));
            }
        }

        info!("Running {}...", name);
        let mut durations = Vec::with_capacity(self.settings.repeat as usize);
        for repetition in 1..=self.settings.repeat {
            match self.measure_once(workload, parameter) {
                Ok(duration) => {
                    debug!(
                        "{} repetition {}/{}: {:.6}s",
                        name,
                        repetition,
                        self.settings.repeat,
                        duration.as_secs_f64()
                    );
                    durations.push(duration);
                }
                Err(err) => {
                    warn!("{} failed on repetition {}: {}", name, repetition, err);
                    return Ok(BenchmarkOutcome::failure(name, err.to_string()));
                }
            }
        }

        let sample = TimingSample::new(durations)?;
        let statistics = self.reducer.reduce(sample.as_slice())?;
        Ok(BenchmarkOutcome::success(name, sample, statistics))
    }

    fn warm_up<W>(&self, workload: &mut W, parameter: Option<u64>) -> Result<(), WorkloadError>
    where
        W: Workload + ?Sized,
    {
        for _ in 0..self.settings.warmup {
            invoke(workload, parameter)?;
        }
        Ok(())
    }

    /// Take one measurement of `iterations_per_repeat` invocations.
    ///
    /// If every invocation reports its own duration the reported durations
    /// are summed, otherwise the wall-clock time of the batch is used.
    fn measure_once<W>(
        &self,
        workload: &mut W,
        parameter: Option<u64>,
    ) -> Result<Duration, WorkloadError>
    where
        W: Workload + ?Sized,
    {
        let mut reported = Duration::ZERO;
        let mut all_reported = true;

        let start = Instant::now();
        for _ in 0..self.settings.iterations_per_repeat {
            match invoke(workload, parameter)? {
                Some(duration) => reported += duration,
                None => all_reported = false,
            }
        }
        let elapsed = start.elapsed();

        Ok(if all_reported { reported } else { elapsed })
    }
}

/// Call the workload once, turning a panic into [`WorkloadError::Panicked`].
fn invoke<W>(workload: &mut W, parameter: Option<u64>) -> WorkloadResult
where
    W: Workload + ?Sized,
{
    panic::catch_unwind(AssertUnwindSafe(|| workload.execute(parameter)))
        .unwrap_or_else(|payload| Err(WorkloadError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CriticalValueMode;

    fn runner(repeat: u32, iterations: u32, warmup: u32) -> BenchmarkRunner {
        BenchmarkRunner::new(
            RunSettings::new(repeat, iterations, warmup),
            StatisticsReducer::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_settings() {
        let settings = RunSettings::default();
        assert_eq!(settings.repeat, 5);
        assert_eq!(settings.iterations_per_repeat, 1);
        assert_eq!(settings.warmup, 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = BenchmarkRunner::new(RunSettings::new(0, 1, 1), StatisticsReducer::new());
        assert!(matches!(result, Err(RunnerError::InvalidInput(_))));

        let result = BenchmarkRunner::new(RunSettings::new(3, 0, 1), StatisticsReducer::new());
        assert!(matches!(result, Err(RunnerError::InvalidInput(_))));
    }

    #[test]
    fn test_constant_workload() {
        let mut calls = 0;
        let mut workload = |_: Option<u64>| -> WorkloadResult {
            calls += 1;
            Ok(Some(Duration::from_millis(100)))
        };

        let outcome = runner(5, 1, 1).run(&mut workload, "Stub", None).unwrap();

        assert_eq!(calls, 6);
        let sample = outcome.sample().unwrap();
        assert_eq!(sample.len(), 5);
        assert!(sample
            .as_slice()
            .iter()
            .all(|d| *d == Duration::from_millis(100)));

        let stats = outcome.statistics().unwrap();
        assert!((stats.mean - 0.1).abs() < 1e-12);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.critical_value_mode, CriticalValueMode::Exact);
    }

    #[test]
    fn test_iterations_are_batched_into_one_duration() {
        let mut calls = 0;
        let mut workload = |_: Option<u64>| -> WorkloadResult {
            calls += 1;
            Ok(Some(Duration::from_millis(10)))
        };

        let outcome = runner(3, 4, 0).run(&mut workload, "Batched", None).unwrap();

        assert_eq!(calls, 12);
        let sample = outcome.sample().unwrap();
        assert_eq!(sample.len(), 3);
        assert!(sample
            .as_slice()
            .iter()
            .all(|d| *d == Duration::from_millis(40)));
    }

    #[test]
    fn test_unreported_durations_use_wall_clock() {
        let mut workload = |_: Option<u64>| -> WorkloadResult {
            std::thread::sleep(Duration::from_millis(2));
            Ok(None)
        };

        let outcome = runner(2, 1, 0).run(&mut workload, "Sleep", None).unwrap();

        let sample = outcome.sample().unwrap();
        assert!(sample
            .as_slice()
            .iter()
            .all(|d| *d >= Duration::from_millis(2)));
    }

    #[test]
    fn test_parameter_threaded_to_every_call() {
        let mut seen = Vec::new();
        let mut workload = |parameter: Option<u64>| -> WorkloadResult {
            seen.push(parameter);
            Ok(Some(Duration::from_millis(1)))
        };

        runner(3, 2, 2)
            .run(&mut workload, "Param", Some(4096))
            .unwrap();

        assert_eq!(seen.len(), 8);
        assert!(seen.iter().all(|p| *p == Some(4096)));
    }

    #[test]
    fn test_zero_warmup_skips_warm_up() {
        let mut calls = 0;
        let mut workload = |_: Option<u64>| -> WorkloadResult {
            calls += 1;
            Ok(Some(Duration::from_millis(1)))
        };

        runner(4, 1, 0).run(&mut workload, "Cold", None).unwrap();
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_failure_on_third_measurement() {
        let mut measured = 0;
        let mut workload = |_: Option<u64>| -> WorkloadResult {
            measured += 1;
            // Call 1 is the warm-up, call 4 is the third measurement.
            if measured == 4 {
                return Err(WorkloadError::Other("disk full".to_string()));
            }
            Ok(Some(Duration::from_millis(5)))
        };

        let outcome = runner(5, 1, 1).run(&mut workload, "Flaky", None).unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.name(), "Flaky");
        assert_eq!(outcome.error(), Some("disk full"));
        assert_eq!(measured, 4);
    }

    #[test]
    fn test_failure_during_warm_up() {
        let mut workload = |_: Option<u64>| -> WorkloadResult {
            Err(WorkloadError::Allocation("2147483648 bytes".to_string()))
        };

        let outcome = runner(5, 1, 1).run(&mut workload, "Memory", None).unwrap();

        assert_eq!(
            outcome.error(),
            Some("Memory allocation failed: 2147483648 bytes")
        );
    }

    #[test]
    fn test_panic_becomes_failure() {
        let mut workload = |_: Option<u64>| -> WorkloadResult { panic!("index out of bounds") };

        let outcome = runner(2, 1, 0).run(&mut workload, "Panics", None).unwrap();

        assert_eq!(
            outcome.error(),
            Some("Workload panicked: index out of bounds")
        );
    }

    #[test]
    fn test_failure_is_isolated() {
        let runner = runner(3, 1, 0);
        let mut ok = |_: Option<u64>| -> WorkloadResult { Ok(Some(Duration::from_millis(7))) };
        let mut broken =
            |_: Option<u64>| -> WorkloadResult { Err(WorkloadError::MissingInput("source".into())) };

        let first = runner.run(&mut ok, "First", None).unwrap();
        let second = runner.run(&mut broken, "Second", None).unwrap();
        let third = runner.run(&mut ok, "Third", None).unwrap();

        assert!(first.is_success());
        assert!(!second.is_success());
        assert!(third.is_success());
    }

    #[test]
    fn test_boxed_workload() {
        let mut boxed: Box<dyn Workload> =
            Box::new(|_: Option<u64>| -> WorkloadResult { Ok(Some(Duration::from_millis(3))) });

        let outcome = runner(2, 1, 0)
            .run(boxed.as_mut(), "Boxed", None)
            .unwrap();
        assert!(outcome.is_success());
    }
}
