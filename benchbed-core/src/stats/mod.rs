//! Statistical reduction of timing samples.
//!
//! A [`StatisticsReducer`] turns an ordered sequence of durations into a
//! [`SummaryStatistics`] record: central tendency, spread, quartiles and a
//! 95% confidence interval for the mean based on the Student-t distribution.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// The sample was empty or contained values that are not valid durations.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Where the Student-t critical value of a confidence interval came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriticalValueMode {
    /// Inverse CDF of the Student-t distribution.
    #[default]
    Exact,
    /// Tabulated values for small samples, Cornish-Fisher expansion beyond.
    Approximate,
}

impl std::fmt::Display for CriticalValueMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CriticalValueMode::Exact => write!(f, "exact"),
            CriticalValueMode::Approximate => write!(f, "approximate"),
        }
    }
}

/// Summary statistics of one timing sample. All values are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub median: f64,
    /// Bessel-corrected sample standard deviation, 0 for a single measurement.
    pub std_dev: f64,
    pub percentile_25: f64,
    pub percentile_75: f64,
    pub min: f64,
    pub max: f64,
    /// Lower bound of the 95% confidence interval for the mean.
    pub ci_lower: f64,
    /// Upper bound of the 95% confidence interval for the mean.
    pub ci_upper: f64,
    /// Number of measurements the record was computed from.
    pub sample_count: usize,
    /// The t(0.975, n-1) value used for the interval, `None` when n = 1.
    pub critical_value: Option<f64>,
    /// How `critical_value` was obtained.
    pub critical_value_mode: CriticalValueMode,
}

impl SummaryStatistics {
    /// The confidence interval as a `(lower, upper)` pair.
    pub fn confidence_interval(&self) -> (f64, f64) {
        (self.ci_lower, self.ci_upper)
    }

    /// Half the width of the confidence interval (the error bar length).
    pub fn ci_half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

mod critical;
mod reducer;

pub use critical::{approximate_t_critical, exact_t_critical, CONFIDENCE_LEVEL};
pub use reducer::StatisticsReducer;
