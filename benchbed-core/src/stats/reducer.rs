use std::cmp::Ordering;
use std::time::Duration;

use log::warn;

use super::critical::{approximate_t_critical, exact_t_critical};
use super::{CriticalValueMode, StatsError, SummaryStatistics};

/// Reduces timing samples to [`SummaryStatistics`].
///
/// Quartiles use the exclusive convention (Hyndman-Fan type 6): the rank of
/// the p-th quantile is `p * (n + 1)` on 1-based sorted positions, linearly
/// interpolated and clamped to `[1, n]` so quartiles never leave `[min, max]`.
///
/// The reducer holds no state beyond its critical-value mode and is
/// deterministic: identical input yields a bit-identical record.
#[derive(Debug, Clone, Default)]
pub struct StatisticsReducer {
    mode: CriticalValueMode,
}

impl StatisticsReducer {
    /// Create a reducer using the exact Student-t distribution.
    pub fn new() -> Self {
        Self {
            mode: CriticalValueMode::Exact,
        }
    }

    /// Create a reducer that always uses approximate critical values.
    pub fn approximate() -> Self {
        Self {
            mode: CriticalValueMode::Approximate,
        }
    }

    /// Create a reducer with the given critical-value mode.
    pub fn with_mode(mode: CriticalValueMode) -> Self {
        Self { mode }
    }

    /// The configured critical-value mode.
    pub fn mode(&self) -> CriticalValueMode {
        self.mode
    }

    /// Reduce a sequence of durations.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidInput`] if `samples` is empty.
    pub fn reduce(&self, samples: &[Duration]) -> Result<SummaryStatistics, StatsError> {
        let seconds: Vec<f64> = samples.iter().map(Duration::as_secs_f64).collect();
        self.reduce_seconds(&seconds)
    }

    /// Reduce a sequence of durations expressed in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidInput`] if `values` is empty or contains
    /// a negative or non-finite value.
    pub fn reduce_seconds(&self, values: &[f64]) -> Result<SummaryStatistics, StatsError> {
        if values.is_empty() {
            return Err(StatsError::InvalidInput(
                "cannot reduce an empty timing sample".to_string(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(StatsError::InvalidInput(format!(
                "durations must be finite and non-negative, got {}",
                bad
            )));
        }

        let n = values.len();
        let mean = Self::mean(values);
        let std_dev = Self::std_dev(values, mean);

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

        let (critical_value, critical_value_mode, ci_lower, ci_upper) = if n > 1 {
            let (t, mode) = self.critical_value(n - 1);
            let margin = t * std_dev / (n as f64).sqrt();
            (Some(t), mode, mean - margin, mean + margin)
        } else {
            (None, self.mode, mean, mean)
        };

        Ok(SummaryStatistics {
            mean,
            median: Self::median(&sorted),
            std_dev,
            percentile_25: Self::quantile(&sorted, 0.25),
            percentile_75: Self::quantile(&sorted, 0.75),
            min: sorted[0],
            max: sorted[n - 1],
            ci_lower,
            ci_upper,
            sample_count: n,
            critical_value,
            critical_value_mode,
        })
    }

    /// Pick the t(0.975, df) critical value according to the configured mode.
    ///
    /// Falls back to the approximation, with a warning, if the exact
    /// distribution is unusable for `df`.
    fn critical_value(&self, df: usize) -> (f64, CriticalValueMode) {
        match self.mode {
            CriticalValueMode::Approximate => {
                (approximate_t_critical(df), CriticalValueMode::Approximate)
            }
            CriticalValueMode::Exact => match exact_t_critical(df as f64) {
                Some(t) => (t, CriticalValueMode::Exact),
                None => {
                    let t = approximate_t_critical(df);
                    warn!(
                        "Student-t quantile unavailable for df={}, using approximate critical value {:.3}",
                        df, t
                    );
                    (t, CriticalValueMode::Approximate)
                }
            },
        }
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Sample standard deviation with Bessel's correction (n-1 denominator).
    fn std_dev(values: &[f64], mean: f64) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let sum_sq_diff: f64 = values
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum();
        (sum_sq_diff / (values.len() - 1) as f64).sqrt()
    }

    fn median(sorted: &[f64]) -> f64 {
        let n = sorted.len();
        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    fn quantile(sorted: &[f64], p: f64) -> f64 {
        let n = sorted.len();
        let rank = (p * (n + 1) as f64).clamp(1.0, n as f64);
        let lower = rank.floor() as usize;
        let fraction = rank - lower as f64;
        let below = sorted[lower - 1];
        let above = sorted[lower.min(n - 1)];
        below + fraction * (above - below)
    }
}
