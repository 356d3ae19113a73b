//! Result data model shared by the runner and the report assembler.

use std::fmt;
use std::time::Duration;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::stats::{StatsError, SummaryStatistics};

/// Ordered, non-empty sequence of measured durations, one per repetition.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSample {
    durations: Vec<Duration>,
}

impl TimingSample {
    /// Create a sample from measurements in repetition order.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidInput`] if `durations` is empty.
    pub fn new(durations: Vec<Duration>) -> Result<Self, StatsError> {
        if durations.is_empty() {
            return Err(StatsError::InvalidInput(
                "a timing sample needs at least one measurement".to_string(),
            ));
        }
        Ok(Self { durations })
    }

    pub fn as_slice(&self) -> &[Duration] {
        &self.durations
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// The measurements converted to seconds.
    pub fn seconds(&self) -> Vec<f64> {
        self.durations.iter().map(Duration::as_secs_f64).collect()
    }
}

/// Outcome of one named benchmark.
#[derive(Debug, Clone, PartialEq)]
pub enum BenchmarkOutcome {
    /// All repetitions completed.
    Success {
        name: String,
        sample: TimingSample,
        statistics: SummaryStatistics,
    },
    /// The workload reported a failure; no partial timings are kept.
    Failure { name: String, error: String },
}

impl BenchmarkOutcome {
    /// Create a success outcome.
    pub fn success(
        name: impl Into<String>,
        sample: TimingSample,
        statistics: SummaryStatistics,
    ) -> Self {
        Self::Success {
            name: name.into(),
            sample,
            statistics,
        }
    }

    /// Create a failure outcome.
    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failure {
            name: name.into(),
            error: error.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Success { name, .. } | Self::Failure { name, .. } => name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn sample(&self) -> Option<&TimingSample> {
        match self {
            Self::Success { sample, .. } => Some(sample),
            Self::Failure { .. } => None,
        }
    }

    pub fn statistics(&self) -> Option<&SummaryStatistics> {
        match self {
            Self::Success { statistics, .. } => Some(statistics),
            Self::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error.as_str()),
        }
    }
}

/// A successful outcome viewed through [`ResultSet::successes`].
#[derive(Debug, Clone, Copy)]
pub struct SuccessView<'a> {
    /// Position of the outcome within the result set.
    pub index: usize,
    pub name: &'a str,
    pub sample: &'a TimingSample,
    pub statistics: &'a SummaryStatistics,
}

/// Append-only, ordered collection of outcomes for one run.
///
/// Duplicate names are allowed and kept as separate entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    outcomes: Vec<BenchmarkOutcome>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome; insertion order is execution order.
    pub fn push(&mut self, outcome: BenchmarkOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[BenchmarkOutcome] {
        &self.outcomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BenchmarkOutcome> {
        self.outcomes.iter()
    }

    /// Successful outcomes in execution order, with their positions.
    pub fn successes(&self) -> impl Iterator<Item = SuccessView<'_>> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(index, outcome)| match outcome {
                BenchmarkOutcome::Success {
                    name,
                    sample,
                    statistics,
                } => Some(SuccessView {
                    index,
                    name,
                    sample,
                    statistics,
                }),
                BenchmarkOutcome::Failure { .. } => None,
            })
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a BenchmarkOutcome;
    type IntoIter = std::slice::Iter<'a, BenchmarkOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

impl FromIterator<BenchmarkOutcome> for ResultSet {
    fn from_iter<I: IntoIterator<Item = BenchmarkOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

/// A scalar value in the system information mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    Text(String),
    Integer(u64),
}

impl fmt::Display for InfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoValue::Text(s) => write!(f, "{}", s),
            InfoValue::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl Serialize for InfoValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InfoValue::Text(s) => serializer.serialize_str(s),
            InfoValue::Integer(i) => serializer.serialize_u64(*i),
        }
    }
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        InfoValue::Text(value.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(value: String) -> Self {
        InfoValue::Text(value)
    }
}

impl From<u64> for InfoValue {
    fn from(value: u64) -> Self {
        InfoValue::Integer(value)
    }
}

impl From<usize> for InfoValue {
    fn from(value: usize) -> Self {
        InfoValue::Integer(value as u64)
    }
}

/// Opaque, insertion-ordered key/value description of the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemInfo {
    entries: Vec<(String, InfoValue)>,
}

impl SystemInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<InfoValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<InfoValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SystemInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
