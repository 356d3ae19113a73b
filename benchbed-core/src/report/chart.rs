use std::collections::{BTreeMap, HashSet};

use super::ReportError;
use crate::results::ResultSet;

/// Directory, relative to the report, that chart files are written to.
pub const GRAPHS_DIR: &str = "graphs";

/// File name of the comparison bar chart.
pub const COMPARISON_CHART_FILE: &str = "comparison_bar_chart.svg";

/// Per-test line chart: repetition index against duration.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    /// Position of the outcome within the result set.
    pub outcome_index: usize,
    pub name: String,
    pub file_name: String,
    /// `(repetition, seconds)` pairs, repetitions numbered from 1.
    pub points: Vec<(usize, f64)>,
}

/// Bar chart of means with 95% confidence interval error bars.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    pub file_name: String,
    pub names: Vec<String>,
    pub means: Vec<f64>,
    pub half_widths: Vec<f64>,
}

/// Everything a [`ChartRenderer`] is asked to draw for one result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSet {
    pub lines: Vec<LineSeries>,
    /// Present when at least one outcome succeeded.
    pub comparison: Option<ComparisonSeries>,
}

impl ChartSet {
    /// Compute chart series for the successful outcomes of `results`.
    pub fn from_results(results: &ResultSet) -> Self {
        let mut taken: HashSet<String> = HashSet::new();
        let mut lines = Vec::new();
        let mut names = Vec::new();
        let mut means = Vec::new();
        let mut half_widths = Vec::new();

        for success in results.successes() {
            let file_name = unique_file_name(&slug(success.name), &mut taken);

            let points = success
                .sample
                .seconds()
                .into_iter()
                .enumerate()
                .map(|(i, secs)| (i + 1, secs))
                .collect();

            lines.push(LineSeries {
                outcome_index: success.index,
                name: success.name.to_string(),
                file_name,
                points,
            });
            names.push(success.name.to_string());
            means.push(success.statistics.mean);
            half_widths.push(success.statistics.ci_half_width());
        }

        let comparison = (!names.is_empty()).then(|| ComparisonSeries {
            file_name: COMPARISON_CHART_FILE.to_string(),
            names,
            means,
            half_widths,
        });

        Self { lines, comparison }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.comparison.is_none()
    }
}

/// `<stem>_line.svg`, or `<stem>_<n>_line.svg` with the smallest `n >= 2`
/// not already in `taken`. The chosen name is added to `taken`.
fn unique_file_name(stem: &str, taken: &mut HashSet<String>) -> String {
    let mut file_name = format!("{}_line.svg", stem);
    let mut n = 2;
    while taken.contains(&file_name) {
        file_name = format!("{}_{}_line.svg", stem, n);
        n += 1;
    }
    taken.insert(file_name.clone());
    file_name
}

/// Lower-case, filesystem-safe form of a test name.
fn slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if slug.is_empty() {
        "test".to_string()
    } else {
        slug
    }
}

/// Chart files a renderer actually produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartFiles {
    per_test: BTreeMap<usize, String>,
    comparison: Option<String>,
}

impl ChartFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the line chart produced for the outcome at `outcome_index`.
    pub fn insert_line(&mut self, outcome_index: usize, file_name: impl Into<String>) {
        self.per_test.insert(outcome_index, file_name.into());
    }

    pub fn set_comparison(&mut self, file_name: impl Into<String>) {
        self.comparison = Some(file_name.into());
    }

    /// The line chart of the outcome at `outcome_index`, if one was produced.
    pub fn line_for(&self, outcome_index: usize) -> Option<&str> {
        self.per_test.get(&outcome_index).map(String::as_str)
    }

    pub fn comparison(&self) -> Option<&str> {
        self.comparison.as_deref()
    }

    /// All produced file names, line charts first.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.per_test
            .values()
            .map(String::as_str)
            .chain(self.comparison.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.per_test.is_empty() && self.comparison.is_none()
    }
}

/// Renders chart series to image files.
///
/// Implementations decide where files go; they return the names of the
/// files they produced so the Markdown report can reference them.
pub trait ChartRenderer {
    fn render(&self, charts: &ChartSet) -> Result<ChartFiles, ReportError>;
}
