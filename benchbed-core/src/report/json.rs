use serde::Serialize;

use super::ReportError;
use crate::results::{BenchmarkOutcome, ResultSet, SystemInfo};
use crate::stats::SummaryStatistics;

#[derive(Serialize)]
struct JsonReport<'a> {
    system_info: &'a SystemInfo,
    tests: Vec<JsonTest<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonTest<'a> {
    Success {
        name: &'a str,
        times: Vec<f64>,
        statistics: &'a SummaryStatistics,
    },
    Failure {
        name: &'a str,
        error: &'a str,
    },
}

/// Render the structured report: `{"system_info": {...}, "tests": [...]}`.
pub fn render_json(results: &ResultSet, info: &SystemInfo) -> Result<String, ReportError> {
    let tests = results
        .iter()
        .map(|outcome| match outcome {
            BenchmarkOutcome::Success {
                name,
                sample,
                statistics,
            } => JsonTest::Success {
                name,
                times: sample.seconds(),
                statistics,
            },
            BenchmarkOutcome::Failure { name, error } => JsonTest::Failure { name, error },
        })
        .collect();

    let report = JsonReport {
        system_info: info,
        tests,
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}
