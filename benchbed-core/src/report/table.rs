use std::io;

use super::ReportError;
use crate::results::{BenchmarkOutcome, ResultSet};

/// Column headers of the CSV results table.
pub const CSV_HEADER: [&str; 11] = [
    "Test Name",
    "Mean",
    "Median",
    "Std Dev",
    "25th Percentile",
    "75th Percentile",
    "Min",
    "Max",
    "95% CI Lower",
    "95% CI Upper",
    "Times",
];

/// Render the results table as CSV, one row per outcome.
///
/// Failed outcomes keep the column count with empty numeric cells and an
/// empty `[]` times list.
pub fn render_csv(results: &ResultSet) -> Result<String, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for outcome in results {
        let row: Vec<String> = match outcome {
            BenchmarkOutcome::Success {
                name,
                sample,
                statistics: s,
            } => {
                let times: Vec<String> = sample
                    .seconds()
                    .iter()
                    .map(|t| format!("{:.6}", t))
                    .collect();
                vec![
                    name.clone(),
                    format!("{:.6}", s.mean),
                    format!("{:.6}", s.median),
                    format!("{:.6}", s.std_dev),
                    format!("{:.6}", s.percentile_25),
                    format!("{:.6}", s.percentile_75),
                    format!("{:.6}", s.min),
                    format!("{:.6}", s.max),
                    format!("{:.6}", s.ci_lower),
                    format!("{:.6}", s.ci_upper),
                    format!("[{}]", times.join(", ")),
                ]
            }
            BenchmarkOutcome::Failure { name, .. } => {
                let mut row = vec![name.clone()];
                row.extend(std::iter::repeat(String::new()).take(CSV_HEADER.len() - 2));
                row.push("[]".to_string());
                row
            }
        };
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
