use std::fmt::Write;

use super::chart::{ChartFiles, GRAPHS_DIR};
use crate::results::{BenchmarkOutcome, ResultSet, SystemInfo};

/// Render the Markdown write-up.
///
/// Images are referenced relative to the report under `graphs/`, and only
/// for files listed in `charts`. The footer uses the `timestamp` entry of
/// `info`, so the document depends on nothing but its inputs.
pub fn render_markdown(results: &ResultSet, info: &SystemInfo, charts: &ChartFiles) -> String {
    let mut md = String::new();

    md.push_str("# Performance Test Results\n\n");
    md.push_str("## System Information\n");
    for (key, value) in info.iter() {
        let _ = writeln!(md, "- **{}:** {}", label(key), value);
    }

    md.push_str("\n## Test Results\n");
    for (index, outcome) in results.iter().enumerate() {
        let _ = writeln!(md, "### {}", outcome.name());
        match outcome {
            BenchmarkOutcome::Success { statistics: s, .. } => {
                let _ = writeln!(md, "- **Mean Time:** {:.6} seconds", s.mean);
                let _ = writeln!(md, "- **Median Time:** {:.6} seconds", s.median);
                let _ = writeln!(md, "- **Standard Deviation:** {:.6} seconds", s.std_dev);
                let _ = writeln!(md, "- **25th Percentile:** {:.6} seconds", s.percentile_25);
                let _ = writeln!(md, "- **75th Percentile:** {:.6} seconds", s.percentile_75);
                let _ = writeln!(md, "- **Min Time:** {:.6} seconds", s.min);
                let _ = writeln!(md, "- **Max Time:** {:.6} seconds", s.max);
                let _ = writeln!(
                    md,
                    "- **95% Confidence Interval:** ({:.6}, {:.6}) seconds",
                    s.ci_lower, s.ci_upper
                );
            }
            BenchmarkOutcome::Failure { error, .. } => {
                let _ = writeln!(md, "- **Error:** {}", error);
            }
        }
        if let Some(file) = charts.line_for(index) {
            let _ = writeln!(
                md,
                "\n![{} Line Graph]({}/{})",
                outcome.name(),
                GRAPHS_DIR,
                file
            );
        }
        md.push('\n');
    }

    if results.successes().next().is_some() {
        if let Some(file) = charts.comparison() {
            md.push_str("## Comparison of Test Means\n");
            let _ = writeln!(md, "![Comparison Bar Chart]({}/{})\n", GRAPHS_DIR, file);
        }
    }

    md.push_str("---\n");
    match info.get("timestamp") {
        Some(timestamp) => {
            let _ = writeln!(md, "*Report generated on {}*", timestamp);
        }
        None => md.push_str("*Report generated by benchbed*\n"),
    }

    md
}

/// `total_memory` becomes `Total memory`.
fn label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
