use std::io::{self, Write};

use colored::Colorize;

use super::{ReportError, Reporter};
use crate::results::{BenchmarkOutcome, ResultSet};
use crate::stats::SummaryStatistics;

/// A reporter that prints a summary table of the results to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// Format a duration in seconds to a human-readable string.
    fn format_time(secs: f64) -> String {
        let ns = secs * 1_000_000_000.0;
        if ns >= 1_000_000_000.0 {
            format!("{:.3} s", secs)
        } else if ns >= 1_000_000.0 {
            format!("{:.3} ms", ns / 1_000_000.0)
        } else if ns >= 1_000.0 {
            format!("{:.3} us", ns / 1_000.0)
        } else {
            format!("{:.3} ns", ns)
        }
    }

    /// Format a mean with its standard deviation.
    fn format_time_with_stddev(stats: &SummaryStatistics) -> String {
        format!(
            "{} (+/- {})",
            Self::format_time(stats.mean),
            Self::format_time(stats.std_dev)
        )
    }

    fn format_interval(stats: &SummaryStatistics) -> String {
        format!(
            "[{}, {}]",
            Self::format_time(stats.ci_lower),
            Self::format_time(stats.ci_upper)
        )
    }

    fn paint(&self, text: &str, success: bool) -> String {
        if !self.use_colors {
            text.to_string()
        } else if success {
            text.green().bold().to_string()
        } else {
            text.red().bold().to_string()
        }
    }

    /// Print the table header.
    fn print_header(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer)?;
        let header = format!(
            "{:<32} {:>28} {:>30} {:>8}",
            "Test", "Mean (+/- std dev)", "95% CI", "Status"
        );
        if self.use_colors {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }
        writeln!(writer, "{}", "-".repeat(101))?;
        Ok(())
    }

    /// Print a single outcome row.
    fn print_row(&self, writer: &mut impl Write, outcome: &BenchmarkOutcome) -> io::Result<()> {
        let name = if outcome.name().chars().count() > 30 {
            let truncated: String = outcome.name().chars().take(27).collect();
            format!("{}...", truncated)
        } else {
            outcome.name().to_string()
        };

        match outcome {
            BenchmarkOutcome::Success { statistics, .. } => {
                // "ok" is two visible characters; pad before coloring.
                let status = self.paint(&format!("{:>8}", "ok"), true);
                writeln!(
                    writer,
                    "{:<32} {:>28} {:>30} {}",
                    name,
                    Self::format_time_with_stddev(statistics),
                    Self::format_interval(statistics),
                    status
                )?;
            }
            BenchmarkOutcome::Failure { error, .. } => {
                let status = self.paint(&format!("{:>8}", "failed"), false);
                writeln!(writer, "{:<32} {:>28} {:>30} {}", name, "-", "-", status)?;
                writeln!(writer, "    {}", error)?;
            }
        }
        Ok(())
    }

    /// Print the summary footer.
    fn print_summary(&self, writer: &mut impl Write, results: &ResultSet) -> io::Result<()> {
        let failed = results.failure_count();
        let passed = results.len() - failed;

        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(101))?;

        let summary_label = "Summary:";
        if self.use_colors {
            write!(writer, "{} ", summary_label.bold())?;
        } else {
            write!(writer, "{} ", summary_label)?;
        }

        let passed_text = format!("{} completed", passed);
        let failed_text = format!("{} failed", failed);
        if self.use_colors {
            writeln!(writer, "{}, {}", passed_text.green(), failed_text.red())?;
        } else {
            writeln!(writer, "{}, {}", passed_text, failed_text)?;
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Write the full table to `writer`.
    pub fn write_to(&self, writer: &mut impl Write, results: &ResultSet) -> io::Result<()> {
        self.print_header(writer)?;
        for outcome in results {
            self.print_row(writer, outcome)?;
        }
        self.print_summary(writer, results)
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, results: &ResultSet) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_to(&mut writer, results)?;
        Ok(())
    }
}
