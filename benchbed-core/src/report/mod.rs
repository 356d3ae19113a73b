//! Report assembly.
//!
//! [`ReportAssembler`] renders a [`ResultSet`](crate::ResultSet) and its
//! [`SystemInfo`](crate::SystemInfo) into text, CSV, JSON and Markdown, and
//! computes the chart series handed to a [`ChartRenderer`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::results::ResultSet;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact could not be written to its destination.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Chart rendering failed: {0}")]
    Chart(String),
}

/// An output format the assembler can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Csv,
    Json,
    Markdown,
    Chart,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 5] = [
        ReportFormat::Text,
        ReportFormat::Csv,
        ReportFormat::Json,
        ReportFormat::Markdown,
        ReportFormat::Chart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Chart => "chart",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown report format '{0}' (expected one of: text, csv, json, markdown, chart)")]
pub struct UnknownFormat(pub String);

impl FromStr for ReportFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "chart" | "charts" => Ok(ReportFormat::Chart),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Something that presents a whole result set, e.g. on the terminal.
pub trait Reporter {
    fn report(&self, results: &ResultSet) -> Result<(), ReportError>;
}

mod assemble;
mod chart;
mod json;
mod markdown;
mod table;
mod terminal;
mod text;

pub use assemble::{ReportAssembler, ReportBundle};
pub use chart::{
    ChartFiles, ChartRenderer, ChartSet, ComparisonSeries, LineSeries, COMPARISON_CHART_FILE,
    GRAPHS_DIR,
};
pub use json::render_json;
pub use markdown::render_markdown;
pub use table::{render_csv, CSV_HEADER};
pub use terminal::TerminalReporter;
pub use text::render_text;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert_eq!("MD".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("charts".parse::<ReportFormat>().unwrap(), ReportFormat::Chart);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_format_display_roundtrip() {
        for format in ReportFormat::ALL {
            assert_eq!(format.to_string().parse::<ReportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_write_error_display() {
        let err = ReportError::Write {
            path: PathBuf::from("/read-only/results.csv"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "Failed to write /read-only/results.csv: denied");
    }
}
