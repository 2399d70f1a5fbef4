#![warn(missing_docs)]
//! IFR Monte-Carlo Report - Output Model and Formats
//!
//! Holds everything a run produces in a serializable form and renders it as:
//! - JSON (machine-readable; NaN and infinities are written as `null` and
//!   read back as NaN)
//! - CSV (histogram bins for external plotting)
//!
//! Human-readable terminal output lives in the CLI.

mod csv;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use json::{SCHEMA_VERSION, generate_json_report, parse_json_report};
pub use report::{
    HistogramData, IfrMetrics, Report, ReferenceInterval, ReportMeta, SequenceMetrics, StudyInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Human,
    /// JSON with full schema
    Json,
    /// CSV histogram table
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
