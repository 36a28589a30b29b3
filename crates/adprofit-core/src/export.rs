//! Report export
//!
//! Supports:
//! - Profit/loss CSV with a fixed header that downstream sheets depend on
//! - JSON summary for scripting
//! - SHA-256 fingerprint of the rendered CSV for comparing runs

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::models::ReconciledRow;
use crate::pipeline::RunSummary;

/// Report columns, in order. Consumers match these names exactly.
pub const REPORT_HEADER: [&str; 5] = ["CampID", "Campaign Name", "Spend", "Revenue", "Profit/Loss"];

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// Write report rows as CSV, header included
pub fn write_report_csv<W: Write>(rows: &[ReconciledRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(REPORT_HEADER)?;

    for row in rows {
        wtr.write_record([
            row.campaign_id.to_string(),
            row.campaign_name.clone(),
            row.spend.to_string(),
            row.revenue.to_string(),
            row.profit_loss.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render report rows to a CSV string
pub fn report_to_csv(rows: &[ReconciledRow]) -> Result<String> {
    let mut buf = Vec::new();
    write_report_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidData(format!("Report is not UTF-8: {}", e)))
}

/// Hex SHA-256 of a rendered report
pub fn fingerprint(rendered: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rendered.as_bytes());
    hex::encode(hasher.finalize())
}

/// Report rows with totals, for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport<'a> {
    pub generated_at: DateTime<Utc>,
    /// Fingerprint of the CSV rendering of `rows`
    pub fingerprint: String,
    pub totals: &'a RunSummary,
    pub rows: &'a [ReconciledRow],
}

impl<'a> ReportExport<'a> {
    pub fn new(totals: &'a RunSummary, rows: &'a [ReconciledRow]) -> Result<Self> {
        Ok(Self {
            generated_at: Utc::now(),
            fingerprint: fingerprint(&report_to_csv(rows)?),
            totals,
            rows,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
