//! Error types for adprofit

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required column(s) in {feed} feed: {}", .missing.join(", "))]
    Schema {
        feed: &'static str,
        missing: Vec<String>,
        /// First rows of the raw input, for display by the caller
        preview: Vec<Vec<String>>,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid cost on line(s) {}", join_lines(.lines))]
    InvalidCost { lines: Vec<u64> },

    #[error("Duplicate spend rows for campaign id(s) {}", join_ids(.campaign_ids))]
    DuplicateSpend { campaign_ids: Vec<i64> },

    #[error("Configuration error: {0}")]
    Config(String),
}

fn join_lines(lines: &[u64]) -> String {
    lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_columns() {
        let err = Error::Schema {
            feed: "spend",
            missing: vec!["Campaign".into(), "Cost".into()],
            preview: vec![],
        };
        assert_eq!(
            err.to_string(),
            "Missing required column(s) in spend feed: Campaign, Cost"
        );
    }

    #[test]
    fn test_invalid_cost_lists_lines() {
        let err = Error::InvalidCost { lines: vec![3, 7] };
        assert_eq!(err.to_string(), "Invalid cost on line(s) 3, 7");
    }
}
