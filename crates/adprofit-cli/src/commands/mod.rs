//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `reconcile` - Build and write the profit/loss report
//! - `check` - Per-row outcome listing without output
//! - `extract` - Campaign id extraction from labels
//! - `config` - Effective configuration display
//!
//! Input loading shared by `reconcile` and `check` lives here.

pub mod check;
pub mod config;
pub mod extract;
pub mod reconcile;

// Re-export command functions for main.rs
pub use check::*;
pub use config::*;
pub use extract::*;
pub use reconcile::*;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use adprofit_core::{
    revenue::read_revenue_csv, spend::read_spend_csv, AppConfig, Error, RevenueEvent,
    RevenueSource, SpendRecord,
};
use anyhow::{Context, Result};

use crate::cli::InputArgs;

/// Pick the revenue feed: command line first, then config
pub fn revenue_source(input: &InputArgs, config: &AppConfig) -> Result<RevenueSource> {
    if let Some(path) = &input.revenue {
        return Ok(RevenueSource::File(path.clone()));
    }
    if let Some(url) = &input.revenue_url {
        return Ok(RevenueSource::Url(url.clone()));
    }
    config.revenue.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "No revenue feed given.\n\
             Pass --revenue FILE or --revenue-url URL, or set [revenue] in the config file"
        )
    })
}

/// Read the spend export from disk
pub fn load_spend(path: &Path, config: &AppConfig) -> Result<Vec<SpendRecord>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    read_spend_csv(BufReader::new(file), config.pipeline.header_scan_rows)
        .map_err(|e| feed_error(e, &format!("spend export {}", path.display())))
}

/// Load and parse the revenue feed
pub async fn load_revenue(source: &RevenueSource) -> Result<Vec<RevenueEvent>> {
    let body = source
        .load()
        .await
        .with_context(|| format!("Failed to load revenue feed: {}", source))?;
    read_revenue_csv(body.as_slice()).map_err(|e| feed_error(e, &format!("revenue feed {}", source)))
}

/// Read both inputs named by the command line
pub async fn load_inputs(
    input: &InputArgs,
    config: &AppConfig,
) -> Result<(Vec<SpendRecord>, Vec<RevenueEvent>)> {
    let source = revenue_source(input, config)?;
    let spend = load_spend(&input.spend, config)?;
    let revenue = load_revenue(&source).await?;
    Ok((spend, revenue))
}

/// Attach the source name, and for schema errors the rows that were scanned
fn feed_error(err: Error, what: &str) -> anyhow::Error {
    let preview = match &err {
        Error::Schema { preview, .. } if !preview.is_empty() => {
            let rows: Vec<String> = preview
                .iter()
                .map(|row| format!("   | {}", truncate(&row.join(", "), 100)))
                .collect();
            Some(rows.join("\n"))
        }
        _ => None,
    };

    let err = anyhow::Error::new(err).context(format!("Failed to read {}", what));
    match preview {
        Some(rows) => err.context(format!("First rows of the file:\n{}", rows)),
        None => err,
    }
}

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
