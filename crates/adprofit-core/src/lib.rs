//! adprofit Core Library
//!
//! Campaign-level profit/loss from an ad platform spend export and a
//! revenue attribution feed:
//! - Campaign id extraction from free-text campaign labels
//! - Revenue aggregation per campaign id
//! - Spend export reading and normalization with per-row outcomes
//! - Left join of spend against revenue with profit/loss
//! - Report export (CSV, JSON summary, fingerprint)
//! - Revenue sources (local file or published sheet URL)
//! - TOML configuration

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod reconcile;
pub mod revenue;
pub mod source;
pub mod spend;
mod table;

/// Test utilities including a mock published sheet server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use export::{ExportFormat, REPORT_HEADER};
pub use extract::extract_campaign_id;
pub use models::{
    Amount, DuplicateSpendPolicy, InvalidCostPolicy, NormalizedSpend, ReconciledRow,
    RevenueEvent, RowOutcome, SpendRecord,
};
pub use pipeline::{PipelineConfig, Reconciliation, RunSummary};
pub use revenue::{aggregate_revenue, AggregatedRevenue};
pub use source::RevenueSource;
