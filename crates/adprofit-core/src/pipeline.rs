//! End-to-end reconciliation run
//!
//! Wires the stages together under an explicit [`PipelineConfig`]:
//! revenue aggregation, spend normalization, duplicate handling, and the
//! left join. A run holds no state between calls.

use std::collections::HashMap;
use std::io::Read;

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::export;
use crate::models::{
    Amount, DuplicateSpendPolicy, InvalidCostPolicy, ReconciledRow, RevenueEvent, RowOutcome,
    SpendRecord,
};
use crate::reconcile::{reconcile, resolve_duplicates, sort_by_spend_desc};
use crate::revenue::{aggregate_revenue, read_revenue_csv};
use crate::spend::{included_rows, normalize_spend, read_spend_csv, DEFAULT_HEADER_SCAN_ROWS};

/// Settings that change pipeline behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Leading spend rows searched for the header
    pub header_scan_rows: usize,
    pub invalid_cost: InvalidCostPolicy,
    pub duplicate_spend: DuplicateSpendPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
            invalid_cost: InvalidCostPolicy::default(),
            duplicate_spend: DuplicateSpendPolicy::default(),
        }
    }
}

/// Counts and totals for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub spend_rows: usize,
    pub included: usize,
    pub excluded_no_id: usize,
    pub invalid_cost: usize,
    pub report_rows: usize,
    /// Distinct campaign ids in the report
    pub campaigns: usize,
    pub revenue_events: usize,
    pub revenue_campaigns: usize,
    /// Campaigns with revenue but no spend row; left out of the report
    pub unmatched_revenue_campaigns: usize,
    pub total_spend: Amount,
    /// Revenue of the reported campaigns, counted once per campaign id
    pub total_revenue: f64,
    pub total_profit_loss: Amount,
    /// Campaigns whose revenue exceeds their spend across all of their rows
    pub profitable_campaigns: usize,
}

/// Output of a run
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Report rows in spend input order
    pub rows: Vec<ReconciledRow>,
    /// Per spend row normalization outcome
    pub outcomes: Vec<RowOutcome>,
    pub summary: RunSummary,
}

impl Reconciliation {
    /// Report rows ordered by spend, largest first
    pub fn rows_by_spend(&self) -> Vec<ReconciledRow> {
        let mut rows = self.rows.clone();
        sort_by_spend_desc(&mut rows);
        rows
    }

    pub fn to_csv(&self) -> Result<String> {
        export::report_to_csv(&self.rows)
    }
}

/// Reconcile in-memory spend and revenue tables
pub fn run(
    spend: &[SpendRecord],
    revenue: &[RevenueEvent],
    config: &PipelineConfig,
) -> Result<Reconciliation> {
    let aggregated = aggregate_revenue(revenue);
    let outcomes = normalize_spend(spend);

    if config.invalid_cost == InvalidCostPolicy::Reject {
        let lines: Vec<u64> = outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::IncludedWithInvalidCost { .. }))
            .map(RowOutcome::line)
            .collect();
        if !lines.is_empty() {
            return Err(Error::InvalidCost { lines });
        }
    }

    let normalized = resolve_duplicates(included_rows(&outcomes), config.duplicate_spend)?;
    let rows = reconcile(&normalized, &aggregated);

    // Duplicate rows under the keep policy each carry the full campaign
    // revenue, so campaign totals are built per id rather than per row
    let mut spend_by_id: HashMap<i64, Amount> = HashMap::new();
    let mut campaign_ids: Vec<i64> = Vec::new();
    for row in &rows {
        let total = spend_by_id.entry(row.campaign_id).or_insert_with(|| {
            campaign_ids.push(row.campaign_id);
            Amount::ZERO
        });
        *total = *total + row.spend;
    }
    let unmatched_revenue_campaigns = aggregated
        .campaign_ids()
        .filter(|id| !spend_by_id.contains_key(id))
        .count();

    let total_spend = rows.iter().fold(Amount::ZERO, |acc, r| acc + r.spend);
    // Summed in report order so the totals are reproducible
    let total_revenue: f64 = campaign_ids
        .iter()
        .filter_map(|id| aggregated.get(*id))
        .sum();
    let profitable_campaigns = campaign_ids
        .iter()
        .filter(|id| {
            let revenue = Amount::from(aggregated.get(**id).unwrap_or(0.0));
            (revenue - spend_by_id[*id])
                .value()
                .is_some_and(|v| v > 0.0)
        })
        .count();

    let summary = RunSummary {
        spend_rows: spend.len(),
        included: outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Included { .. }))
            .count(),
        excluded_no_id: outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::ExcludedNoId { .. }))
            .count(),
        invalid_cost: outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::IncludedWithInvalidCost { .. }))
            .count(),
        report_rows: rows.len(),
        campaigns: campaign_ids.len(),
        revenue_events: revenue.len(),
        revenue_campaigns: aggregated.len(),
        unmatched_revenue_campaigns,
        total_spend,
        total_revenue,
        total_profit_loss: Amount::from(total_revenue) - total_spend,
        profitable_campaigns,
    };

    info!(
        spend_rows = summary.spend_rows,
        report_rows = summary.report_rows,
        excluded_no_id = summary.excluded_no_id,
        invalid_cost = summary.invalid_cost,
        "Reconciliation complete"
    );

    Ok(Reconciliation {
        rows,
        outcomes,
        summary,
    })
}

/// Read both feeds from CSV and reconcile them
pub fn run_csv<S: Read, R: Read>(
    spend_csv: S,
    revenue_csv: R,
    config: &PipelineConfig,
) -> Result<Reconciliation> {
    let revenue = read_revenue_csv(revenue_csv)?;
    let spend = read_spend_csv(spend_csv, config.header_scan_rows)?;
    run(&spend, &revenue, config)
}
