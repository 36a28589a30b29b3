//! Revenue feed reading and per-campaign aggregation

use std::collections::HashMap;
use std::io::Read;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::RevenueEvent;
use crate::table::{self, find_column, is_blank, line_of, parse_amount};

/// Column holding the campaign id
pub const CAMPAIGN_ID_COLUMN: &str = "campid";
/// Column holding the attributed revenue
pub const REVENUE_COLUMN: &str = "estimated_revenue";

/// Summed revenue per campaign id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedRevenue {
    totals: HashMap<i64, f64>,
    event_counts: HashMap<i64, usize>,
}

impl AggregatedRevenue {
    /// Total revenue for a campaign, if any events carried its id
    pub fn get(&self, campaign_id: i64) -> Option<f64> {
        self.totals.get(&campaign_id).copied()
    }

    /// Number of events folded into a campaign's total
    pub fn event_count(&self, campaign_id: i64) -> usize {
        self.event_counts.get(&campaign_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, campaign_id: i64) -> bool {
        self.totals.contains_key(&campaign_id)
    }

    /// Number of distinct campaign ids
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn campaign_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.totals.keys().copied()
    }

    /// Sum of all campaign totals
    pub fn grand_total(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Group revenue events by campaign id and sum their revenue
///
/// Negative revenue (refunds, corrections) is summed as-is.
pub fn aggregate_revenue(events: &[RevenueEvent]) -> AggregatedRevenue {
    let mut aggregated = AggregatedRevenue::default();

    for event in events {
        *aggregated.totals.entry(event.campaign_id).or_insert(0.0) += event.estimated_revenue;
        *aggregated.event_counts.entry(event.campaign_id).or_insert(0) += 1;
    }

    debug!(
        "Aggregated {} revenue events into {} campaigns",
        events.len(),
        aggregated.len()
    );
    aggregated
}

/// Read the revenue feed CSV
///
/// The header must contain `campid` and `estimated_revenue`; other columns
/// are ignored. Any row whose id is not an integer or whose revenue is not a
/// number fails the whole read, since the id is the join key.
pub fn read_revenue_csv<R: Read>(reader: R) -> Result<Vec<RevenueEvent>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let id_col = find_column(&headers, CAMPAIGN_ID_COLUMN);
    let revenue_col = find_column(&headers, REVENUE_COLUMN);

    let (id_col, revenue_col) = match (id_col, revenue_col) {
        (Some(id), Some(rev)) => (id, rev),
        _ => {
            let mut missing = Vec::new();
            if id_col.is_none() {
                missing.push(CAMPAIGN_ID_COLUMN.to_string());
            }
            if revenue_col.is_none() {
                missing.push(REVENUE_COLUMN.to_string());
            }
            let mut preview = vec![table::to_cells(&headers)];
            for record in rdr.records().take(table::PREVIEW_ROWS - 1) {
                preview.push(table::to_cells(&record?));
            }
            return Err(Error::Schema {
                feed: "revenue",
                missing,
                preview,
            });
        }
    };

    let mut events = Vec::new();

    for result in rdr.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }
        let line = line_of(&record);

        let id_str = record.get(id_col).unwrap_or("");
        let campaign_id = parse_campaign_id(id_str).ok_or_else(|| {
            Error::InvalidData(format!(
                "Revenue line {}: campaign id {:?} is not an integer",
                line, id_str
            ))
        })?;

        let revenue_str = record.get(revenue_col).unwrap_or("");
        let estimated_revenue = parse_amount(revenue_str).ok_or_else(|| {
            Error::InvalidData(format!(
                "Revenue line {}: estimated revenue {:?} is not a number",
                line, revenue_str
            ))
        })?;

        events.push(RevenueEvent {
            campaign_id,
            estimated_revenue,
        });
    }

    debug!("Parsed {} revenue events", events.len());
    Ok(events)
}

/// Parse an integer id, accepting whole floats such as `"100.0"`
///
/// Spreadsheet exports often widen integer columns to floats.
fn parse_campaign_id(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(id) = s.parse::<i64>() {
        return Some(id);
    }

    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
