//! Spend export reading and normalization
//!
//! Spend reports exported from an ad platform usually open with a title and
//! a date range before the real header row, and close with total rows. The
//! reader locates the header by content; the normalizer drops rows without a
//! campaign id (which covers the totals) and flags unreadable costs.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::extract::extract_campaign_id;
use crate::models::{Amount, NormalizedSpend, RowOutcome, SpendRecord};
use crate::table::{self, find_column, is_blank, line_of, parse_amount};

/// Column holding the campaign label
pub const CAMPAIGN_COLUMN: &str = "Campaign";
/// Column holding the cost
pub const COST_COLUMN: &str = "Cost";

/// Default number of leading rows searched for the header
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 20;

/// Read a spend export CSV
///
/// The first row (within `header_scan_rows`) containing both a `Campaign`
/// and a `Cost` cell is taken as the header; anything above it is skipped.
pub fn read_spend_csv<R: Read>(reader: R, header_scan_rows: usize) -> Result<Vec<SpendRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = rdr.records();
    let mut scanned: Vec<StringRecord> = Vec::new();
    let mut columns = None;

    while scanned.len() < header_scan_rows {
        let Some(result) = records.next() else {
            break;
        };
        let record = result?;

        if let (Some(label_col), Some(cost_col)) = (
            find_column(&record, CAMPAIGN_COLUMN),
            find_column(&record, COST_COLUMN),
        ) {
            debug!(
                "Found spend header on line {} after {} leading row(s)",
                line_of(&record),
                scanned.len()
            );
            columns = Some((label_col, cost_col));
            break;
        }
        scanned.push(record);
    }

    let Some((label_col, cost_col)) = columns else {
        return Err(schema_error(&scanned));
    };

    let mut spend = Vec::new();

    for result in records {
        let record = result?;
        if is_blank(&record) {
            continue;
        }

        spend.push(SpendRecord {
            campaign_label: record.get(label_col).unwrap_or("").to_string(),
            cost: record.get(cost_col).unwrap_or("").to_string(),
            line: line_of(&record),
        });
    }

    debug!("Parsed {} spend rows", spend.len());
    Ok(spend)
}

fn schema_error(scanned: &[StringRecord]) -> Error {
    let has = |name: &str| scanned.iter().any(|r| find_column(r, name).is_some());

    // Both names may appear, just never on the same row
    let mut missing: Vec<String> = [CAMPAIGN_COLUMN, COST_COLUMN]
        .into_iter()
        .filter(|name| !has(name))
        .map(String::from)
        .collect();
    if missing.is_empty() {
        missing = vec![CAMPAIGN_COLUMN.to_string(), COST_COLUMN.to_string()];
    }

    Error::Schema {
        feed: "spend",
        missing,
        preview: scanned
            .iter()
            .take(table::PREVIEW_ROWS)
            .map(table::to_cells)
            .collect(),
    }
}

/// Coerce a raw cost cell into an amount
///
/// Anything unreadable becomes `Amount::NotANumber` rather than an error.
pub fn coerce_cost(raw: &str) -> Amount {
    parse_amount(raw)
        .map(Amount::Value)
        .unwrap_or(Amount::NotANumber)
}

/// Normalize spend rows, one outcome per input row
pub fn normalize_spend(records: &[SpendRecord]) -> Vec<RowOutcome> {
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let Some(campaign_id) = extract_campaign_id(&record.campaign_label) else {
            debug!(
                line = record.line,
                label = %record.campaign_label,
                "Dropping spend row without campaign id"
            );
            outcomes.push(RowOutcome::ExcludedNoId {
                line: record.line,
                label: record.campaign_label.clone(),
            });
            continue;
        };

        let spend = coerce_cost(&record.cost);
        let row = NormalizedSpend {
            campaign_id,
            campaign_name: record.campaign_label.clone(),
            spend,
        };

        if spend.is_nan() {
            warn!(
                line = record.line,
                campaign_id,
                cost = %record.cost,
                "Spend row has a non-numeric cost"
            );
            outcomes.push(RowOutcome::IncludedWithInvalidCost {
                line: record.line,
                row,
                raw_cost: record.cost.clone(),
            });
        } else {
            outcomes.push(RowOutcome::Included {
                line: record.line,
                row,
            });
        }
    }

    outcomes
}

/// The rows that survive normalization, in input order
pub fn included_rows(outcomes: &[RowOutcome]) -> Vec<NormalizedSpend> {
    outcomes
        .iter()
        .filter_map(|outcome| outcome.row().cloned())
        .collect()
}
