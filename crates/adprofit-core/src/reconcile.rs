//! Left join of normalized spend against aggregated revenue

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Amount, DuplicateSpendPolicy, NormalizedSpend, ReconciledRow};
use crate::revenue::AggregatedRevenue;

/// Join spend rows to revenue and compute profit/loss
///
/// Every spend row yields exactly one report row, in input order. Missing
/// revenue counts as zero. A `NotANumber` spend makes profit/loss
/// `NotANumber` as well. Revenue for campaigns without spend is ignored.
pub fn reconcile(spend: &[NormalizedSpend], revenue: &AggregatedRevenue) -> Vec<ReconciledRow> {
    let rows: Vec<ReconciledRow> = spend
        .iter()
        .map(|row| {
            let revenue = revenue.get(row.campaign_id).unwrap_or(0.0);
            ReconciledRow {
                campaign_id: row.campaign_id,
                campaign_name: row.campaign_name.clone(),
                spend: row.spend,
                revenue,
                profit_loss: Amount::from(revenue) - row.spend,
            }
        })
        .collect();

    let matched = rows
        .iter()
        .filter(|r| revenue.contains(r.campaign_id))
        .count();
    debug!(
        "Reconciled {} spend rows ({} with revenue, {} zero-filled)",
        rows.len(),
        matched,
        rows.len() - matched
    );

    rows
}

/// Campaign ids that appear on more than one spend row, in first-seen order
pub fn duplicate_campaign_ids(spend: &[NormalizedSpend]) -> Vec<i64> {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for row in spend {
        *counts.entry(row.campaign_id).or_insert(0) += 1;
    }

    let mut seen = HashSet::new();
    spend
        .iter()
        .map(|row| row.campaign_id)
        .filter(|id| counts[id] > 1 && seen.insert(*id))
        .collect()
}

/// Apply the duplicate spend policy before joining
pub fn resolve_duplicates(
    spend: Vec<NormalizedSpend>,
    policy: DuplicateSpendPolicy,
) -> Result<Vec<NormalizedSpend>> {
    match policy {
        DuplicateSpendPolicy::Keep => Ok(spend),
        DuplicateSpendPolicy::Reject => {
            let duplicates = duplicate_campaign_ids(&spend);
            if duplicates.is_empty() {
                Ok(spend)
            } else {
                Err(Error::DuplicateSpend {
                    campaign_ids: duplicates,
                })
            }
        }
        DuplicateSpendPolicy::Sum => {
            let mut merged: Vec<NormalizedSpend> = Vec::with_capacity(spend.len());
            let mut index: HashMap<i64, usize> = HashMap::new();

            for row in spend {
                match index.get(&row.campaign_id) {
                    Some(&i) => merged[i].spend = merged[i].spend + row.spend,
                    None => {
                        index.insert(row.campaign_id, merged.len());
                        merged.push(row);
                    }
                }
            }
            Ok(merged)
        }
    }
}

/// Order rows by spend, largest first, with `NotANumber` rows last
///
/// The sort is stable, so ties keep their input order.
pub fn sort_by_spend_desc(rows: &mut [ReconciledRow]) {
    rows.sort_by(|a, b| match (a.spend.value(), b.spend.value()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
