//! Check command implementation
//!
//! Reports what a run would do with each spend row. Invalid costs and
//! duplicate campaign ids are listed even when the configured policy would
//! reject them.

use adprofit_core::{
    aggregate_revenue,
    reconcile::duplicate_campaign_ids,
    spend::{included_rows, normalize_spend},
    AppConfig, DuplicateSpendPolicy, InvalidCostPolicy, RowOutcome,
};
use anyhow::Result;

use super::{load_inputs, truncate};
use crate::cli::InputArgs;

/// One display line for a spend row outcome
pub fn describe_outcome(outcome: &RowOutcome) -> String {
    match outcome {
        RowOutcome::Included { line, row } => format!(
            "   line {:>5}  ✓ {:<10} {}",
            line,
            row.campaign_id,
            truncate(&row.campaign_name, 50)
        ),
        RowOutcome::ExcludedNoId { line, label } => format!(
            "   line {:>5}  ✗ {:<10} {}",
            line,
            "no id",
            truncate(label, 50)
        ),
        RowOutcome::IncludedWithInvalidCost {
            line,
            row,
            raw_cost,
        } => format!(
            "   line {:>5}  ⚠ {:<10} {} (cost {:?})",
            line,
            row.campaign_id,
            truncate(&row.campaign_name, 50),
            raw_cost
        ),
    }
}

pub async fn cmd_check(config: &AppConfig, input: &InputArgs, all: bool) -> Result<()> {
    let (spend, revenue) = load_inputs(input, config).await?;
    let outcomes = normalize_spend(&spend);
    let aggregated = aggregate_revenue(&revenue);

    let mut included = 0;
    let mut excluded = 0;
    let mut invalid = 0;

    println!("🔎 Spend rows: {}", input.spend.display());
    for outcome in &outcomes {
        match outcome {
            RowOutcome::Included { .. } => included += 1,
            RowOutcome::ExcludedNoId { .. } => excluded += 1,
            RowOutcome::IncludedWithInvalidCost { .. } => invalid += 1,
        }
        if all || !matches!(outcome, RowOutcome::Included { .. }) {
            println!("{}", describe_outcome(outcome));
        }
    }

    println!();
    println!("   Included:          {}", included);
    println!("   Excluded (no id):  {}", excluded);
    println!("   Invalid cost:      {}", invalid);

    let rows = included_rows(&outcomes);
    let duplicates = duplicate_campaign_ids(&rows);
    if !duplicates.is_empty() {
        let ids: Vec<String> = duplicates.iter().map(|id| id.to_string()).collect();
        println!("   Duplicate ids:     {}", ids.join(", "));
    }

    let without_revenue = rows
        .iter()
        .filter(|r| !aggregated.contains(r.campaign_id))
        .count();
    println!("   No revenue:        {}", without_revenue);
    println!(
        "   Revenue events:    {} across {} campaigns",
        revenue.len(),
        aggregated.len()
    );

    if invalid > 0 && config.pipeline.invalid_cost == InvalidCostPolicy::Reject {
        println!();
        println!("⚠️  reconcile will fail: invalid costs are rejected by config");
    }
    if !duplicates.is_empty() && config.pipeline.duplicate_spend == DuplicateSpendPolicy::Reject {
        println!();
        println!("⚠️  reconcile will fail: duplicate campaign ids are rejected by config");
    }

    Ok(())
}
