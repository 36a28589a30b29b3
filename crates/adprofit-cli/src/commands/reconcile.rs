//! Report command implementation

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use adprofit_core::{
    export::{report_to_csv, ReportExport},
    pipeline::{self, Reconciliation},
    AppConfig, ExportFormat, RunSummary,
};
use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use super::load_inputs;
use crate::cli::InputArgs;

/// Where the rendered report goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    Stdout,
    File(PathBuf),
}

/// `campaign_pnl_<today>.csv` (or `.json`) in the working directory
pub fn default_output_path(format: ExportFormat) -> PathBuf {
    let ext = match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Json => "json",
    };
    PathBuf::from(format!(
        "campaign_pnl_{}.{}",
        Local::now().format("%Y-%m-%d"),
        ext
    ))
}

/// Render the report in the requested format
pub fn render_report(result: &Reconciliation, format: ExportFormat, sort: bool) -> Result<String> {
    let rows = if sort {
        result.rows_by_spend()
    } else {
        result.rows.clone()
    };

    let rendered = match format {
        ExportFormat::Csv => report_to_csv(&rows)?,
        ExportFormat::Json => ReportExport::new(&result.summary, &rows)?.to_json()?,
    };
    Ok(rendered)
}

pub async fn cmd_reconcile(
    config: &AppConfig,
    input: &InputArgs,
    format: ExportFormat,
    sort: bool,
    target: &ReportTarget,
) -> Result<()> {
    let (spend, revenue) = load_inputs(input, config).await?;
    let result = pipeline::run(&spend, &revenue, &config.pipeline)
        .context("Failed to reconcile spend with revenue")?;

    let rendered = render_report(&result, format, sort)?;

    match target {
        ReportTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("Failed to write report to stdout")?;
            info!(rows = result.summary.report_rows, "Report written to stdout");
        }
        ReportTarget::File(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            print_summary(&result.summary);
            println!();
            println!("✅ Report written to {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("📊 Campaign Profit/Loss");
    println!("   ─────────────────────────────────────────");
    println!("   Spend rows:              {:>8}", summary.spend_rows);
    println!("   Campaigns in report:     {:>8}", summary.report_rows);
    if summary.excluded_no_id > 0 {
        println!("   Excluded (no id):        {:>8}", summary.excluded_no_id);
    }
    if summary.invalid_cost > 0 {
        println!("   ⚠️  Invalid cost:          {:>8}", summary.invalid_cost);
    }
    println!("   Revenue events:          {:>8}", summary.revenue_events);
    if summary.unmatched_revenue_campaigns > 0 {
        println!(
            "   Revenue without spend:   {:>8}",
            summary.unmatched_revenue_campaigns
        );
    }
    println!("   ─────────────────────────────────────────");
    println!("   Total spend:      {:>15}", money(summary.total_spend.value()));
    println!("   Total revenue:    {:>15}", money(Some(summary.total_revenue)));
    println!(
        "   Profit/Loss:      {:>15}",
        money(summary.total_profit_loss.value())
    );
    println!(
        "   Profitable:       {:>15}",
        format!("{} of {}", summary.profitable_campaigns, summary.campaigns)
    );
}

fn money(value: Option<f64>) -> String {
    match value {
        Some(v) if v < 0.0 => format!("-${:.2}", -v),
        Some(v) => format!("${:.2}", v),
        None => "NaN".to_string(),
    }
}
