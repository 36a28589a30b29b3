//! adprofit CLI - Campaign profit/loss reconciliation
//!
//! Usage:
//!   adprofit reconcile --spend SPEND.csv --revenue REVENUE.csv   Write the P&L report
//!   adprofit check --spend SPEND.csv --revenue-url URL           Show per-row outcomes
//!   adprofit extract "Holiday Promo (48213)"                     Extract campaign ids
//!   adprofit config                                              Show effective config

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use std::path::Path;

use adprofit_core::{AppConfig, ExportFormat};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Reconcile {
            input,
            output,
            format,
            no_sort,
            stdout,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let target = if stdout {
                commands::ReportTarget::Stdout
            } else {
                commands::ReportTarget::File(
                    output.unwrap_or_else(|| commands::default_output_path(format)),
                )
            };
            let sort = config.sort_by_spend && !no_sort;
            commands::cmd_reconcile(&config, &input, format, sort, &target).await
        }
        Commands::Check { input, all } => {
            let config = load_config(cli.config.as_deref())?;
            commands::cmd_check(&config, &input, all).await
        }
        Commands::Extract { labels } => commands::cmd_extract(&labels),
        Commands::Config { path } => {
            if path {
                commands::cmd_config_path()
            } else {
                let config = load_config(cli.config.as_deref())?;
                commands::cmd_config_show(&config, cli.config.as_deref())
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(path).context("Failed to load configuration")
}
