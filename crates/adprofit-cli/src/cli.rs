//! CLI argument definitions using clap
//!
//! This module contains the clap structs for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// adprofit - Campaign profit/loss from ad spend and attributed revenue
#[derive(Parser)]
#[command(name = "adprofit")]
#[command(about = "Reconcile ad platform spend with attributed revenue", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the user config dir, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Spend and revenue inputs shared by `reconcile` and `check`
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Spend export from the ad platform (CSV)
    #[arg(short, long)]
    pub spend: PathBuf,

    /// Revenue feed CSV file
    #[arg(short, long, conflicts_with = "revenue_url")]
    pub revenue: Option<PathBuf>,

    /// Published revenue sheet URL (CSV export)
    #[arg(long)]
    pub revenue_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the per-campaign profit/loss report
    Reconcile {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (default: campaign_pnl_<date>.csv or .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// Keep spend input order instead of sorting by spend
        #[arg(long)]
        no_sort: bool,

        /// Write the report to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Show how each spend row would be treated, without writing a report
    Check {
        #[command(flatten)]
        input: InputArgs,

        /// Show every row, not just excluded and invalid ones
        #[arg(long)]
        all: bool,
    },

    /// Print the campaign id found in each label
    Extract {
        /// Campaign labels
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Show the effective configuration
    Config {
        /// Print only the override file location
        #[arg(long)]
        path: bool,
    },
}
