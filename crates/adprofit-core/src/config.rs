//! Configuration loading
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override file in the user config dir
//!    (~/.config/adprofit/config.toml on Linux) if it exists
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{DuplicateSpendPolicy, InvalidCostPolicy};
use crate::pipeline::PipelineConfig;
use crate::source::RevenueSource;

/// Embedded default config (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Fully resolved application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    /// Revenue feed used when none is given on the command line
    pub revenue: Option<RevenueSource>,
    pub sort_by_spend: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            revenue: None,
            sort_by_spend: true,
        }
    }
}

impl AppConfig {
    /// Load from `path`, else the user override, else the embedded default
    ///
    /// A relative `[revenue] path` is taken relative to the file that sets it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let Some(file) = file else {
            return parse_config(DEFAULT_CONFIG);
        };

        if path.is_none() {
            debug!("Using config override at {}", file.display());
        }
        let content = fs::read_to_string(&file)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", file.display(), e)))?;

        let mut config = parse_config(&content)?;
        if let (Some(RevenueSource::File(revenue)), Some(dir)) =
            (&mut config.revenue, file.parent())
        {
            if revenue.is_relative() {
                *revenue = dir.join(&*revenue);
            }
        }
        Ok(config)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("adprofit").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    spend: Option<RawSpend>,
    reconcile: Option<RawReconcile>,
    revenue: Option<RawRevenue>,
    output: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpend {
    header_scan_rows: Option<usize>,
    invalid_cost: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReconcile {
    duplicate_spend: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRevenue {
    path: Option<PathBuf>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOutput {
    sort_by_spend: Option<bool>,
}

/// Parse config from TOML content
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AppConfig::default();

    if let Some(spend) = raw.spend {
        if let Some(rows) = spend.header_scan_rows {
            if rows == 0 {
                return Err(Error::Config(
                    "spend.header_scan_rows must be at least 1".into(),
                ));
            }
            config.pipeline.header_scan_rows = rows;
        }
        if let Some(policy) = spend.invalid_cost {
            config.pipeline.invalid_cost = policy
                .parse::<InvalidCostPolicy>()
                .map_err(Error::Config)?;
        }
    }

    if let Some(reconcile) = raw.reconcile {
        if let Some(policy) = reconcile.duplicate_spend {
            config.pipeline.duplicate_spend = policy
                .parse::<DuplicateSpendPolicy>()
                .map_err(Error::Config)?;
        }
    }

    if let Some(revenue) = raw.revenue {
        config.revenue = match (revenue.path, revenue.url) {
            (Some(_), Some(_)) => {
                return Err(Error::Config(
                    "revenue.path and revenue.url are mutually exclusive".into(),
                ))
            }
            (Some(path), None) => Some(RevenueSource::File(path)),
            (None, Some(url)) => Some(RevenueSource::Url(url)),
            (None, None) => None,
        };
    }

    if let Some(output) = raw.output {
        if let Some(sort) = output.sort_by_spend {
            config.sort_by_spend = sort;
        }
    }

    Ok(config)
}
