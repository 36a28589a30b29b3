//! Config command implementation

use std::path::Path;

use adprofit_core::{config::default_config_path, AppConfig};
use anyhow::Result;

/// Describe where the effective config came from
pub fn config_origin(explicit: Option<&Path>) -> String {
    if let Some(path) = explicit {
        return path.display().to_string();
    }
    match default_config_path() {
        Some(path) if path.exists() => path.display().to_string(),
        _ => "built-in defaults".to_string(),
    }
}

pub fn cmd_config_path() -> Result<()> {
    let path = default_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine the user config directory"))?;
    println!("{}", path.display());
    Ok(())
}

pub fn cmd_config_show(config: &AppConfig, explicit: Option<&Path>) -> Result<()> {
    println!("⚙️  Configuration ({})", config_origin(explicit));
    println!("   spend.header_scan_rows      = {}", config.pipeline.header_scan_rows);
    println!("   spend.invalid_cost          = {}", config.pipeline.invalid_cost);
    println!("   reconcile.duplicate_spend   = {}", config.pipeline.duplicate_spend);
    match &config.revenue {
        Some(source) => println!("   revenue                     = {}", source),
        None => println!("   revenue                     = (not set)"),
    }
    println!("   output.sort_by_spend        = {}", config.sort_by_spend);
    Ok(())
}
