//! Extract command implementation

use adprofit_core::extract_campaign_id;
use anyhow::Result;

/// `<id>\t<label>`, with `-` when the label carries no id
pub fn format_extraction(label: &str) -> String {
    match extract_campaign_id(label) {
        Some(id) => format!("{}\t{}", id, label),
        None => format!("-\t{}", label),
    }
}

pub fn cmd_extract(labels: &[String]) -> Result<()> {
    for label in labels {
        println!("{}", format_extraction(label));
    }
    Ok(())
}
