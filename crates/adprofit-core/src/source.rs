//! Revenue feed sources
//!
//! The revenue feed is either a local CSV file or a published spreadsheet
//! fetched over HTTP as CSV. A fetch is attempted once; any failure ends the
//! run so a report is never built from stale or partial revenue.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Timeout for downloading a published sheet
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where to read the revenue feed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevenueSource {
    File(PathBuf),
    Url(String),
}

impl RevenueSource {
    /// Read the raw CSV bytes
    pub async fn load(&self) -> Result<Vec<u8>> {
        match self {
            Self::File(path) => {
                debug!("Reading revenue feed from {}", path.display());
                Ok(tokio::fs::read(path).await?)
            }
            Self::Url(url) => fetch_csv(url).await,
        }
    }
}

impl fmt::Display for RevenueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Download a CSV document
pub async fn fetch_csv(url: &str) -> Result<Vec<u8>> {
    let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;

    info!("Fetching revenue feed from {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Fetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    debug!("Fetched {} bytes", body.len());
    Ok(body.to_vec())
}
