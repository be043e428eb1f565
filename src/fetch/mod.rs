//! Raw-table providers: the pipeline's input boundary.
//!
//! The pipeline only sees [`TableSource`]; HTTP, HTML, retries, and
//! whatever else a provider does stay on this side of the seam.

pub mod html;
pub mod urls;

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{info, instrument};

use crate::error::{PipelineError, Result};
use crate::persist::SinkKey;
use crate::table::RawTable;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Supplies one raw table per sink key. Implementations must be shareable
/// across concurrently running positions.
pub trait TableSource: Send + Sync {
    fn fetch(&self, key: &SinkKey) -> Result<RawTable>;
}

/// Fetches stats pages over HTTP and extracts their first table.
///
/// Blocking client by design: the orchestrator runs each position on the
/// blocking pool, so the whole run stays a straight-line sequence.
pub struct HttpTableSource {
    client: Client,
}

impl HttpTableSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::fetch(format!("building HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl TableSource for HttpTableSource {
    #[instrument(level = "info", skip(self), fields(key = %key))]
    fn fetch(&self, key: &SinkKey) -> Result<RawTable> {
        let url = urls::stats_url(key)?;
        info!(url = %url, "fetching stats page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| PipelineError::fetch(format!("{url}: {e}")))?;
        if !response.status().is_success() {
            return Err(PipelineError::fetch(format!(
                "{url}: HTTP {}",
                response.status()
            )));
        }
        let body = response
            .text()
            .map_err(|e| PipelineError::fetch(format!("{url}: reading body: {e}")))?;

        html::first_table(&body)
    }
}
