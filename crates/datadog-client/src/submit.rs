//! Series submission.
//!
//! `DatadogClient` issues a single `POST {base}/series?api_key=...` per
//! call.  The intake answers `202 Accepted`; any other status is a
//! failure.  There is no retry.

use std::time::Instant;

use async_trait::async_trait;
use chq_domain::config::ReporterConfig;
use chq_domain::error::{Error, Result};
use chq_domain::trace::TraceEvent;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::series::SeriesBatch;

/// Why a submission did not land.
#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    /// The request could not be built or sent (DNS, refused, TLS, ...).
    #[error("HTTP Request Error : {0}")]
    Request(String),

    /// The intake answered with something other than 202.
    #[error("Datadog API Error : {0}")]
    Status(u16),
}

/// Anything that accepts a [`SeriesBatch`].
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn submit(&self, batch: &SeriesBatch) -> std::result::Result<(), SubmitError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Clone)]
pub struct DatadogClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for DatadogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadogClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl DatadogClient {
    pub fn new(cfg: &ReporterConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.datadog_base_url.trim_end_matches('/').to_owned(),
            api_key: cfg.dd_api_key.clone(),
        })
    }

    pub fn series_url(&self) -> String {
        format!("{}/series", self.base_url)
    }
}

#[async_trait]
impl MetricSink for DatadogClient {
    async fn submit(&self, batch: &SeriesBatch) -> std::result::Result<(), SubmitError> {
        let body = serde_json::to_vec(batch).map_err(|e| SubmitError::Request(e.to_string()))?;

        tracing::debug!(series = batch.len(), bytes = body.len(), "submitting series");

        let start = Instant::now();
        let resp = self
            .http
            .post(self.series_url())
            .query(&[("api_key", &self.api_key)])
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SubmitError::Request(e.to_string()))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        let status = resp.status();
        drop(resp);

        if status != StatusCode::ACCEPTED {
            return Err(SubmitError::Status(status.as_u16()));
        }

        TraceEvent::SeriesSubmitted {
            series: batch.len(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();
        Ok(())
    }
}
