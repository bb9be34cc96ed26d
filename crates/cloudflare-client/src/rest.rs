//! REST implementation of [`CustomHostnameSource`].
//!
//! `RestCloudflareClient` wraps a `reqwest::Client` and authenticates every
//! call with the legacy global-key headers (`X-Auth-Key` / `X-Auth-Email`).
//! There is no retry: the reporter runs on a schedule and the next run is
//! the retry.

use std::time::Instant;

use async_trait::async_trait;
use chq_domain::config::ReporterConfig;
use chq_domain::error::{Error, Result};
use chq_domain::trace::TraceEvent;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::provider::CustomHostnameSource;
use crate::types::{ApiEnvelope, CustomHostname, Zone};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the Cloudflare v4 API.
#[derive(Clone)]
pub struct RestCloudflareClient {
    http: Client,
    base_url: String,
    api_key: String,
    login: String,
}

impl std::fmt::Debug for RestCloudflareClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCloudflareClient")
            .field("base_url", &self.base_url)
            .field("login", &self.login)
            .finish_non_exhaustive()
    }
}

impl RestCloudflareClient {
    /// Build a new client from the reporter config.
    pub fn new(cfg: &ReporterConfig) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.cloudflare_base_url.trim_end_matches('/').to_owned(),
            api_key: cfg.cf_api_key.clone(),
            login: cfg.cf_login.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── request helpers ──────────────────────────────────────────────

    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("X-Auth-Key", &self.api_key)
            .header("X-Auth-Email", &self.login)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and unwrap the v4 envelope.
    ///
    /// * 401 / 403 become `Error::Auth`.
    /// * Any other non-2xx, or a `success: false` body, becomes
    ///   `Error::Cloudflare` carrying the envelope's error messages.
    /// * Emits a `TraceEvent::CloudflareCall` for every attempt.
    async fn get_envelope<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        rb: RequestBuilder,
    ) -> Result<ApiEnvelope<T>> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                TraceEvent::CloudflareCall {
                    endpoint: endpoint.to_owned(),
                    status: e.status().map(|s| s.as_u16()).unwrap_or(0),
                    duration_ms,
                }
                .emit();
                return Err(from_reqwest(e));
            }
        };

        let status = resp.status();
        TraceEvent::CloudflareCall {
            endpoint: endpoint.to_owned(),
            status: status.as_u16(),
            duration_ms,
        }
        .emit();

        let body = resp.text().await.map_err(from_reqwest)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Auth(format!(
                "{endpoint} auth failed ({}): {}",
                status.as_u16(),
                summarize_body::<T>(&body)
            )));
        }
        if !status.is_success() {
            return Err(Error::Cloudflare(format!(
                "{endpoint} returned {}: {}",
                status.as_u16(),
                summarize_body::<T>(&body)
            )));
        }

        let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            Error::Cloudflare(format!("failed to parse {endpoint} response: {e}: {body}"))
        })?;
        if !envelope.success {
            return Err(Error::Cloudflare(format!(
                "{endpoint} failed: {}",
                envelope.error_summary()
            )));
        }
        Ok(envelope)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl CustomHostnameSource for RestCloudflareClient {
    async fn zone_id_by_name(&self, zone: &str) -> Result<String> {
        let url = self.url("/zones");
        let envelope: ApiEnvelope<Vec<Zone>> = self
            .get_envelope("GET /zones", self.http.get(&url).query(&[("name", zone)]))
            .await?;

        let mut zones = envelope.result.unwrap_or_default();
        match zones.len() {
            0 => Err(Error::Cloudflare(format!("zone could not be found: {zone}"))),
            1 => {
                let id = zones.remove(0).id;
                tracing::debug!(zone, zone_id = %id, "zone resolved");
                Ok(id)
            }
            n => Err(Error::Cloudflare(format!(
                "ambiguous zone name {zone}: {n} zones matched"
            ))),
        }
    }

    async fn custom_hostname_total(&self, zone_id: &str) -> Result<u64> {
        let url = self.url(&format!("/zones/{zone_id}/custom_hostnames"));
        let envelope: ApiEnvelope<Vec<CustomHostname>> = self
            .get_envelope(
                "GET /zones/{id}/custom_hostnames",
                self.http
                    .get(&url)
                    .query(&[("page", 1u32), ("per_page", 1u32)]),
            )
            .await?;

        envelope
            .result_info
            .map(|info| info.total_count)
            .ok_or_else(|| {
                Error::Cloudflare("custom hostname listing had no result_info".into())
            })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Prefer the envelope's error list; fall back to the raw body.
fn summarize_body<T: DeserializeOwned>(body: &str) -> String {
    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(env) => env.error_summary(),
        Err(_) => body.to_owned(),
    }
}

/// Convert a `reqwest::Error` into a domain `Error`.
///
/// Timeout errors become `Error::Timeout`; everything else becomes
/// `Error::Http`.
pub fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}
