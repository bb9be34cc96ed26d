//! The reporting pipeline: fetch usage, build the batch, submit.
//!
//! Errors returned from [`run`] are fatal (zone resolution, listing).
//! A failed submission is not: it is carried in
//! [`RunReport::submission`] and the caller decides what to print.

use chq_cloudflare::{CustomHostnameSource, HostnameUsage};
use chq_datadog::{MetricSink, SeriesBatch, SubmitError};
use chq_domain::config::ReporterConfig;
use chq_domain::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build the batch but do not send it.
    pub dry_run: bool,
}

/// What happened to the batch.
#[derive(Debug)]
pub enum Submission {
    Accepted,
    Failed(SubmitError),
    Skipped,
}

#[derive(Debug)]
pub struct RunReport {
    pub usage: HostnameUsage,
    pub batch: SeriesBatch,
    pub submission: Submission,
}

/// Run one report.  `clock` yields the unix timestamp (seconds) stamped on
/// both gauges; it is read once, after the usage lookup returns.
pub async fn run(
    config: &ReporterConfig,
    source: &dyn CustomHostnameSource,
    sink: &dyn MetricSink,
    opts: RunOptions,
    clock: impl FnOnce() -> i64,
) -> Result<RunReport> {
    let usage = source.hostname_usage(&config.zone).await?;
    tracing::info!(
        zone = %usage.zone,
        zone_id = %usage.zone_id,
        total = usage.total,
        quota = config.quota,
        "custom hostname usage fetched"
    );

    let captured_at = clock();
    let batch = SeriesBatch::hostname_usage(&config.zone, usage.total, config.quota, captured_at);

    let submission = if opts.dry_run {
        Submission::Skipped
    } else {
        match sink.submit(&batch).await {
            Ok(()) => Submission::Accepted,
            Err(e) => {
                tracing::warn!(error = %e, "series submission failed");
                Submission::Failed(e)
            }
        }
    };

    Ok(RunReport {
        usage,
        batch,
        submission,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
