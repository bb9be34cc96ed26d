use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chq_cloudflare::RestCloudflareClient;
use chq_datadog::DatadogClient;
use chq_domain::config::ReporterConfig;
use chq_reporter::cli::Cli;
use chq_reporter::{run, RunOptions, Submission};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_tracing();

    let config = ReporterConfig::from_env().context("invalid configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let cloudflare = RestCloudflareClient::new(&config).context("building Cloudflare client")?;
    let datadog = DatadogClient::new(&config).context("building Datadog client")?;

    let report = run(
        &config,
        &cloudflare,
        &datadog,
        RunOptions {
            dry_run: cli.dry_run,
        },
        || Utc::now().timestamp(),
    )
    .await
    .with_context(|| format!("fetching custom hostname usage for {}", config.zone))?;

    match report.submission {
        Submission::Accepted => {
            tracing::info!(
                zone = %config.zone,
                usage = report.usage.total,
                quota = config.quota,
                "custom hostname usage reported"
            );
        }
        // Submission failures are reported but do not fail the run.
        Submission::Failed(e) => println!("{e}"),
        Submission::Skipped => {
            println!("{}", serde_json::to_string(&report.batch)?);
        }
    }
    Ok(())
}

/// Initialize compact stderr-only tracing.
///
/// Defaults to `warn` level so diagnostic output does not pollute stdout.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
