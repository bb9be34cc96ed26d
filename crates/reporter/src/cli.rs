use clap::Parser;

/// Report Cloudflare custom-hostname usage against its quota to Datadog.
///
/// Configuration comes from the environment: CF_API_KEY, CF_LOGIN,
/// CF_ZONE, CF_CH_QUOTA and DD_API_KEY are required; CF_API_URL and
/// DD_API_URL override the API endpoints.
#[derive(Debug, Parser)]
#[command(name = "cf-hostname-quota", version, about)]
pub struct Cli {
    /// Query Cloudflare and print the series payload instead of
    /// submitting it.
    #[arg(long)]
    pub dry_run: bool,
}
