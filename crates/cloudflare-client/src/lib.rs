//! `chq-cloudflare`: Cloudflare client crate for the custom-hostname
//! quota reporter.
//!
//! Provides the [`CustomHostnameSource`] trait, a REST implementation
//! ([`RestCloudflareClient`]) and the v4 envelope DTOs.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use chq_cloudflare::{CustomHostnameSource, RestCloudflareClient};
//! use chq_domain::config::ReporterConfig;
//!
//! # async fn example() -> chq_domain::error::Result<()> {
//! let cfg = ReporterConfig::from_env()?;
//! let client = RestCloudflareClient::new(&cfg)?;
//!
//! let usage = client.hostname_usage(&cfg.zone).await?;
//! println!("{} uses {} custom hostnames", usage.zone, usage.total);
//! # Ok(())
//! # }
//! ```

pub mod provider;
pub mod rest;
pub mod types;

pub use provider::CustomHostnameSource;
pub use rest::{from_reqwest, RestCloudflareClient};
pub use types::{ApiEnvelope, ApiMessage, CustomHostname, HostnameUsage, ResultInfo, Zone};
