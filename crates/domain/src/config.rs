use std::fmt;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Environment variable names
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const ENV_CF_API_KEY: &str = "CF_API_KEY";
pub const ENV_CF_LOGIN: &str = "CF_LOGIN";
pub const ENV_CF_ZONE: &str = "CF_ZONE";
pub const ENV_CF_CH_QUOTA: &str = "CF_CH_QUOTA";
pub const ENV_DD_API_KEY: &str = "DD_API_KEY";
pub const ENV_CF_API_URL: &str = "CF_API_URL";
pub const ENV_DD_API_URL: &str = "DD_API_URL";

pub const DEFAULT_CLOUDFLARE_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_DATADOG_BASE_URL: &str = "https://api.datadoghq.com/api/v1";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reporter config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Everything one reporting run needs, read once at startup.
///
/// Built from the process environment by [`ReporterConfig::from_env`];
/// nothing here is persisted or mutated after load.
#[derive(Clone, PartialEq, Eq)]
pub struct ReporterConfig {
    pub cf_api_key: String,
    pub cf_login: String,
    pub zone: String,
    pub quota: i64,
    pub dd_api_key: String,
    pub cloudflare_base_url: String,
    pub datadog_base_url: String,
}

impl ReporterConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// Every required variable is checked on its own; the first missing
    /// or empty one is reported by name.  `CF_CH_QUOTA` must parse as a
    /// base-10 integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cf_api_key = required(&lookup, ENV_CF_API_KEY)?;
        let cf_login = required(&lookup, ENV_CF_LOGIN)?;
        let zone = required(&lookup, ENV_CF_ZONE)?;
        let raw_quota = required(&lookup, ENV_CF_CH_QUOTA)?;
        let quota = raw_quota.parse::<i64>().map_err(|e| {
            Error::Config(format!(
                "{ENV_CF_CH_QUOTA} must be an integer, got {raw_quota:?}: {e}"
            ))
        })?;
        let dd_api_key = required(&lookup, ENV_DD_API_KEY)?;

        Ok(Self {
            cf_api_key,
            cf_login,
            zone,
            quota,
            dd_api_key,
            cloudflare_base_url: base_url(&lookup, ENV_CF_API_URL, DEFAULT_CLOUDFLARE_BASE_URL),
            datadog_base_url: base_url(&lookup, ENV_DD_API_URL, DEFAULT_DATADOG_BASE_URL),
        })
    }
}

// API keys never reach logs.
impl fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterConfig")
            .field("cf_api_key", &"<redacted>")
            .field("cf_login", &self.cf_login)
            .field("zone", &self.zone)
            .field("quota", &self.quota)
            .field("dd_api_key", &"<redacted>")
            .field("cloudflare_base_url", &self.cloudflare_base_url)
            .field("datadog_base_url", &self.datadog_base_url)
            .finish()
    }
}

// ── lookup helpers ──────────────────────────────────────────────────

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Config(format!("{key} should be defined"))),
    }
}

fn base_url<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
        .trim_end_matches('/')
        .to_owned()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
