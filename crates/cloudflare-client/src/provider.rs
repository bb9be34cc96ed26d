//! The `CustomHostnameSource` trait defines the interface for anything
//! that can report a zone's custom-hostname count (REST client, test
//! double).

use async_trait::async_trait;
use chq_domain::error::Result;
use chq_domain::trace::TraceEvent;

use crate::types::HostnameUsage;

/// Abstraction over the two Cloudflare calls the reporter needs.
#[async_trait]
pub trait CustomHostnameSource: Send + Sync {
    /// Resolve a zone name to its zone id (GET /zones?name=).
    async fn zone_id_by_name(&self, zone: &str) -> Result<String>;

    /// Total custom hostnames provisioned in a zone
    /// (GET /zones/{id}/custom_hostnames, `result_info.total_count`).
    async fn custom_hostname_total(&self, zone_id: &str) -> Result<u64>;

    /// Resolve `zone` and count its custom hostnames.
    async fn hostname_usage(&self, zone: &str) -> Result<HostnameUsage> {
        let zone_id = self.zone_id_by_name(zone).await?;
        let total = self.custom_hostname_total(&zone_id).await?;

        TraceEvent::UsageFetched {
            zone: zone.to_owned(),
            zone_id: zone_id.clone(),
            total,
        }
        .emit();

        Ok(HostnameUsage {
            zone: zone.to_owned(),
            zone_id,
            total,
        })
    }
}
