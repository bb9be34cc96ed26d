use serde::Serialize;

/// Structured trace events emitted across all reporter crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    CloudflareCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    UsageFetched {
        zone: String,
        zone_id: String,
        total: u64,
    },
    SeriesSubmitted {
        series: usize,
        status: u16,
        duration_ms: u64,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "chq_event");
    }
}
