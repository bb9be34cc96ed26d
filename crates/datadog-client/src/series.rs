//! Wire types for the Datadog v1 series endpoint.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

pub const METRIC_CUSTOM_HOSTNAME: &str = "custom.cloudflare.custom_hostname";
pub const METRIC_CUSTOM_HOSTNAME_QUOTA: &str = "custom.cloudflare.custom_hostname_quota";

/// Below this magnitude whole values are written in plain integer form;
/// at or above it they fall back to exponent notation.
const MAX_PLAIN_INTEGER: f64 = 1e21;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One timestamped sample, written as `[timestamp, value]`.
///
/// Whole-number values are written without a fractional part (`3`, not
/// `3.0`), matching what the intake documents and what other clients
/// send.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub timestamp: i64,
    pub value: f64,
}

impl Point {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tup = serializer.serialize_tuple(2)?;
        tup.serialize_element(&self.timestamp)?;
        // `Display` gives the shortest round-trip digits with no exponent,
        // so whole values come out as plain integers.
        let plain = (self.value.is_finite()
            && self.value.fract() == 0.0
            && self.value.abs() < MAX_PLAIN_INTEGER)
            .then(|| self.value.to_string().parse::<i128>().ok())
            .flatten();
        match plain {
            Some(n) => tup.serialize_element(&n)?,
            None => tup.serialize_element(&self.value)?,
        }
        tup.end()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Series
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Gauge,
}

/// A named, typed, tagged run of points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub metric: String,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub points: Vec<Point>,
    pub tags: Vec<String>,
}

impl Series {
    pub fn gauge(metric: impl Into<String>, point: Point, tags: Vec<String>) -> Self {
        Self {
            metric: metric.into(),
            metric_type: MetricType::Gauge,
            points: vec![point],
            tags,
        }
    }
}

/// `POST /series` request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeriesBatch {
    pub series: Vec<Series>,
}

impl SeriesBatch {
    /// The two gauges one reporting run emits: current usage and the
    /// quota ceiling, stamped with the same instant and tagged by zone.
    pub fn hostname_usage(zone: &str, usage: u64, quota: i64, timestamp: i64) -> Self {
        let tags = vec![format!("cf_domain:{zone}")];
        Self {
            series: vec![
                Series::gauge(
                    METRIC_CUSTOM_HOSTNAME,
                    Point::new(timestamp, usage as f64),
                    tags.clone(),
                ),
                Series::gauge(
                    METRIC_CUSTOM_HOSTNAME_QUOTA,
                    Point::new(timestamp, quota as f64),
                    tags,
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
