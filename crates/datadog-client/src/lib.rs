//! `chq-datadog`: Datadog series submission for the custom-hostname
//! quota reporter.
//!
//! [`SeriesBatch`] is the `POST /api/v1/series` body; [`DatadogClient`]
//! sends it and treats anything other than `202 Accepted` as a
//! [`SubmitError`].

pub mod series;
pub mod submit;

pub use series::{
    MetricType, Point, Series, SeriesBatch, METRIC_CUSTOM_HOSTNAME, METRIC_CUSTOM_HOSTNAME_QUOTA,
};
pub use submit::{DatadogClient, MetricSink, SubmitError};
