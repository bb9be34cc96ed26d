//! `chq-reporter`: one-shot custom-hostname quota reporter.
//!
//! Looks up how many custom hostnames a Cloudflare zone uses and forwards
//! that count, alongside the provisioned quota, to Datadog as two gauges.

pub mod cli;
pub mod run;

pub use run::{run, RunOptions, RunReport, Submission};
