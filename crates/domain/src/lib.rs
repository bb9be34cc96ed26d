//! `chq-domain`: shared configuration, error, and trace types for the
//! custom-hostname quota reporter.

pub mod config;
pub mod error;
pub mod trace;
