//! HTTP client for the dizzylab catalog service.

pub mod client;
pub mod config;

pub use client::{ClientError, DizzylabClient};
pub use config::UpstreamConfig;
