//! jira-mcp Jira client
//!
//! Settings, HTTP Basic auth, the Atlassian Document Format helpers and a
//! client for the handful of Jira REST v3 endpoints the MCP server exposes.

pub mod adf;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use adf::AdfDocument;
pub use client::{JiraClient, DEFAULT_MAX_RESULTS, DEFAULT_START_AT};
pub use config::{get_settings, Settings};
pub use error::{Error, Result};
pub use types::*;
