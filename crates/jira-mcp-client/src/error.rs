//! Error types for the Jira client

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Jira API error: {status} for {url}: {message}")]
    Request {
        status: StatusCode,
        url: Url,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Error body Jira returns alongside 4xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: serde_json::Map<String, serde_json::Value>,
}

impl Error {
    /// Build a request error from a non-2xx response, preferring Jira's own messages.
    pub(crate) fn from_response(status: StatusCode, url: Url, body: &[u8]) -> Self {
        let parsed: JiraErrorBody = serde_json::from_slice(body).unwrap_or_default();

        let mut messages = parsed.error_messages;
        for (field, value) in parsed.errors {
            match value.as_str() {
                Some(text) => messages.push(format!("{}: {}", field, text)),
                None => messages.push(format!("{}: {}", field, value)),
            }
        }

        let message = if messages.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        } else {
            messages.join("; ")
        };

        Error::Request {
            status,
            url,
            message,
        }
    }

    /// HTTP status of a failed request, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Request { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }
}
