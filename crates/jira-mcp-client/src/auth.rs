//! Jira authentication

use std::fmt;

use reqwest::header::HeaderValue;

use crate::{Error, Result};

/// HTTP Basic credentials: account email plus API token.
pub struct JiraAuth {
    username: String,
    api_token: String,
}

impl JiraAuth {
    pub fn new(username: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_token: api_token.into(),
        }
    }

    pub fn to_basic_auth(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.username, self.api_token);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }

    /// `Authorization` header value, flagged sensitive so it never shows up in debug output.
    pub fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.to_basic_auth())
            .map_err(|e| Error::Config(format!("Invalid credentials: {}", e)))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for JiraAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraAuth")
            .field("username", &self.username)
            .field("api_token", &"<redacted>")
            .finish()
    }
}
