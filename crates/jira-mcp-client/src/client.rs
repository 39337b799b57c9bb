//! Jira REST API v3 client

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Url};
use serde_json::{Map, Value};

use crate::adf::AdfDocument;
use crate::auth::JiraAuth;
use crate::config::Settings;
use crate::types::{
    CommentPage, CommentRequest, CreateIssueRequest, TransitionRef, TransitionRequest,
    UpdateIssueRequest,
};
use crate::{Error, Result};

pub const DEFAULT_MAX_RESULTS: u32 = 50;
pub const DEFAULT_START_AT: u32 = 0;

const API_PREFIX: [&str; 3] = ["rest", "api", "3"];
const USER_AGENT: &str = concat!("jira-mcp/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over the Jira REST API.
///
/// Every method performs exactly one authenticated round trip and either
/// returns the decoded body or fails; nothing is retried.
#[derive(Debug)]
pub struct JiraClient {
    http: reqwest::Client,
    base_url: Url,
    auth: JiraAuth,
}

impl JiraClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // No idle pool: each call owns its connection and releases it when done.
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.timeout())
            .pool_max_idle_per_host(0)
            .build()?;

        Self::with_http_client(settings, http)
    }

    /// Use a caller-supplied HTTP client. Timeout and headers are then the caller's concern.
    pub fn with_http_client(settings: &Settings, http: reqwest::Client) -> Result<Self> {
        settings.validate()?;

        let mut base_url = Url::parse(settings.base_url.trim()).map_err(|e| {
            Error::Config(format!("Invalid Jira URL '{}': {}", settings.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Jira URL '{}' cannot be used as a base URL",
                settings.base_url
            )));
        }
        base_url.set_query(None);
        base_url.set_fragment(None);

        Ok(Self {
            http,
            base_url,
            auth: JiraAuth::new(settings.username.clone(), settings.api_token.clone()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get a single issue by key, e.g. `PROJ-123`.
    pub async fn get_issue(&self, issue_key: &str) -> Result<Value> {
        ensure_not_empty("issue_key", issue_key)?;
        let url = self.endpoint(&["issue", issue_key])?;
        self.send(self.http.get(url)).await
    }

    /// Run a JQL search.
    pub async fn search_issues(&self, jql: &str, max_results: u32) -> Result<Value> {
        ensure_not_empty("jql", jql)?;
        ensure_positive("max_results", max_results)?;
        let url = self.endpoint(&["search"])?;
        let request = self.http.get(url).query(&[
            ("jql", jql.to_string()),
            ("maxResults", max_results.to_string()),
        ]);
        self.send(request).await
    }

    /// Create an issue. A plain-text description is wrapped in a one-paragraph ADF document.
    pub async fn create_issue(
        &self,
        project_key: &str,
        summary: &str,
        issue_type: &str,
        description: Option<&str>,
    ) -> Result<Value> {
        let payload = CreateIssueRequest::new(project_key, summary, issue_type, description);
        let url = self.endpoint(&["issue"])?;
        self.send(self.http.post(url).json(&payload)).await
    }

    /// Update issue fields. `fields` is sent as-is, custom fields included.
    ///
    /// Jira answers `204 No Content`, which decodes to `Value::Null`.
    pub async fn update_issue(&self, issue_key: &str, fields: Map<String, Value>) -> Result<Value> {
        ensure_not_empty("issue_key", issue_key)?;
        let payload = UpdateIssueRequest { fields };
        let url = self.endpoint(&["issue", issue_key])?;
        self.send(self.http.put(url).json(&payload)).await
    }

    pub async fn add_comment(&self, issue_key: &str, comment: &str) -> Result<Value> {
        ensure_not_empty("issue_key", issue_key)?;
        let payload = CommentRequest {
            body: AdfDocument::from_plain_text(comment),
        };
        let url = self.endpoint(&["issue", issue_key, "comment"])?;
        self.send(self.http.post(url).json(&payload)).await
    }

    /// Fetch one page of comments.
    pub async fn get_comments(
        &self,
        issue_key: &str,
        start_at: u32,
        max_results: u32,
    ) -> Result<CommentPage> {
        ensure_not_empty("issue_key", issue_key)?;
        ensure_positive("max_results", max_results)?;
        let url = self.endpoint(&["issue", issue_key, "comment"])?;
        let request = self
            .http
            .get(url)
            .query(&[("startAt", start_at), ("maxResults", max_results)]);
        let body = self.send(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Fetch every comment on an issue, following pagination until the last page.
    pub async fn get_all_comments(&self, issue_key: &str, page_size: u32) -> Result<Vec<Value>> {
        let mut start_at = DEFAULT_START_AT;
        let mut comments = Vec::new();

        loop {
            let page = self.get_comments(issue_key, start_at, page_size).await?;
            let fetched = page.values.len();
            let is_last = page.is_last_page();
            comments.extend(page.values);

            if is_last || fetched == 0 {
                break;
            }
            start_at = start_at.saturating_add(fetched as u32);
        }

        tracing::debug!(issue_key, count = comments.len(), "Fetched all comments");
        Ok(comments)
    }

    pub async fn get_projects(&self) -> Result<Vec<Value>> {
        let url = self.endpoint(&["project"])?;
        let body = self.send(self.http.get(url)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Move an issue through a workflow transition. Jira answers `204 No Content`.
    pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<Value> {
        ensure_not_empty("issue_key", issue_key)?;
        ensure_not_empty("transition_id", transition_id)?;
        let payload = TransitionRequest {
            transition: TransitionRef {
                id: transition_id.to_string(),
            },
        };
        let url = self.endpoint(&["issue", issue_key, "transitions"])?;
        self.send(self.http.post(url).json(&payload)).await
    }

    pub async fn get_transitions(&self, issue_key: &str) -> Result<Value> {
        ensure_not_empty("issue_key", issue_key)?;
        let url = self.endpoint(&["issue", issue_key, "transitions"])?;
        self.send(self.http.get(url)).await
    }

    /// `{base_url}/rest/api/3/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid Jira URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let request = request
            .header(AUTHORIZATION, self.auth.header_value()?)
            .build()?;
        tracing::debug!(method = %request.method(), path = request.url().path(), "Jira request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            // a body that cannot be read still leaves the status to report
            let body = response.bytes().await.unwrap_or_default();
            let err = Error::from_response(status, url, &body);
            tracing::warn!(%status, "Jira request failed: {}", err);
            return Err(err);
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

fn ensure_not_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", name)));
    }
    Ok(())
}

fn ensure_positive(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidInput(format!("{} must be greater than 0", name)));
    }
    Ok(())
}
