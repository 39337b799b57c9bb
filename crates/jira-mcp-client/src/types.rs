//! JIRA API types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::adf::AdfDocument;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueRequest {
    pub fields: CreateIssueFields,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueFields {
    pub project: ProjectRef,
    pub summary: String,
    #[serde(rename = "issuetype")]
    pub issue_type: IssueTypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<AdfDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTypeRef {
    pub name: String,
}

impl CreateIssueRequest {
    pub fn new(
        project_key: &str,
        summary: &str,
        issue_type: &str,
        description: Option<&str>,
    ) -> Self {
        Self {
            fields: CreateIssueFields {
                project: ProjectRef {
                    key: project_key.to_string(),
                },
                summary: summary.to_string(),
                issue_type: IssueTypeRef {
                    name: issue_type.to_string(),
                },
                description: description
                    .filter(|text| !text.is_empty())
                    .map(AdfDocument::from_plain_text),
            },
        }
    }
}

/// Partial update; `fields` goes to Jira untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateIssueRequest {
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub body: AdfDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub transition: TransitionRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRef {
    pub id: String,
}

/// One page of `GET issue/{key}/comment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    pub start_at: u64,
    pub max_results: u64,
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_last: Option<bool>,
    #[serde(default, alias = "comments")]
    pub values: Vec<Value>,
}

impl CommentPage {
    pub fn is_last_page(&self) -> bool {
        match self.is_last {
            Some(is_last) => is_last,
            None => self.start_at + self.values.len() as u64 >= self.total,
        }
    }
}
