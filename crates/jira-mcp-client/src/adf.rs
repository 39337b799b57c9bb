//! Atlassian Document Format
//!
//! Jira v3 stores rich text (descriptions, comment bodies) as an ADF tree:
//! a `doc` root holding block nodes, which in turn hold inline `text` nodes.
//! Only the minimal single-paragraph shape is ever built here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ADF_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub version: u32,
    #[serde(default)]
    pub content: Vec<AdfNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<AdfNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<AdfMark>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Value>,
}

/// Inline formatting such as `strong`, `em` or `underline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfMark {
    #[serde(rename = "type")]
    pub mark_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Value>,
}

impl AdfDocument {
    pub fn new(content: Vec<AdfNode>) -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: ADF_VERSION,
            content,
        }
    }

    /// Wrap plain text in a one-paragraph document.
    pub fn from_plain_text(text: impl Into<String>) -> Self {
        Self::new(vec![AdfNode::paragraph(vec![AdfNode::text(text)])])
    }
}

impl AdfNode {
    fn new(node_type: &str) -> Self {
        Self {
            node_type: node_type.to_string(),
            content: None,
            text: None,
            marks: None,
            attrs: None,
        }
    }

    pub fn paragraph(children: Vec<AdfNode>) -> Self {
        Self {
            content: Some(children),
            ..Self::new("paragraph")
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new("text")
        }
    }
}
