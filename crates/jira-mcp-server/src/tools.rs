//! Tool catalogue and typed tool calls

use jira_mcp_client::DEFAULT_MAX_RESULTS;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Result, ToolError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolDescriptor {
    fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

fn issue_key_property() -> Value {
    json!({ "type": "string", "description": "The issue key (e.g., PROJ-123)" })
}

pub const TOOL_NAMES: [&str; 8] = [
    "get_issue",
    "search_issues",
    "create_issue",
    "update_issue",
    "add_comment",
    "get_projects",
    "transition_issue",
    "get_transitions",
];

/// The eight tools advertised through `tools/list`.
pub fn list_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_issue",
            "Get a Jira issue by its key (e.g., PROJ-123)",
            json!({
                "type": "object",
                "properties": { "issue_key": issue_key_property() },
                "required": ["issue_key"]
            }),
        ),
        ToolDescriptor::new(
            "search_issues",
            "Search Jira issues using JQL (Jira Query Language)",
            json!({
                "type": "object",
                "properties": {
                    "jql": { "type": "string", "description": "JQL query string" },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum results to return",
                        "default": DEFAULT_MAX_RESULTS,
                        "minimum": 1
                    }
                },
                "required": ["jql"]
            }),
        ),
        ToolDescriptor::new(
            "create_issue",
            "Create a new Jira issue",
            json!({
                "type": "object",
                "properties": {
                    "project_key": { "type": "string", "description": "Project key (e.g., PROJ)" },
                    "summary": { "type": "string", "description": "Issue summary/title" },
                    "issue_type": { "type": "string", "description": "Issue type (e.g., Bug, Task, Story)" },
                    "description": { "type": "string", "description": "Issue description" }
                },
                "required": ["project_key", "summary", "issue_type"]
            }),
        ),
        ToolDescriptor::new(
            "update_issue",
            "Update fields of an existing Jira issue",
            json!({
                "type": "object",
                "properties": {
                    "issue_key": issue_key_property(),
                    "fields": {
                        "type": "object",
                        "description": "Fields to update, sent to Jira as-is (custom fields such as customfield_10001 included)"
                    }
                },
                "required": ["issue_key", "fields"]
            }),
        ),
        ToolDescriptor::new(
            "add_comment",
            "Add a comment to a Jira issue",
            json!({
                "type": "object",
                "properties": {
                    "issue_key": issue_key_property(),
                    "comment": { "type": "string", "description": "Comment text" }
                },
                "required": ["issue_key", "comment"]
            }),
        ),
        ToolDescriptor::new(
            "get_projects",
            "Get all accessible Jira projects",
            json!({ "type": "object", "properties": {} }),
        ),
        ToolDescriptor::new(
            "transition_issue",
            "Transition an issue to a new status",
            json!({
                "type": "object",
                "properties": {
                    "issue_key": issue_key_property(),
                    "transition_id": { "type": "string", "description": "Transition ID" }
                },
                "required": ["issue_key", "transition_id"]
            }),
        ),
        ToolDescriptor::new(
            "get_transitions",
            "Get available transitions for an issue",
            json!({
                "type": "object",
                "properties": { "issue_key": issue_key_property() },
                "required": ["issue_key"]
            }),
        ),
    ]
}

/// A tool call with its arguments extracted and typed.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    GetIssue {
        issue_key: String,
    },
    SearchIssues {
        jql: String,
        max_results: u32,
    },
    CreateIssue {
        project_key: String,
        summary: String,
        issue_type: String,
        description: Option<String>,
    },
    UpdateIssue {
        issue_key: String,
        fields: Map<String, Value>,
    },
    AddComment {
        issue_key: String,
        comment: String,
    },
    GetProjects,
    TransitionIssue {
        issue_key: String,
        transition_id: String,
    },
    GetTransitions {
        issue_key: String,
    },
}

impl ToolCall {
    pub fn parse(name: &str, arguments: &Value) -> Result<Self> {
        // unknown names take precedence over malformed arguments
        if !TOOL_NAMES.contains(&name) {
            return Err(ToolError::UnknownTool(name.to_string()));
        }
        let args = Arguments::new(arguments)?;

        let call = match name {
            "get_issue" => ToolCall::GetIssue {
                issue_key: args.required_str("issue_key")?,
            },
            "search_issues" => ToolCall::SearchIssues {
                jql: args.required_str("jql")?,
                max_results: args.optional_u32("max_results")?.unwrap_or(DEFAULT_MAX_RESULTS),
            },
            "create_issue" => ToolCall::CreateIssue {
                project_key: args.required_str("project_key")?,
                summary: args.required_str("summary")?,
                issue_type: args.required_str("issue_type")?,
                description: args.optional_str("description")?,
            },
            "update_issue" => ToolCall::UpdateIssue {
                issue_key: args.required_str("issue_key")?,
                fields: args.required_object("fields")?,
            },
            "add_comment" => ToolCall::AddComment {
                issue_key: args.required_str("issue_key")?,
                comment: args.required_str("comment")?,
            },
            "get_projects" => ToolCall::GetProjects,
            "transition_issue" => ToolCall::TransitionIssue {
                issue_key: args.required_str("issue_key")?,
                transition_id: args.required_id("transition_id")?,
            },
            "get_transitions" => ToolCall::GetTransitions {
                issue_key: args.required_str("issue_key")?,
            },
            _ => return Err(ToolError::UnknownTool(name.to_string())),
        };

        Ok(call)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetIssue { .. } => "get_issue",
            ToolCall::SearchIssues { .. } => "search_issues",
            ToolCall::CreateIssue { .. } => "create_issue",
            ToolCall::UpdateIssue { .. } => "update_issue",
            ToolCall::AddComment { .. } => "add_comment",
            ToolCall::GetProjects => "get_projects",
            ToolCall::TransitionIssue { .. } => "transition_issue",
            ToolCall::GetTransitions { .. } => "get_transitions",
        }
    }
}

/// Argument object of a `tools/call`. Keys that are absent or `null` count as missing.
struct Arguments<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Arguments<'a> {
    fn new(arguments: &'a Value) -> Result<Self> {
        match arguments {
            Value::Null => Ok(Self { map: None }),
            Value::Object(map) => Ok(Self { map: Some(map) }),
            _ => Err(ToolError::InvalidArgument {
                name: "arguments".to_string(),
                expected: "an object",
            }),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_null())
    }

    fn invalid(key: &str, expected: &'static str) -> ToolError {
        ToolError::InvalidArgument {
            name: key.to_string(),
            expected,
        }
    }

    fn required_str(&self, key: &str) -> Result<String> {
        self.optional_str(key)?
            .ok_or_else(|| ToolError::MissingArgument(key.to_string()))
    }

    fn optional_str(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(Self::invalid(key, "a string")),
        }
    }

    fn optional_u32(&self, key: &str) -> Result<Option<u32>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| Self::invalid(key, "a non-negative integer")),
        }
    }

    fn required_object(&self, key: &str) -> Result<Map<String, Value>> {
        match self.get(key) {
            None => Err(ToolError::MissingArgument(key.to_string())),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(_) => Err(Self::invalid(key, "an object")),
        }
    }

    /// Jira ids are strings on the wire, but agents often send them as numbers.
    fn required_id(&self, key: &str) -> Result<String> {
        match self.get(key) {
            None => Err(ToolError::MissingArgument(key.to_string())),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
            Some(_) => Err(Self::invalid(key, "a string or integer")),
        }
    }
}
