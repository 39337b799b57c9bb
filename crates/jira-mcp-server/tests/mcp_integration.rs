use std::sync::Arc;

use jira_mcp_client::{JiraClient, Settings};
use jira_mcp_server::{Dispatcher, McpServer};
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher_for(server: &MockServer) -> Dispatcher {
    let settings = Settings {
        base_url: server.uri(),
        username: "test@example.com".to_string(),
        api_token: "test-token".to_string(),
        timeout_seconds: 30,
    };
    Dispatcher::new(Arc::new(JiraClient::new(&settings).unwrap()))
}

async fn expect_no_requests(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unknown_tool_never_reaches_jira() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let dispatcher = dispatcher_for(&server);

    let result = dispatcher.call_tool("delete_project", &json!({})).await;

    assert!(result.is_error);
    assert_eq!(result.text_content(), "Error: Unknown tool: delete_project");
}

#[tokio::test]
async fn test_search_without_jql_never_reaches_jira() {
    let server = MockServer::start().await;
    expect_no_requests(&server).await;
    let dispatcher = dispatcher_for(&server);

    let result = dispatcher
        .call_tool("search_issues", &json!({"max_results": 5}))
        .await;

    assert!(result.is_error);
    assert!(result.text_content().starts_with("Error: "));
    assert!(result.text_content().contains("jql"));
}

#[tokio::test]
async fn test_search_returns_pretty_json() {
    let server = MockServer::start().await;
    let body = json!({"issues": [{"key": "TEST-1"}], "total": 1});

    Mock::given(method("GET"))
        .and(path("/rest/api/3/search"))
        .and(query_param("jql", "assignee = currentUser()"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let result = dispatcher
        .call_tool("search_issues", &json!({"jql": "assignee = currentUser()"}))
        .await;

    assert!(!result.is_error);
    let text = result.text_content();
    assert_eq!(text, serde_json::to_string_pretty(&body).unwrap());
    assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), body);
}

#[tokio::test]
async fn test_update_issue_forwards_fields_and_acks() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/rest/api/3/issue/TEST-1"))
        .and(body_json(json!({"fields": {"customfield_10001": "value"}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let result = dispatcher
        .call_tool(
            "update_issue",
            &json!({"issue_key": "TEST-1", "fields": {"customfield_10001": "value"}}),
        )
        .await;

    assert!(!result.is_error);
    let ack: Value = serde_json::from_str(&result.text_content()).unwrap();
    assert_eq!(ack, json!({"success": true, "issue_key": "TEST-1"}));
}

#[tokio::test]
async fn test_transition_issue_acks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue/TEST-1/transitions"))
        .and(body_json(json!({"transition": {"id": "31"}})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let result = dispatcher
        .call_tool(
            "transition_issue",
            &json!({"issue_key": "TEST-1", "transition_id": "31"}),
        )
        .await;

    let ack: Value = serde_json::from_str(&result.text_content()).unwrap();
    assert_eq!(ack["success"], true);
}

#[tokio::test]
async fn test_jira_failure_becomes_error_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue/TEST-1/transitions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessages": ["Transition id '99' is not valid for this issue."],
            "errors": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let result = dispatcher
        .call_tool(
            "transition_issue",
            &json!({"issue_key": "TEST-1", "transition_id": "99"}),
        )
        .await;

    assert!(result.is_error);
    let text = result.text_content();
    assert!(text.starts_with("Error: "));
    assert!(text.contains("400"));
    assert!(text.contains("Transition id '99' is not valid"));
}

#[tokio::test]
async fn test_create_issue_and_add_comment_send_adf() {
    let server = MockServer::start().await;
    let doc = json!({
        "type": "doc",
        "version": 1,
        "content": [{"type": "paragraph", "content": [{"type": "text", "text": "Simple text"}]}]
    });

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue"))
        .and(body_json(json!({
            "fields": {
                "project": {"key": "TEST"},
                "summary": "Broken build",
                "issuetype": {"name": "Bug"},
                "description": doc
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "1", "key": "TEST-9"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/api/3/issue/TEST-9/comment"))
        .and(body_json(json!({"body": doc})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "100"})))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);

    let created = dispatcher
        .call_tool(
            "create_issue",
            &json!({
                "project_key": "TEST",
                "summary": "Broken build",
                "issue_type": "Bug",
                "description": "Simple text"
            }),
        )
        .await;
    assert!(!created.is_error, "{}", created.text_content());

    let commented = dispatcher
        .call_tool(
            "add_comment",
            &json!({"issue_key": "TEST-9", "comment": "Simple text"}),
        )
        .await;
    assert!(!commented.is_error, "{}", commented.text_content());
}

#[tokio::test]
async fn test_get_projects_and_transitions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"key": "TEST"}])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/issue/TEST-1/transitions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"transitions": [{"id": "31"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);

    let projects = dispatcher.call_tool("get_projects", &json!({})).await;
    let projects: Value = serde_json::from_str(&projects.text_content()).unwrap();
    assert_eq!(projects, json!([{"key": "TEST"}]));

    let transitions = dispatcher
        .call_tool("get_transitions", &json!({"issue_key": "TEST-1"}))
        .await;
    let transitions: Value = serde_json::from_str(&transitions.text_content()).unwrap();
    assert_eq!(transitions["transitions"][0]["id"], "31");
}

#[tokio::test]
async fn test_stdio_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/issue/TEST-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"key": "TEST-1", "fields": {"summary": "Hello"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mcp = McpServer::new(Arc::new(dispatcher_for(&server)));

    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        String::new(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "get_issue", "arguments": {"issue_key": "TEST-1"}}}).to_string(),
        json!({"jsonrpc": "2.0", "id": "four", "method": "tools/call", "params": {"name": "get_issue", "arguments": {}}}).to_string(),
        "{not json".to_string(),
    ]
    .join("\n");

    let mut output = Vec::new();
    mcp.serve(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // the notification and the blank line produce nothing
    assert_eq!(responses.len(), 5);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "jira-mcp");

    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"]["tools"].as_array().unwrap().len(), 8);

    assert_eq!(responses[2]["id"], 3);
    assert_eq!(responses[2]["result"]["isError"], false);
    let issue: Value =
        serde_json::from_str(responses[2]["result"]["content"][0]["text"].as_str().unwrap())
            .unwrap();
    assert_eq!(issue["fields"]["summary"], "Hello");

    assert_eq!(responses[3]["id"], "four");
    assert_eq!(responses[3]["result"]["isError"], true);
    assert!(responses[3]["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("issue_key"));

    assert_eq!(responses[4]["id"], Value::Null);
    assert_eq!(responses[4]["error"]["code"], -32700);
}

#[tokio::test]
async fn test_invalid_request_keeps_id() {
    let server = MockServer::start().await;
    let mcp = McpServer::new(Arc::new(dispatcher_for(&server)));

    let input = json!({"jsonrpc": "2.0", "id": 7}).to_string();
    let mut output = Vec::new();
    mcp.serve(input.as_bytes(), &mut output).await.unwrap();

    let response: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(response["id"], 7);
    assert_eq!(response["error"]["code"], -32600);
}
