use super::*;
use serde_json::json;
use sqlscout_backend::SqlToolbox;

fn shop_toolbox() -> SqlToolbox {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE inventory (
            id INTEGER PRIMARY KEY,
            product_name TEXT NOT NULL,
            quantity INTEGER,
            price REAL
        );
        CREATE TABLE sales (
            sell_id INTEGER PRIMARY KEY,
            product_name TEXT,
            price REAL,
            date TEXT
        );",
    )
    .unwrap();
    SqlToolbox::from_connection(conn, "/tmp/mcp_proj1.db")
}

fn make_request(method: &str, params: serde_json::Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".into(),
        id: Some(json!(1)),
        method: method.into(),
        params,
    }
}

fn call_tool(toolbox: &mut SqlToolbox, name: &str, arguments: serde_json::Value) -> JsonRpcResponse {
    let request = make_request("tools/call", json!({"name": name, "arguments": arguments}));
    handle_request(&request, toolbox)
}

/// Extract the single text content item from a tool result.
fn result_text(response: &JsonRpcResponse) -> String {
    response
        .result
        .as_ref()
        .expect("expected a result envelope")
        .pointer("/content/0/text")
        .and_then(|v| v.as_str())
        .expect("expected one text content item")
        .to_string()
}

#[test]
fn initialize_reports_server_info() {
    let mut toolbox = shop_toolbox();
    let request = make_request("initialize", json!({"capabilities": {}}));
    let response = handle_request(&request, &mut toolbox);

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(
        result.pointer("/serverInfo/name").unwrap().as_str(),
        Some("sqlscout")
    );
    assert_eq!(
        result.pointer("/protocolVersion").unwrap().as_str(),
        Some("2024-11-05")
    );
}

#[test]
fn tools_list_returns_all_registered_tools() {
    let mut toolbox = shop_toolbox();
    let request = make_request("tools/list", json!({}));
    let response = handle_request(&request, &mut toolbox);

    assert!(response.error.is_none(), "expected success, got error");
    let result = response.result.expect("result should be present");
    let tools = result
        .get("tools")
        .expect("result should contain 'tools'")
        .as_array()
        .expect("'tools' should be an array");

    assert_eq!(tools.len(), 6, "expected 6 tools, got {}", tools.len());

    let tool_names: Vec<&str> = tools
        .iter()
        .map(|t| t.get("name").unwrap().as_str().unwrap())
        .collect();
    let expected_names = [
        "run_query",
        "get_table_info",
        "get_last_query",
        "generate_table_ddl",
        "generate_database_schema",
        "test_connection",
    ];
    for name in &expected_names {
        assert!(
            tool_names.contains(name),
            "missing tool: {name}; found: {tool_names:?}"
        );
    }
}

#[test]
fn unknown_method_yields_error() {
    let mut toolbox = shop_toolbox();
    let request = make_request("resources/read", json!({}));
    let response = handle_request(&request, &mut toolbox);

    let error = response.error.expect("expected an error envelope");
    assert_eq!(error.code, -32601);
    assert!(error.message.contains("resources/read"));
    assert!(response.result.is_none());
}

#[test]
fn unknown_tool_yields_error_never_result() {
    let mut toolbox = shop_toolbox();
    let response = call_tool(&mut toolbox, "drop_everything", json!({}));

    let error = response.error.expect("expected an error envelope");
    assert_eq!(error.code, -32601);
    assert!(error.message.contains("drop_everything"));
    assert!(response.result.is_none());
}

#[test]
fn run_query_without_query_argument_is_a_dispatch_error() {
    let mut toolbox = shop_toolbox();
    let response = call_tool(&mut toolbox, "run_query", json!({}));

    let error = response.error.expect("expected an error envelope");
    assert_eq!(error.code, -32602);
    assert!(error.message.contains("query"));
}

#[test]
fn run_query_select_one_returns_text_content() {
    let mut toolbox = shop_toolbox();
    let response = call_tool(&mut toolbox, "run_query", json!({"query": "SELECT 1 as test"}));

    assert!(response.error.is_none());
    let text = result_text(&response);
    assert!(text.contains("test"));
    assert!(text.contains('1'));
}

#[test]
fn failed_sql_is_a_successful_envelope_with_error_text() {
    // Backend failures surface as *results* whose text describes the error,
    // distinct from dispatch errors.
    let mut toolbox = shop_toolbox();
    let response = call_tool(
        &mut toolbox,
        "run_query",
        json!({"query": "SELECT * FROM missing"}),
    );

    assert!(response.error.is_none());
    let text = result_text(&response);
    assert!(text.starts_with("Error executing query:"));
}

#[test]
fn get_table_info_lists_both_tables() {
    let mut toolbox = shop_toolbox();
    let response = call_tool(&mut toolbox, "get_table_info", json!({}));

    let text = result_text(&response);
    assert!(text.contains("inventory"));
    assert!(text.contains("sales"));
}

#[test]
fn generate_table_ddl_via_dispatch() {
    let mut toolbox = shop_toolbox();
    let response = call_tool(
        &mut toolbox,
        "generate_table_ddl",
        json!({"table_name": "inventory"}),
    );

    let text = result_text(&response);
    assert!(text.starts_with("-- DDL for table: inventory"));
    assert!(text.contains("CREATE TABLE"));
}

#[test]
fn get_last_query_sees_queries_run_through_dispatch() {
    let mut toolbox = shop_toolbox();
    let _ = call_tool(
        &mut toolbox,
        "run_query",
        json!({"query": "SELECT 42 as answer"}),
    );
    let response = call_tool(&mut toolbox, "get_last_query", json!({}));

    let text = result_text(&response);
    assert!(text.contains("Last Query: SELECT 42 as answer"));
    assert!(text.contains("42"));
}

#[test]
fn test_connection_via_dispatch() {
    let mut toolbox = shop_toolbox();
    let response = call_tool(&mut toolbox, "test_connection", json!({}));

    let text = result_text(&response);
    assert!(text.starts_with("Connection successful:"));
}

// ------------------------------------------------------------------
// Host loop behavior
// ------------------------------------------------------------------

fn serve_lines(input: &str, toolbox: &mut SqlToolbox) -> Vec<serde_json::Value> {
    let mut output = Vec::new();
    serve(input.as_bytes(), &mut output, toolbox).unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn host_answers_each_request_with_one_line() {
    let mut toolbox = shop_toolbox();
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"test_connection","arguments":{}}}"#,
        "\n",
    );
    let responses = serve_lines(input, &mut toolbox);

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], json!(1));
    assert_eq!(responses[1]["id"], json!(2));
}

#[test]
fn malformed_line_produces_no_response_and_host_keeps_running() {
    let mut toolbox = shop_toolbox();
    let input = concat!(
        "this is not json\n",
        r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#,
        "\n",
    );
    let responses = serve_lines(input, &mut toolbox);

    // One response only, for the well-formed request after the bad one.
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], json!(7));
}

#[test]
fn blank_lines_are_skipped() {
    let mut toolbox = shop_toolbox();
    let responses = serve_lines("\n   \n\n", &mut toolbox);
    assert!(responses.is_empty());
}

#[test]
fn end_of_input_ends_the_loop_cleanly() {
    let mut toolbox = shop_toolbox();
    let responses = serve_lines("", &mut toolbox);
    assert!(responses.is_empty());
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn dead_output_stream_ends_the_loop_with_an_io_error() {
    let mut toolbox = shop_toolbox();
    let input = concat!(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#, "\n");
    let err = serve(input.as_bytes(), &mut BrokenPipe, &mut toolbox)
        .expect_err("a dead stdout should end the host");
    assert!(matches!(err, McpError::Io(_)));
}
