//! End-to-end tests: the client proxy drives the real `sqlscout serve`
//! binary over stdio against a scratch SQLite database.

use serde_json::json;
use sqlscout_client::{McpSqlClient, ServerCommand};
use sqlscout_core::config::ClientConfig;
use std::path::{Path, PathBuf};

/// Seed a database with the sample shop tables.
fn seed_database(dir: &Path) -> PathBuf {
    let db_path = dir.join("mcp_proj1.db");
    let conn = rusqlite::Connection::open(&db_path).expect("open scratch database");
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
        );
        INSERT INTO inventory (product_name, quantity, price)
            VALUES ('widget', 5, 9.99), ('gadget', 2, 24.5);",
    )
    .expect("seed tables");
    db_path
}

fn server_command(db_path: &Path) -> ServerCommand {
    ServerCommand::new(env!("CARGO_BIN_EXE_sqlscout"))
        .arg("serve")
        .arg("--database")
        .arg(db_path.display().to_string())
}

/// Waits short enough to keep the suite fast, long enough for the binary
/// to open its database.
fn test_timeouts() -> ClientConfig {
    ClientConfig {
        call_timeout_secs: 10,
        spawn_settle_ms: 500,
        shutdown_grace_secs: 2,
    }
}

async fn started_client(db_path: &Path) -> McpSqlClient {
    let mut client = McpSqlClient::with_timeouts(server_command(db_path), test_timeouts());
    client.start().await.expect("server should start");
    client
}

#[tokio::test]
async fn run_query_select_one_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = seed_database(tmp.path());
    let mut client = started_client(&db_path).await;

    let outcome = client
        .call_tool("run_query", json!({"query": "SELECT 1 as test"}))
        .await;
    assert!(!outcome.is_error, "unexpected failure: {}", outcome.payload);
    assert!(outcome.payload.contains('1'));

    client.close().await;
}

#[tokio::test]
async fn get_table_info_lists_inventory_and_sales() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = seed_database(tmp.path());
    let mut client = started_client(&db_path).await;

    let outcome = client.call_tool("get_table_info", json!({})).await;
    assert!(!outcome.is_error, "unexpected failure: {}", outcome.payload);
    assert!(outcome.payload.contains("inventory"));
    assert!(outcome.payload.contains("sales"));

    client.close().await;
}

#[tokio::test]
async fn generate_table_ddl_has_comment_then_create() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = seed_database(tmp.path());
    let mut client = started_client(&db_path).await;

    let outcome = client
        .call_tool("generate_table_ddl", json!({"table_name": "inventory"}))
        .await;
    assert!(!outcome.is_error, "unexpected failure: {}", outcome.payload);
    let mut lines = outcome.payload.lines();
    assert_eq!(lines.next(), Some("-- DDL for table: inventory"));
    assert!(lines.next().unwrap().contains("CREATE TABLE"));

    client.close().await;
}

#[tokio::test]
async fn generate_database_schema_names_the_database_file() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = seed_database(tmp.path());
    let mut client = started_client(&db_path).await;

    let outcome = client.call_tool("generate_database_schema", json!({})).await;
    assert!(!outcome.is_error, "unexpected failure: {}", outcome.payload);
    assert!(
        outcome
            .payload
            .starts_with("-- Complete Database Schema for: mcp_proj1")
    );
    assert!(outcome.payload.contains("-- DDL for table: inventory"));
    assert!(outcome.payload.contains("-- DDL for table: sales"));

    client.close().await;
}

#[tokio::test]
async fn failed_sql_comes_back_as_error_text_not_transport_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = seed_database(tmp.path());
    let mut client = started_client(&db_path).await;

    let outcome = client
        .call_tool("run_query", json!({"query": "SELECT * FROM missing"}))
        .await;
    // Backend errors are successful envelopes whose text describes the error.
    assert!(!outcome.is_error);
    assert!(outcome.payload.starts_with("Error executing query:"));

    client.close().await;
}

#[tokio::test]
async fn unknown_tool_is_a_failure_outcome() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = seed_database(tmp.path());
    let mut client = started_client(&db_path).await;

    let outcome = client.call_tool("drop_everything", json!({})).await;
    assert!(outcome.is_error);
    assert!(outcome.payload.contains("drop_everything"));

    client.close().await;
}

#[tokio::test]
async fn last_query_is_tracked_across_calls() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = seed_database(tmp.path());
    let mut client = started_client(&db_path).await;

    let _ = client
        .call_tool("run_query", json!({"query": "SELECT count(*) FROM inventory"}))
        .await;
    let outcome = client.call_tool("get_last_query", json!({})).await;
    assert!(!outcome.is_error);
    assert!(
        outcome
            .payload
            .contains("Last Query: SELECT count(*) FROM inventory")
    );

    client.close().await;
}

#[tokio::test]
async fn unreachable_database_fails_start_before_any_call() {
    let tmp = tempfile::tempdir().unwrap();
    // A directory is not a valid database file; the server exits non-zero
    // during its eager connection check.
    let mut client = McpSqlClient::with_timeouts(
        server_command(tmp.path()),
        test_timeouts(),
    );

    let err = client.start().await.expect_err("start should fail");
    assert!(!err.to_string().is_empty());
    assert!(!client.is_ready());
}

#[tokio::test]
async fn call_after_close_fails_instead_of_hanging() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = seed_database(tmp.path());
    let mut client = started_client(&db_path).await;

    client.close().await;
    let outcome = client.call_tool("test_connection", json!({})).await;
    assert!(outcome.is_error);

    // And closing again stays a no-op.
    client.close().await;
}
