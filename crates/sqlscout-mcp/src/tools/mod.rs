pub mod generate_database_schema;
pub mod generate_table_ddl;
pub mod get_last_query;
pub mod get_table_info;
pub mod run_query;
pub mod test_connection;

use serde::{Deserialize, Serialize};

/// MCP tool definition for the tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// The closed set of tools the backend exposes. The tool table is fixed at
/// build time, so dispatch is an enum match rather than a runtime registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    RunQuery,
    GetTableInfo,
    GetLastQuery,
    GenerateTableDdl,
    GenerateDatabaseSchema,
    TestConnection,
}

impl ToolName {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "run_query" => Some(Self::RunQuery),
            "get_table_info" => Some(Self::GetTableInfo),
            "get_last_query" => Some(Self::GetLastQuery),
            "generate_table_ddl" => Some(Self::GenerateTableDdl),
            "generate_database_schema" => Some(Self::GenerateDatabaseSchema),
            "test_connection" => Some(Self::TestConnection),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunQuery => "run_query",
            Self::GetTableInfo => "get_table_info",
            Self::GetLastQuery => "get_last_query",
            Self::GenerateTableDdl => "generate_table_ddl",
            Self::GenerateDatabaseSchema => "generate_database_schema",
            Self::TestConnection => "test_connection",
        }
    }
}

/// Return all tool definitions.
pub fn list_tools() -> Vec<ToolDefinition> {
    vec![
        run_query::definition(),
        get_table_info::definition(),
        get_last_query::definition(),
        generate_table_ddl::definition(),
        generate_database_schema::definition(),
        test_connection::definition(),
    ]
}
