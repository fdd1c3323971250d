use super::ToolDefinition;
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "test_connection".into(),
        description: "Check that the database connection is alive.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}
