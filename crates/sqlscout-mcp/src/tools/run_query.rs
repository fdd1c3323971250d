use super::ToolDefinition;
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "run_query".into(),
        description: "Execute a SQL query and return the results as text.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "SQL statement to execute"
                }
            },
            "required": ["query"]
        }),
    }
}
