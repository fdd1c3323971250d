use super::ToolDefinition;
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_last_query".into(),
        description: "Return the most recently executed query and its result.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}
