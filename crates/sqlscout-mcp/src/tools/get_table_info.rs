use super::ToolDefinition;
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_table_info".into(),
        description: "Describe a table's schema, or every table when no name is given.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "table_name": {
                    "type": "string",
                    "description": "Table to describe. Default: all tables."
                }
            }
        }),
    }
}
