use super::ToolDefinition;
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "generate_table_ddl".into(),
        description: "Generate the CREATE TABLE DDL statement for a specific table.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "table_name": {
                    "type": "string",
                    "description": "Table to generate DDL for"
                }
            },
            "required": ["table_name"]
        }),
    }
}
