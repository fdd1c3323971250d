use super::ToolDefinition;
use serde_json::json;

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "generate_database_schema".into(),
        description: "Generate DDL for every table in the database, with a schema header.".into(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "database_name": {
                    "type": "string",
                    "description": "Name used in the schema header. Default: derived from the connection descriptor."
                }
            }
        }),
    }
}
