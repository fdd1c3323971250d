use super::*;
use crate::protocol::INVALID_PARAMS;
use crate::tools::ToolName;
use serde_json::Value;

/// Request Dispatcher: map a tool name to a backend operation and wrap its
/// text result as a JSON-RPC envelope.
///
/// Backend operations are infallible by type (they collapse their own
/// failures into text), so the only envelope-level errors produced here are
/// an unknown tool name and a missing required argument.
pub(super) fn handle_tool_call(
    id: Option<Value>,
    tool_name: &str,
    arguments: &Value,
    toolbox: &mut SqlToolbox,
) -> JsonRpcResponse {
    let Some(tool) = ToolName::from_name(tool_name) else {
        return JsonRpcResponse::error(
            id,
            METHOD_NOT_FOUND,
            format!("Unknown tool: {}", tool_name),
        );
    };

    let text = match tool {
        ToolName::RunQuery => {
            let Some(query) = str_arg(arguments, "query") else {
                return missing_argument(id, "query");
            };
            toolbox.run_query(query)
        }
        ToolName::GetTableInfo => toolbox.get_table_info(str_arg(arguments, "table_name")),
        ToolName::GetLastQuery => toolbox.get_last_query(),
        ToolName::GenerateTableDdl => {
            let Some(table) = str_arg(arguments, "table_name") else {
                return missing_argument(id, "table_name");
            };
            toolbox.generate_table_ddl(table)
        }
        ToolName::GenerateDatabaseSchema => {
            toolbox.generate_database_schema(str_arg(arguments, "database_name"))
        }
        ToolName::TestConnection => toolbox.test_connection(),
    };

    tool_text_response(id, &text)
}

/// Wrap a tool's text result as a single text content item.
pub(crate) fn tool_text_response(id: Option<Value>, text: &str) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "content": [{"type": "text", "text": text}]
        }),
    )
}

fn str_arg<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(|v| v.as_str())
}

fn missing_argument(id: Option<Value>, key: &str) -> JsonRpcResponse {
    JsonRpcResponse::error(id, INVALID_PARAMS, format!("Missing required argument: {}", key))
}
