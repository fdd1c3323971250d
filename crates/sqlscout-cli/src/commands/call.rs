use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use sqlscout_client::{McpSqlClient, ServerCommand};
use std::path::Path;
use tracing::info;

pub fn run(
    tool: &str,
    args: &[String],
    database: Option<&str>,
    config_file: Option<&Path>,
) -> Result<()> {
    let config = super::load_config(database, config_file)?;
    let arguments = parse_arguments(args)?;

    let exe = std::env::current_exe().context("Failed to locate the sqlscout binary")?;
    let mut command = ServerCommand::new(exe)
        .arg("serve")
        .arg("--database")
        .arg(&config.database.path);
    if let Some(cf) = config_file {
        command = command.arg("--config").arg(cf.display().to_string());
    }

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(async {
        let mut client = McpSqlClient::with_timeouts(command, config.client.clone());
        client
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start server: {e}"))?;

        let outcome = client.call_tool(tool, Value::Object(arguments)).await;
        client.close().await;

        if outcome.is_error {
            info!(tool, "tool call failed");
            bail!("{}", outcome.payload);
        }
        println!("{}", outcome.payload);
        Ok(())
    })
}

/// Parse repeated `key=value` flags into a JSON argument object.
fn parse_arguments(args: &[String]) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for arg in args {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("invalid --arg '{arg}': expected key=value");
        };
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(map)
}
