use anyhow::{Context, Result};
use std::path::Path;

pub fn run(database: Option<&str>, config_file: Option<&Path>) -> Result<()> {
    let config = super::load_config(database, config_file)?;

    sqlscout_mcp::server::run_server(&config).context("MCP server error")
}
