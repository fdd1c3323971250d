pub mod call;
pub mod serve;
pub mod tools;

use sqlscout_core::config::Config;
use std::path::Path;

/// Load config and apply the `--database` override.
pub fn load_config(
    database: Option<&str>,
    config_file: Option<&Path>,
) -> anyhow::Result<Config> {
    let workspace = std::env::current_dir()?;
    let mut config = Config::load_with_file(Some(&workspace), config_file)?;
    if let Some(path) = database {
        config.database.path = path.to_string();
    }
    Ok(config)
}
