use crate::constants;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file. The file stem doubles as the
    /// database name in generated schema headers.
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
    #[serde(default = "default_spawn_settle")]
    pub spawn_settle_ms: u64,
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_db_path() -> String {
    "sqlscout.db".into()
}
fn default_busy_timeout() -> u32 {
    5000
}
fn default_call_timeout() -> u64 {
    constants::CALL_TIMEOUT_SECS
}
fn default_spawn_settle() -> u64 {
    constants::SPAWN_SETTLE_MS
}
fn default_shutdown_grace() -> u64 {
    constants::SHUTDOWN_GRACE_SECS
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: default_call_timeout(),
            spawn_settle_ms: default_spawn_settle(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config, preferring an explicit file, then a project-local
    /// `sqlscout.toml` in `workspace`, then built-in defaults.
    pub fn load_with_file(
        workspace: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.display().to_string(),
                });
            }
            return Self::from_file(path);
        }

        if let Some(ws) = workspace {
            let local = ws.join(constants::PROJECT_CONFIG_FILE);
            if local.exists() {
                return Self::from_file(&local);
            }
        }

        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.client.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "client.call_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// The database name embedded in the connection descriptor: the file
    /// stem of the database path ("main" for in-memory connections).
    pub fn database_name(&self) -> String {
        database_name_from_path(&self.database.path)
    }
}

/// Derive a display name for a database from its path descriptor.
pub fn database_name_from_path(path: &str) -> String {
    if path == ":memory:" {
        return "main".into();
    }
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
