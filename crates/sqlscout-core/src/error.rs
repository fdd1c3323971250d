use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config value: {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors internal to the Tool Backend.
///
/// These never cross the backend's public boundary: every tool operation
/// collapses them into a descriptive error string so the "operations always
/// produce text" contract holds.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("sqlite error: {0}")]
    Sqlite(String),

    #[error("no such table: {table}")]
    NoSuchTable { table: String },

    #[error("connection check failed: {0}")]
    ConnectionCheck(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// Convenience constructor — use with `.map_err(BackendError::sqlite)`.
    pub fn sqlite<E: std::fmt::Display>(e: E) -> Self {
        Self::Sqlite(e.to_string())
    }
}

/// Fatal errors of the Process Host.
///
/// Protocol-level failures (unknown method, bad arguments) are answered on
/// the wire and never become one of these; only startup and a dead stdio
/// stream end the host.
#[derive(Error, Debug)]
pub enum McpError {
    #[error("startup failed: {0}")]
    Startup(#[from] BackendError),

    #[error("response encode failed: {0}")]
    Encode(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Transport-level errors inside the Client Proxy.
///
/// Like `BackendError`, these are recovered at the proxy boundary: callers
/// of `call_tool` only ever see a `ToolOutcome`, never one of these.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("server failed to start: {stderr}")]
    StartupFailed { stderr: String },

    #[error("server not started")]
    NotStarted,

    #[error("server already closed")]
    Closed,

    #[error("spawn failed: {0}")]
    Spawn(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_display_is_descriptive() {
        let e = BackendError::sqlite("no such column: x");
        assert_eq!(e.to_string(), "sqlite error: no such column: x");

        let e = BackendError::NoSuchTable {
            table: "inventory".into(),
        };
        assert!(e.to_string().contains("inventory"));
    }

    #[test]
    fn mcp_error_carries_backend_startup_failure() {
        let cause = BackendError::ConnectionCheck("unable to open database file".into());
        let e: McpError = cause.into();
        assert!(matches!(e, McpError::Startup(_)));
        assert!(e.to_string().contains("unable to open database file"));
    }
}
