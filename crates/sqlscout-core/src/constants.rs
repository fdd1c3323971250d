//! Protocol and lifecycle constants shared across crates.

/// JSON-RPC version tag carried by every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name reported by `initialize`.
pub const SERVER_NAME: &str = "sqlscout";

/// Maximum number of `{query, result}` pairs retained by the backend.
/// Insertion of the 11th entry evicts the oldest (FIFO, no re-promotion).
pub const HISTORY_CAPACITY: usize = 10;

/// Bounded wait for a single tool-call response line.
pub const CALL_TIMEOUT_SECS: u64 = 30;

/// How long the client waits after spawn before deciding whether the
/// server crashed on startup or is still initializing.
pub const SPAWN_SETTLE_MS: u64 = 1000;

/// Grace period between requesting shutdown and forcibly killing the server.
pub const SHUTDOWN_GRACE_SECS: u64 = 5;

/// Default project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "sqlscout.toml";
