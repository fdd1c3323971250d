//! Client Proxy: drives one MCP SQL server subprocess over its stdio.
//!
//! The proxy owns the child's stdin/stdout/stderr exclusively and keeps the
//! protocol strictly one-in-flight: a call writes one request line and reads
//! response lines under a deadline until the correlation id matches,
//! discarding stale replies left over from a timed-out call. Every failure
//! class — spawn crash, timeout, closed stream, undecodable line, envelope
//! error — collapses into a [`ToolOutcome`]; no error crosses `call_tool`'s
//! boundary.

use serde_json::{Value, json};
use sqlscout_core::config::ClientConfig;
use sqlscout_core::error::ClientError;
use sqlscout_mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, error, info, warn};

/// How to launch the server subprocess.
#[derive(Debug, Clone)]
pub struct ServerCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ServerCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// The uniform two-field outcome every `call_tool` resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub is_error: bool,
    pub payload: String,
}

impl ToolOutcome {
    fn success(payload: impl Into<String>) -> Self {
        Self {
            is_error: false,
            payload: payload.into(),
        }
    }

    fn failure(payload: impl Into<String>) -> Self {
        Self {
            is_error: true,
            payload: payload.into(),
        }
    }
}

struct ServerHandle {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

enum State {
    Unstarted,
    Ready(Box<ServerHandle>),
    Failed,
    Closed,
}

pub struct McpSqlClient {
    command: ServerCommand,
    timeouts: ClientConfig,
    state: State,
    next_id: i64,
}

impl McpSqlClient {
    pub fn new(command: ServerCommand) -> Self {
        Self::with_timeouts(command, ClientConfig::default())
    }

    /// Override the settle/call/shutdown waits (tests use short values).
    pub fn with_timeouts(command: ServerCommand, timeouts: ClientConfig) -> Self {
        Self {
            command,
            timeouts,
            state: State::Unstarted,
            next_id: 1,
        }
    }

    /// Spawn the server subprocess and wait out the settle window to tell a
    /// crashed launch apart from one that is still initializing.
    pub async fn start(&mut self) -> Result<(), ClientError> {
        match self.state {
            State::Unstarted => {}
            State::Ready(_) => return Ok(()),
            State::Failed | State::Closed => return Err(ClientError::Closed),
        }

        info!(program = %self.command.program.display(), "starting MCP server");
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ClientError::Spawn(e.to_string()))?;

        sleep(Duration::from_millis(self.timeouts.spawn_settle_ms)).await;

        if let Some(status) = child.try_wait().map_err(ClientError::Io)? {
            let stderr = read_stderr(&mut child).await;
            error!(%status, "MCP server exited during startup: {}", stderr.trim());
            self.state = State::Failed;
            return Err(ClientError::StartupFailed { stderr });
        }

        let stdin = child.stdin.take().ok_or(ClientError::NotStarted)?;
        let stdout = child.stdout.take().ok_or(ClientError::NotStarted)?;
        self.state = State::Ready(Box::new(ServerHandle {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        }));
        info!("MCP server started");
        Ok(())
    }

    /// Issue one tool call and resolve it to a [`ToolOutcome`], whatever
    /// happens underneath.
    pub async fn call_tool(&mut self, tool_name: &str, arguments: Value) -> ToolOutcome {
        let State::Ready(handle) = &mut self.state else {
            return ToolOutcome::failure("MCP server not started");
        };
        if tool_name.is_empty() {
            return ToolOutcome::failure("Tool name must not be empty");
        }

        let id = self.next_id;
        self.next_id += 1;

        let request = JsonRpcRequest::new(
            id,
            "tools/call",
            json!({"name": tool_name, "arguments": arguments}),
        );
        let line = match serde_json::to_string(&request) {
            Ok(l) => l,
            Err(e) => return ToolOutcome::failure(e.to_string()),
        };

        debug!(tool_name, id, "sending tool call");
        if let Err(e) = write_line(&mut handle.stdin, &line).await {
            return ToolOutcome::failure(e.to_string());
        }

        let deadline = Instant::now() + Duration::from_secs(self.timeouts.call_timeout_secs);
        read_outcome(&mut handle.stdout, id, deadline).await
    }

    /// Shut the server down: close its stdin so the host loop ends on EOF,
    /// wait out the grace period, then kill. Idempotent.
    pub async fn close(&mut self) {
        let state = std::mem::replace(&mut self.state, State::Closed);
        let State::Ready(handle) = state else {
            return;
        };
        let mut handle = *handle;

        drop(handle.stdin);
        let grace = Duration::from_secs(self.timeouts.shutdown_grace_secs);
        match timeout(grace, handle.child.wait()).await {
            Ok(_) => info!("MCP server closed"),
            Err(_) => {
                warn!("MCP server did not close gracefully, killing process");
                if let Err(e) = handle.child.kill().await {
                    warn!("kill failed: {}", e);
                }
                let _ = handle.child.wait().await;
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }
}

/// Read response lines until the correlation id matches or the deadline
/// expires. Stale replies (a late answer to a timed-out call) are logged
/// and discarded.
async fn read_outcome(
    stdout: &mut BufReader<ChildStdout>,
    expected_id: i64,
    deadline: Instant,
) -> ToolOutcome {
    let mut line = String::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return ToolOutcome::failure("Request timeout");
        }

        line.clear();
        let read = match timeout(remaining, stdout.read_line(&mut line)).await {
            Err(_) => return ToolOutcome::failure("Request timeout"),
            Ok(Err(e)) => return ToolOutcome::failure(e.to_string()),
            Ok(Ok(n)) => n,
        };
        if read == 0 {
            return ToolOutcome::failure("No response from server");
        }

        let response: JsonRpcResponse = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                error!("invalid response from server: {}", e);
                return ToolOutcome::failure("Invalid response from server");
            }
        };

        if response.id != Some(Value::from(expected_id)) {
            debug!(?response.id, expected_id, "discarding stale response");
            continue;
        }

        if let Some(err) = response.error {
            let rendered = serde_json::to_string(&err).unwrap_or_else(|_| err.message.clone());
            return ToolOutcome::failure(rendered);
        }

        let result = response.result.unwrap_or(Value::Null);
        return match result.pointer("/content/0/text").and_then(|v| v.as_str()) {
            Some(text) => ToolOutcome::success(text),
            // Some other result shape: best-effort rendering of the whole value.
            None => ToolOutcome::success(result.to_string()),
        };
    }
}

async fn write_line(stdin: &mut ChildStdin, line: &str) -> std::io::Result<()> {
    stdin.write_all(line.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await
}

async fn read_stderr(child: &mut Child) -> String {
    let Some(mut stderr) = child.stderr.take() else {
        return "Unknown error".to_string();
    };
    let mut buf = Vec::new();
    match stderr.read_to_end(&mut buf).await {
        Ok(0) | Err(_) => "Unknown error".to_string(),
        Ok(_) => String::from_utf8_lossy(&buf).to_string(),
    }
}
