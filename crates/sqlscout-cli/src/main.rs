mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sqlscout",
    version,
    about = "Stdio JSON-RPC tool server over a SQL database",
    long_about = "SQLScout exposes SQL operations (query execution, schema inspection,\n\
        DDL generation) as MCP tools over a line-delimited JSON-RPC protocol\n\
        on stdin/stdout, plus a one-shot client for driving the server.\n\n\
        Quick start:\n  \
        sqlscout serve --database shop.db\n  \
        sqlscout call run_query --arg query='SELECT 1 as test' --database shop.db\n  \
        sqlscout tools"
)]
struct Cli {
    /// Enable verbose logging (set log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: ./sqlscout.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server loop on stdin/stdout
    ///
    /// Opens and verifies the database connection eagerly, then answers one
    /// JSON-RPC request per input line. Exits non-zero if the database is
    /// unreachable at startup.
    ///
    /// Example: sqlscout serve --database shop.db
    Serve {
        /// Path to the SQLite database file (overrides config)
        #[arg(long)]
        database: Option<String>,
    },
    /// Spawn a server subprocess and issue one tool call through it
    ///
    /// Examples:
    ///   sqlscout call test_connection --database shop.db
    ///   sqlscout call run_query --arg query='SELECT 1 as test' --database shop.db
    ///   sqlscout call generate_table_ddl --arg table_name=inventory --database shop.db
    Call {
        /// Tool name (run_query, get_table_info, get_last_query,
        /// generate_table_ddl, generate_database_schema, test_connection)
        tool: String,

        /// Tool argument as key=value (repeatable)
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Path to the SQLite database file (overrides config)
        #[arg(long)]
        database: Option<String>,
    },
    /// List the tools the server exposes
    Tools,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays a clean protocol channel.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_file = cli.config.as_deref().map(std::path::Path::new);

    match cli.command {
        Commands::Serve { database } => {
            commands::serve::run(database.as_deref(), config_file)?;
        }
        Commands::Call {
            tool,
            args,
            database,
        } => {
            commands::call::run(&tool, &args, database.as_deref(), config_file)?;
        }
        Commands::Tools => {
            commands::tools::run();
        }
    }

    Ok(())
}
