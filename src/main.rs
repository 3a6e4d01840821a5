//! schema-probe - Schema introspection for MySQL and ClickHouse.

mod cli;

use cli::{Cli, Command};
use schema_probe::config::{Config, ConnectionConfig};
use schema_probe::db::SchemaClient;
use schema_probe::error::{ProbeError, Result};
use schema_probe::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    match &cli.log_file {
        Some(Some(path)) => logging::init_file_logging(path),
        Some(None) => logging::init_file_logging(&logging::default_log_path()),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(&cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let connection = resolve_connection(cli, &config)?;
    info!("Connection: {}", connection.display_string());

    let client = SchemaClient::connect(&connection).await?;
    let result = execute(cli, &client, &connection).await;
    client.close().await?;
    result
}

async fn execute(cli: &Cli, client: &SchemaClient, connection: &ConnectionConfig) -> Result<()> {
    match &cli.command {
        Command::Tables => {
            let tables = client.list_tables().await?;
            if cli.json {
                print_json(&tables)?;
            } else {
                for table in tables {
                    println!("{table}");
                }
            }
        }
        Command::Schema { table } => {
            let schema = client.get_schema(table).await?;
            print_text(cli, &schema)?;
        }
        Command::Desc { table, database } => {
            let database = database
                .clone()
                .or_else(|| connection.database())
                .ok_or_else(|| {
                    ProbeError::config("No database given and none found in the DSN; use --database")
                })?;
            let schema = client.get_desc_schema(&database, table).await?;
            print_text(cli, &schema)?;
        }
        Command::Dump => {
            let schema = client.introspect().await?;
            if cli.json {
                print_json(&schema)?;
            } else {
                print!("{}", schema.format_for_display());
            }
        }
    }
    Ok(())
}

fn print_text(cli: &Cli, text: &str) -> Result<()> {
    if cli.json {
        print_json(&text)
    } else {
        println!("{text}");
        Ok(())
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ProbeError::internal(format!("Failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Resolves the connection with precedence:
/// 1. `--dsn` / `SCHEMA_PROBE_DSN`
/// 2. Named connection from config
/// 3. Default connection from config
fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    if let Some(connection) = cli.to_connection_config()? {
        return Ok(connection);
    }

    let mut connection = match cli.connection_name() {
        Some(name) => config.get_connection(Some(name)).cloned().ok_or_else(|| {
            ProbeError::config(format!("Connection '{name}' not found in config file"))
        })?,
        None => config.get_connection(None).cloned().ok_or_else(|| {
            ProbeError::config(
                "No database connection configured. Use --dsn or add [connections.default] to the config file",
            )
        })?,
    };

    connection.merge(&cli.overrides()?);
    Ok(connection)
}
