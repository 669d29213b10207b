use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use lambdatronic_rs::constants::{DEFAULT_PORT, DEFAULT_READ_TIMEOUT_MS};
use lambdatronic_rs::logging::{init_logger_with_level, log_error, log_warn};
use lambdatronic_rs::{
    log_info, open_session, ClockSnapshot, ConnectionConfig, EngineStats, LambdaError,
    LoginMode, ParameterFormat, ParameterKind, ParameterName, ProtocolEngine, SessionConfig,
    TcpTransport, ValueSnapshot,
};
use serde::Serialize;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "lambdatronic-cli")]
#[command(about = "CLI tool for Lambdatronic S3100 heating controllers")]
struct Cli {
    /// Log frame traces
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct SessionArgs {
    /// Address of the serial-over-socket bridge
    #[arg(long)]
    host: String,
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    timeout_ms: u64,
    /// customer or service
    #[arg(long, default_value = "service")]
    mode: String,
    #[arg(long, default_value_t = 120)]
    handshake_secs: u64,
    #[arg(long, default_value_t = 1)]
    interval_secs: u64,
    #[arg(long, default_value_t = 20)]
    retry_secs: u64,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll measurements every tick, reconnecting after fatal errors
    Monitor {
        #[command(flatten)]
        session: SessionArgs,
        /// Stop after this many ticks
        #[arg(long)]
        max_ticks: Option<u64>,
    },
    /// Print the parameter catalog announced by the controller
    Catalog {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Print one measurement snapshot
    Status {
        #[command(flatten)]
        session: SessionArgs,
    },
}

impl SessionArgs {
    fn configs(&self) -> Result<(ConnectionConfig, SessionConfig), LambdaError> {
        let mode: LoginMode = self.mode.parse()?;
        let connection = ConnectionConfig {
            read_timeout: Duration::from_millis(self.timeout_ms),
            ..ConnectionConfig::new(self.host.clone(), self.port)
        };
        let session = SessionConfig {
            mode,
            handshake_deadline: Duration::from_secs(self.handshake_secs),
            poll_interval: Duration::from_secs(self.interval_secs),
            retry_delay: Duration::from_secs(self.retry_secs),
        };
        Ok((connection, session))
    }
}

#[derive(Serialize)]
struct Report<'a> {
    clock: &'a ClockSnapshot,
    values: &'a ValueSnapshot,
    stats: EngineStats,
}

#[derive(Serialize)]
struct CatalogRow<'a> {
    ordinal: usize,
    name: &'a ParameterName,
    format: Option<&'a ParameterFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger_with_level(if cli.verbose { "debug" } else { "info" });

    match cli.command {
        Commands::Monitor { session, max_ticks } => {
            let (connection, config) = session.configs()?;
            monitor(&connection, &config, session.json, max_ticks).await;
        }
        Commands::Catalog { session } => {
            let (connection, config) = session.configs()?;
            let engine = start(&connection, &config).await?;
            print_catalog(&engine, session.json)?;
        }
        Commands::Status { session } => {
            let (connection, config) = session.configs()?;
            let mut engine = start(&connection, &config).await?;
            tokio::time::sleep(config.poll_interval).await;
            engine.drain().await?;
            print_report(&engine, session.json)?;
        }
    }

    Ok(())
}

async fn start(
    connection: &ConnectionConfig,
    config: &SessionConfig,
) -> Result<ProtocolEngine<TcpTransport>, LambdaError> {
    let mut engine = open_session(connection).await?;
    engine.bootstrap(config.mode, config.handshake_deadline).await?;
    log_info(&format!("Session with {} active", connection.target()));
    Ok(engine)
}

/// Runs sessions until `max_ticks` is reached; fatal errors restart the session.
async fn monitor(
    connection: &ConnectionConfig,
    config: &SessionConfig,
    json: bool,
    max_ticks: Option<u64>,
) {
    let mut ticks = 0u64;
    loop {
        match run_session(connection, config, json, max_ticks, &mut ticks).await {
            Ok(()) => return,
            Err(e) => {
                log_error(&format!(
                    "Session failed: {e}; restarting in {}s",
                    config.retry_delay.as_secs()
                ));
                tokio::time::sleep(config.retry_delay).await;
            }
        }
    }
}

async fn run_session(
    connection: &ConnectionConfig,
    config: &SessionConfig,
    json: bool,
    max_ticks: Option<u64>,
    ticks: &mut u64,
) -> Result<(), LambdaError> {
    let mut engine = start(connection, config).await?;
    let mut interval = tokio::time::interval(config.poll_interval);

    loop {
        interval.tick().await;
        engine.drain().await?;
        if let Err(e) = print_report(&engine, json) {
            log_warn(&format!("Could not render snapshot: {e}"));
        }

        *ticks += 1;
        if max_ticks.is_some_and(|max| *ticks >= max) {
            return Ok(());
        }
    }
}

fn print_report(engine: &ProtocolEngine<TcpTransport>, json: bool) -> Result<()> {
    let values = engine.values();
    let clock = engine.clock();

    if json {
        let report = Report {
            clock,
            values,
            stats: engine.stats(),
        };
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    let device_time = clock
        .device_time
        .map(|t| t.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let updated = values
        .last_updated
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "Never".to_string());
    println!("Device time: {device_time}  Last data: {updated}");

    for (_, name, format) in engine.catalog().entries() {
        if name.kind != ParameterKind::Value {
            continue;
        }
        if let (Some(value), Some(format)) = (values.get(&name.name), format) {
            println!(
                "  {:<16} {:>10.*} {}",
                name.name, format.num_decimals as usize, value, format.unit
            );
        }
    }
    Ok(())
}

fn print_catalog(engine: &ProtocolEngine<TcpTransport>, json: bool) -> Result<()> {
    let rows: Vec<CatalogRow> = engine
        .catalog()
        .entries()
        .map(|(ordinal, name, format)| CatalogRow {
            ordinal,
            name,
            format,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in rows {
        println!("----");
        println!(
            "{} ({}): {} ({:?})",
            row.name.index, row.ordinal, row.name.name, row.name.kind
        );
        match row.format {
            Some(format) => println!(
                "Unit: {}, Num decimals: {}, Divisor: {}",
                format.unit, format.num_decimals, format.divisor
            ),
            None => println!("No format announced"),
        }
    }
    Ok(())
}
