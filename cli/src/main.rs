//! Air traffic dispatch CLI
//!
//! Runs the dispatch core against an in-memory store and replays a stream of
//! JSON commands (one per line) from a file or stdin, printing one gateway
//! response per line to stdout.

mod commands;
mod error;
mod logging;

use atc_dispatch_core::{
    DispatchConfig, DispatchOrchestrator, IdGenerator, MemoryStore, SequentialIdGenerator, SystemClock, UuidGenerator,
};
use clap::Parser;
use error::CliError;
use std::fs::File;
use std::io::{self, BufReader};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "atc-dispatch")]
#[command(about = "Per-airport aircraft landing queue", long_about = None)]
struct Args {
    /// Command file, one JSON command per line (default: stdin)
    #[arg(long)]
    input: Option<String>,

    /// Aircraft record table (overrides AIRCRAFT_TABLE_NAME)
    #[arg(long)]
    aircraft_table: Option<String>,

    /// Priority index table (overrides PRIORITY_AIRCRAFT_TABLE_NAME)
    #[arg(long)]
    priority_table: Option<String>,

    /// Airport index table (overrides AIRPORT_QUEUE_TABLE_NAME)
    #[arg(long)]
    airport_table: Option<String>,

    /// Use readable sequential ids instead of UUIDs
    #[arg(long)]
    sequential_ids: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: String,
}

impl Args {
    fn dispatch_config(&self) -> DispatchConfig {
        let mut config = DispatchConfig::from_env();
        if let Some(table) = &self.aircraft_table {
            config.aircraft_table = table.clone();
        }
        if let Some(table) = &self.priority_table {
            config.priority_table = table.clone();
        }
        if let Some(table) = &self.airport_table {
            config.airport_table = table.clone();
        }
        config
    }
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    logging::init_logging(&args.log_level)?;

    let config = args.dispatch_config();
    config.validate()?;

    let ids: Arc<dyn IdGenerator> = if args.sequential_ids {
        Arc::new(SequentialIdGenerator::new("aircraft"))
    } else {
        Arc::new(UuidGenerator)
    };

    let store = Arc::new(MemoryStore::with_tables(&config.table_names()));
    let orchestrator = DispatchOrchestrator::with_store(store, &config, ids, Arc::new(SystemClock))?;

    tracing::info!(
        aircraft_table = %config.aircraft_table,
        priority_table = %config.priority_table,
        airport_table = %config.airport_table,
        "dispatch ready"
    );

    let stdout = io::stdout();
    let processed = match &args.input {
        Some(path) => {
            let file = File::open(path).map_err(|error| CliError::Input {
                path: path.clone(),
                error,
            })?;
            commands::run(&orchestrator, BufReader::new(file), stdout.lock())?
        }
        None => commands::run(&orchestrator, io::stdin().lock(), stdout.lock())?,
    };

    tracing::info!(commands = processed, "input exhausted");
    Ok(())
}
