//! Account Ledger CLI
//!
//! Command-line interface for the account ledger service.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- serve
//! cargo run -- serve --bind 0.0.0.0:8000 --seed accounts.csv --workers 4
//! cargo run -- validate accounts.csv > normalized.csv
//! cargo run -- validate accounts.txt --content-type text/plain
//! ```
//!
//! `serve` starts the HTTP server over an in-memory store, optionally seeded
//! from a file. `validate` parses a file the way an upload would and writes
//! the resulting accounts to stdout as CSV.
//!
//! Logs go to stderr; set `RUST_LOG` to change the level (default `info`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid file, file not found, address in use, etc.)

use account_ledger::cli::{self, CliArgs, Command, ServeArgs};
use account_ledger::config::ServiceConfig;
use account_ledger::core::{AccountStore, InMemoryAccountStore};
use account_ledger::pipeline;
use account_ledger::types::AppError;
use account_ledger::web::{self, AppState};
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();
    init_logging();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: CliArgs) -> Result<(), AppError> {
    let config = args.to_service_config();

    match &args.command {
        Command::Serve(serve) => serve_accounts(serve, &config),
        Command::Validate(validate) => {
            let mut output = std::io::stdout().lock();
            let count = pipeline::validate_file(
                &validate.input_file,
                validate.content_type.as_deref(),
                &config.ingestion,
                &mut output,
            )?;
            info!(path = %validate.input_file.display(), accounts = count, "File is valid");
            Ok(())
        }
    }
}

fn serve_accounts(args: &ServeArgs, config: &ServiceConfig) -> Result<(), AppError> {
    let server = args.to_server_config();
    let store: Arc<dyn AccountStore> = Arc::new(InMemoryAccountStore::new());
    let state = AppState::new(store, config);

    if let Some(seed) = &args.seed {
        pipeline::import_file(seed, None, &state.ingestor)?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(server.workers)
        .enable_all()
        .build()?;

    runtime.block_on(web::serve(state, server.bind))?;
    Ok(())
}
