use crate::config::{
    IngestionConfig, ServerConfig, ServiceConfig, TransferConfig, DEFAULT_BIND,
};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Ingest account files and transfer balances between accounts
#[derive(Parser, Debug)]
#[command(name = "account-ledger")]
#[command(about = "Ingest account files and transfer balances between accounts", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Reject tab-delimited text uploads, accepting CSV only
    #[arg(long = "no-tab-delimited", global = true)]
    pub no_tab_delimited: bool,

    /// Match the ID, Name and Balance headers ignoring case
    #[arg(long = "case-insensitive-headers", global = true)]
    pub case_insensitive_headers: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Parse a file and print the accounts it would create as CSV
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long = "bind", value_name = "ADDR", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Account file loaded into the store before serving
    #[arg(long = "seed", value_name = "FILE")]
    pub seed: Option<PathBuf>,

    /// Retries for a transfer that lost a concurrent write race
    #[arg(
        long = "max-retries",
        value_name = "COUNT",
        help = "Retries for a transfer that lost a concurrent write race (default: 3)"
    )]
    pub max_retries: Option<u32>,

    /// Number of runtime worker threads
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Account file to validate
    #[arg(value_name = "FILE")]
    pub input_file: PathBuf,

    /// Content type of the file; inferred from the extension when omitted
    #[arg(long = "content-type", value_name = "TYPE")]
    pub content_type: Option<String>,
}

impl CliArgs {
    /// Upload acceptance options from the global flags
    pub fn to_ingestion_config(&self) -> IngestionConfig {
        IngestionConfig {
            accept_tab_delimited: !self.no_tab_delimited,
            case_insensitive_headers: self.case_insensitive_headers,
        }
    }

    /// Business configuration for the selected command
    ///
    /// Only `serve` carries transfer options; other commands use defaults.
    pub fn to_service_config(&self) -> ServiceConfig {
        let transfer = match &self.command {
            Command::Serve(serve) => serve.to_transfer_config(),
            Command::Validate(_) => TransferConfig::default(),
        };

        ServiceConfig {
            ingestion: self.to_ingestion_config(),
            transfer,
        }
    }
}

impl ServeArgs {
    /// Create a TransferConfig from CLI arguments
    pub fn to_transfer_config(&self) -> TransferConfig {
        match self.max_retries {
            Some(max_retries) => TransferConfig { max_retries },
            None => TransferConfig::default(),
        }
    }

    /// Create a ServerConfig from CLI arguments
    ///
    /// A zero worker count falls back to the default with a warning.
    pub fn to_server_config(&self) -> ServerConfig {
        match self.workers {
            Some(workers) => ServerConfig::new(self.bind, workers),
            None => ServerConfig {
                bind: self.bind,
                ..ServerConfig::default()
            },
        }
    }
}
