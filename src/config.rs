//! Runtime configuration
//!
//! Configuration is assembled from command-line arguments (see [`crate::cli`])
//! into plain structs that the ingestion pipeline, the transfer engine and the
//! web server receive explicitly.

use std::net::SocketAddr;
use tracing::warn;

/// Default address the HTTP server binds to
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Options controlling which uploads are accepted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestionConfig {
    /// Accept tab-delimited `text/plain` uploads next to CSV
    pub accept_tab_delimited: bool,
    /// Match header names ignoring ASCII case
    pub case_insensitive_headers: bool,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            accept_tab_delimited: true,
            case_insensitive_headers: false,
        }
    }
}

/// Options controlling the transfer engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferConfig {
    /// How many times a transfer that lost a write race is re-attempted
    ///
    /// Zero means a single attempt with no retry.
    pub max_retries: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

/// Configuration for the business operations
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub ingestion: IngestionConfig,
    pub transfer: TransferConfig,
}

/// Configuration for the HTTP server process
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: SocketAddr,
    /// Number of tokio worker threads
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            workers: num_cpus::get(),
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig, falling back to defaults for invalid values
    pub fn new(bind: SocketAddr, workers: usize) -> Self {
        let default = Self::default();

        let workers = if workers == 0 {
            warn!(
                workers,
                default = default.workers,
                "Invalid worker count, using default"
            );
            default.workers
        } else {
            workers
        };

        Self { bind, workers }
    }
}
