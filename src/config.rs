use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use clap::Parser;

/// Runtime settings, read from flags or the environment (a `.env` file is
/// loaded first when present).
#[derive(Debug, Clone, Parser)]
#[command(name = "persons-api", version, about = "Person records REST API")]
pub struct Config {
    /// API server port
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// CSV file imported once at startup
    #[arg(long = "csv", env = "CSV_PATH")]
    pub csv_path: Option<String>,

    /// PostgreSQL connection URL; the in-memory store is used when unset
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Seconds to wait for in-flight requests on shutdown
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 5)]
    pub shutdown_grace_secs: u64,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn csv_path(&self) -> Option<&Path> {
        self.csv_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(Path::new)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
