use crate::{
    booking_store::{Latency, DEFAULT_STORAGE_KEY},
    configuration::Configuration,
};
use clap::Parser;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Parser)]
#[command(name = "venue_booking", about = "Sports venue reservation backend")]
pub struct ConfigurationHandler {
    /// Port the HTTP server listens on
    #[arg(short, long, env = "VENUE_BOOKING_PORT", default_value = "3000")]
    port: u16,

    /// Directory for the persisted dataset. Data is kept in memory only when unset.
    #[arg(long, env = "VENUE_BOOKING_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Key the dataset blob is stored under
    #[arg(long, env = "VENUE_BOOKING_STORAGE_KEY", default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,

    /// Simulated latency of read calls in milliseconds
    #[arg(long, env = "VENUE_BOOKING_READ_LATENCY_MS", default_value_t = 300)]
    read_latency_ms: u64,

    /// Simulated latency of write calls in milliseconds
    #[arg(long, env = "VENUE_BOOKING_WRITE_LATENCY_MS", default_value_t = 500)]
    write_latency_ms: u64,
}

impl ConfigurationHandler {
    /// Loads `.env` if present, then parses command line and environment.
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> String {
        self.port.to_string()
    }

    fn storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir.clone()
    }

    fn storage_key(&self) -> String {
        self.storage_key.clone()
    }

    fn latency(&self) -> Latency {
        Latency {
            read: Duration::from_millis(self.read_latency_ms),
            write: Duration::from_millis(self.write_latency_ms),
        }
    }
}
