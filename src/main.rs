use std::sync::Arc;

use crate::{
    backend::StorageBackend,
    booking_store::BookingStore,
    configuration::Configuration,
    configuration_handler::ConfigurationHandler,
    file_storage::FileStorage,
    http::create_app,
    local_storage::MemoryStorage,
};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod backend;
mod booking_store;
mod configuration;
mod configuration_handler;
mod error;
mod file_storage;
mod http;
mod local_storage;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("#################");
    println!("# Venue Booking #");
    println!("#################");

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    println!("Accessable at:\n{}", address.clone());
    let listener = TcpListener::bind(address).await?;

    let app = if let Some(storage_dir) = configuration.storage_dir() {
        let storage = FileStorage::new(storage_dir)?;
        info!(directory = %storage.directory().display(), "Persisting bookings to disk");
        create_app(open_store(storage, &configuration).await?)
    } else {
        warn!("No storage directory configured, bookings are kept in memory only");
        create_app(open_store(MemoryStorage::default(), &configuration).await?)
    };

    axum::serve(listener, app).await?;
    Ok(())
}

async fn open_store<S: StorageBackend, C: Configuration>(
    storage: S,
    configuration: &C,
) -> Result<Arc<BookingStore<S>>, error::BookingError> {
    let booking_store = BookingStore::new(
        storage,
        configuration.storage_key(),
        configuration.latency(),
    );
    booking_store.initialize().await?;
    Ok(Arc::new(booking_store))
}
