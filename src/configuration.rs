use crate::booking_store::Latency;
use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> String;
    fn storage_dir(&self) -> Option<PathBuf>;
    fn storage_key(&self) -> String;
    fn latency(&self) -> Latency;
}
