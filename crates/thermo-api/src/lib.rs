// thermo-api: Async Rust client for the BoilerIO heating scheduler web API

pub mod client;
pub mod error;
pub mod models;
pub mod overrides;
pub mod schedule;
pub mod summary;
pub mod transport;

pub use client::SchedulerClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
