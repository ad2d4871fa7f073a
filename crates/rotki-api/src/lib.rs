// rotki-api: Async Rust client for the rotki backend REST API

mod blockchain;
pub mod client;
mod defi;
pub mod error;
pub mod models;
mod tasks;
pub mod transport;

pub use client::RotkiClient;
pub use error::Error;
pub use models::{AccountEntry, AsyncTask, TaskList, TaskStatus, TaskStatusResponse, UserSettings};
pub use transport::TransportConfig;
