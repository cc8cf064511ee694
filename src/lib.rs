//! Superfluid constant-flow client library.

pub mod app;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod observability;
pub mod superfluid;

pub use app::{connect, run_create, CreateFlowArgs, GetFlowArgs, Session};
pub use config::AppConfig;
pub use error::AppError;
