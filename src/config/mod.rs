//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional)          config file (TOML, optional)
//!     → process environment         → loader.rs (parse & deserialize)
//!     → secrets.rs (keys,           → validation.rs (semantic checks)
//!       receiver)                   → AppConfig (validated, immutable)
//!                 ╲               ╱
//!                  CLI overrides applied in main.rs
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow running without a config file
//! - Secrets stay out of `AppConfig` so the config can be logged freely
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod secrets;
pub mod validation;

pub use loader::ConfigError;
pub use schema::AppConfig;
pub use schema::BlockchainConfig;
pub use schema::FlowConfig;
pub use schema::NetworkConfig;
pub use secrets::Secrets;
