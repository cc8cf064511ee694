//! Values read from the environment at startup.
//!
//! # Security
//! - The private key and API key are never logged; `Debug` redacts them
//! - Empty variables are treated as unset

use std::fmt;

use crate::config::loader::ConfigError;
use crate::config::schema::AppConfig;

/// Secrets and per-run values sourced from environment variables.
#[derive(Clone)]
pub struct Secrets {
    /// Infura project key, if present.
    pub infura_api_key: Option<String>,
    /// Hex-encoded signing key.
    pub private_key: String,
    /// Receiver address from the environment, if present.
    pub receiver: Option<String>,
}

impl Secrets {
    /// Read secrets from the process environment.
    pub fn from_env(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Read secrets through an arbitrary lookup function.
    pub fn from_lookup<F>(config: &AppConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let private_key = get(&config.wallet.private_key_env)
            .ok_or_else(|| ConfigError::MissingEnv(config.wallet.private_key_env.clone()))?;

        Ok(Self {
            infura_api_key: get(&config.network.infura_api_key_env),
            private_key,
            receiver: get(&config.flow.receiver_env),
        })
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("infura_api_key", &self.infura_api_key.as_ref().map(|_| "<redacted>"))
            .field("private_key", &"<redacted>")
            .field("receiver", &self.receiver)
            .finish()
    }
}
