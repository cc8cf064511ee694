//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the network can be resolved to protocol addresses
//! - Validate value ranges (timeouts > 0, multipliers >= 1.0)
//! - Check addresses and flow rate are well-formed before any RPC happens
//!
//! Returns all validation errors, not just the first.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;

use crate::config::schema::AppConfig;
use crate::superfluid::flow_rate::FlowRate;
use crate::superfluid::networks;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_network(config, &mut errors);
    validate_blockchain(config, &mut errors);
    validate_flow(config, &mut errors);

    if config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError::new(
            "wallet.private_key_env",
            "must name an environment variable",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_network(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let network = &config.network;

    if network.name.trim().is_empty() {
        errors.push(ValidationError::new("network.name", "must not be empty"));
    }

    for (field, value) in [
        ("network.host_address", &network.host_address),
        ("network.cfa_address", &network.cfa_address),
    ] {
        if let Some(addr) = value {
            if Address::from_str(addr).is_err() {
                errors.push(ValidationError::new(field, format!("invalid address '{}'", addr)));
            }
        }
    }

    if networks::lookup(&network.name).is_none() {
        let complete = network.chain_id.is_some()
            && network.host_address.is_some()
            && network.cfa_address.is_some();
        if !complete {
            errors.push(ValidationError::new(
                "network.name",
                format!(
                    "unknown network '{}'; set chain_id, host_address and cfa_address",
                    network.name
                ),
            ));
        }
    }

    if let Some(url) = &network.rpc_url {
        if url::Url::parse(url).is_err() {
            errors.push(ValidationError::new("network.rpc_url", format!("invalid URL '{}'", url)));
        }
    }
}

fn validate_blockchain(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let chain = &config.blockchain;

    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if chain.confirmation_blocks == 0 {
        errors.push(ValidationError::new("blockchain.confirmation_blocks", "must be >= 1"));
    }
    if chain.gas_price_multiplier < 1.0 {
        errors.push(ValidationError::new("blockchain.gas_price_multiplier", "must be >= 1.0"));
    }
    if chain.gas_limit_multiplier < 1.0 {
        errors.push(ValidationError::new("blockchain.gas_limit_multiplier", "must be >= 1.0"));
    }
    for url in &chain.failover_urls {
        if url::Url::parse(url).is_err() {
            errors.push(ValidationError::new(
                "blockchain.failover_urls",
                format!("invalid URL '{}'", url),
            ));
        }
    }
}

fn validate_flow(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let flow = &config.flow;

    if Address::from_str(&flow.super_token).is_err() {
        errors.push(ValidationError::new(
            "flow.super_token",
            format!("invalid address '{}'", flow.super_token),
        ));
    }

    if let Err(e) = FlowRate::parse(&flow.flow_rate) {
        errors.push(ValidationError::new("flow.flow_rate", e.to_string()));
    }

    if let Some(receiver) = &flow.receiver {
        if Address::from_str(receiver).is_err() {
            errors.push(ValidationError::new(
                "flow.receiver",
                format!("invalid address '{}'", receiver),
            ));
        }
    }

    if let Some(data) = &flow.user_data {
        if alloy::hex::decode(data).is_err() {
            errors.push(ValidationError::new("flow.user_data", "must be hex"));
        }
    }
}
