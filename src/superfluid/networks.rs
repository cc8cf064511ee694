//! Known protocol deployments.
//!
//! Resolves a network name to its chain ID, Infura subdomain and the
//! protocol contract addresses, with per-field overrides from configuration.

use std::str::FromStr;

use alloy::primitives::{address, Address};

use crate::config::schema::NetworkConfig;
use crate::config::ConfigError;

/// A protocol deployment on one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Canonical network name.
    pub name: &'static str,
    /// EIP-155 chain ID.
    pub chain_id: u64,
    /// Infura host prefix (`<subdomain>.infura.io`).
    pub infura_subdomain: &'static str,
    /// Protocol host contract.
    pub host: Address,
    /// Constant flow agreement v1 contract.
    pub cfa_v1: Address,
}

pub const KOVAN: NetworkInfo = NetworkInfo {
    name: "kovan",
    chain_id: 42,
    infura_subdomain: "kovan",
    host: address!("f0d7d1d47109ba426b9d8a3cde1941327af1eea3"),
    cfa_v1: address!("eca8056809e7e8db04a8ff6e4e82cd889a46fe2f"),
};

pub const GOERLI: NetworkInfo = NetworkInfo {
    name: "goerli",
    chain_id: 5,
    infura_subdomain: "goerli",
    host: address!("22ff293e14f1ec3a09b137e9e06084afd63addf9"),
    cfa_v1: address!("ed6bcbf6907d4feeee8a8875543249bea9d308e8"),
};

pub const MUMBAI: NetworkInfo = NetworkInfo {
    name: "mumbai",
    chain_id: 80001,
    infura_subdomain: "polygon-mumbai",
    host: address!("eb796bdb90ffa0f28255275e16936d25d3418603"),
    cfa_v1: address!("49e565ed1bdc17f3d220f72df0857c26fa83f873"),
};

pub const MATIC: NetworkInfo = NetworkInfo {
    name: "matic",
    chain_id: 137,
    infura_subdomain: "polygon-mainnet",
    host: address!("3e14dc1b13c488a8d5d310918780c983bd5982e7"),
    cfa_v1: address!("6eee6060f715257b970700bc2656de21dedf074c"),
};

/// All built-in deployments.
pub const NETWORKS: &[NetworkInfo] = &[KOVAN, GOERLI, MUMBAI, MATIC];

/// Look up a deployment by name (case-insensitive).
pub fn lookup(name: &str) -> Option<&'static NetworkInfo> {
    let name = name.trim();
    NETWORKS.iter().find(|n| n.name.eq_ignore_ascii_case(name))
}

/// Protocol addresses and chain selected for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolAddresses {
    pub network: String,
    pub chain_id: u64,
    pub host: Address,
    pub cfa_v1: Address,
    /// Infura subdomain, when the network is a known deployment.
    pub infura_subdomain: Option<String>,
}

impl ProtocolAddresses {
    /// Resolve the registry entry for `config.name` and apply overrides.
    pub fn resolve(config: &NetworkConfig) -> Result<Self, ConfigError> {
        let known = lookup(&config.name);

        let parse = |field: &str, value: &Option<String>| -> Result<Option<Address>, ConfigError> {
            value
                .as_deref()
                .map(|v| {
                    Address::from_str(v).map_err(|e| {
                        ConfigError::Invalid(format!("network.{}: {}", field, e))
                    })
                })
                .transpose()
        };
        let host_override = parse("host_address", &config.host_address)?;
        let cfa_override = parse("cfa_address", &config.cfa_address)?;

        let unknown = || ConfigError::Invalid(format!("unknown network '{}'", config.name));

        let chain_id = config
            .chain_id
            .or(known.map(|n| n.chain_id))
            .ok_or_else(unknown)?;
        let host = host_override.or(known.map(|n| n.host)).ok_or_else(unknown)?;
        let cfa_v1 = cfa_override.or(known.map(|n| n.cfa_v1)).ok_or_else(unknown)?;

        Ok(Self {
            network: known.map(|n| n.name.to_string()).unwrap_or_else(|| config.name.clone()),
            chain_id,
            host,
            cfa_v1,
            infura_subdomain: known.map(|n| n.infura_subdomain.to_string()),
        })
    }

    /// JSON-RPC endpoint: the explicit URL if given, else Infura.
    pub fn rpc_endpoint(
        &self,
        rpc_url: Option<&str>,
        infura_api_key: Option<&str>,
        api_key_env: &str,
    ) -> Result<url::Url, ConfigError> {
        let raw = match rpc_url {
            Some(url) => url.to_string(),
            None => {
                let subdomain = self.infura_subdomain.as_deref().ok_or_else(|| {
                    ConfigError::Invalid(format!(
                        "network '{}' has no Infura endpoint; set network.rpc_url",
                        self.network
                    ))
                })?;
                let key = infura_api_key
                    .ok_or_else(|| ConfigError::MissingEnv(api_key_env.to_string()))?;
                format!("https://{}.infura.io/v3/{}", subdomain, key)
            }
        };

        url::Url::parse(&raw).map_err(|e| ConfigError::Invalid(format!("RPC URL: {}", e)))
    }
}
