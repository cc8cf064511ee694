//! Configuration schema definitions.
//!
//! Every section defaults to the values of the stock kovan DAIx stream, so an
//! empty config file (or none at all) behaves exactly like the bare tool.

use serde::{Deserialize, Serialize};

/// Default super token: DAIx on kovan.
pub const DEFAULT_SUPER_TOKEN: &str = "0xe3cb950cb164a31c66e32c320a800d477019dcff";

/// Default flow rate in wei per second.
pub const DEFAULT_FLOW_RATE: &str = "29400000000000";

/// Root configuration for a flow-stream run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Target network and protocol addresses.
    pub network: NetworkConfig,

    /// RPC and transaction settings.
    pub blockchain: BlockchainConfig,

    /// Signing key source.
    pub wallet: WalletConfig,

    /// Flow parameters.
    pub flow: FlowConfig,

    /// Log output.
    pub logging: LoggingConfig,
}

/// Network selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Network name as known to the protocol registry (e.g. "kovan").
    pub name: String,

    /// Explicit JSON-RPC endpoint. When unset an Infura URL is derived.
    pub rpc_url: Option<String>,

    /// Environment variable holding the Infura API key.
    pub infura_api_key_env: String,

    /// Chain ID override (required for networks missing from the registry).
    pub chain_id: Option<u64>,

    /// Protocol host contract override.
    pub host_address: Option<String>,

    /// Constant flow agreement contract override.
    pub cfa_address: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "kovan".to_string(),
            rpc_url: None,
            infura_api_key_env: "INFURA_API_KEY".to_string(),
            chain_id: None,
            host_address: None,
            cfa_address: None,
        }
    }
}

/// Blockchain RPC and transaction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Failover JSON-RPC endpoint URLs (read-only calls only).
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of block confirmations required when waiting for a receipt.
    pub confirmation_blocks: u32,

    /// Maximum time to wait for confirmation in seconds.
    pub confirmation_timeout_secs: u64,

    /// Gas price multiplier (1.0 = node quote, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Multiplier applied to the node's gas estimate.
    pub gas_limit_multiplier: f64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            gas_price_multiplier: 1.0,
            max_gas_price_gwei: 500,
            gas_limit_multiplier: 1.2,
        }
    }
}

/// Where the signing key comes from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Environment variable holding the hex private key.
    pub private_key_env: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_key_env: "REAL_TEST_ACCOUNT_PRIVATE_KEY".to_string(),
        }
    }
}

/// Flow parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Super token contract address.
    pub super_token: String,

    /// Flow rate in the token's smallest unit per second, as a decimal string.
    pub flow_rate: String,

    /// Environment variable holding the receiver address.
    pub receiver_env: String,

    /// Literal receiver address; takes precedence over `receiver_env`.
    pub receiver: Option<String>,

    /// Hex user data forwarded to the agreement call.
    pub user_data: Option<String>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            super_token: DEFAULT_SUPER_TOKEN.to_string(),
            flow_rate: DEFAULT_FLOW_RATE.to_string(),
            // Spelling matches the variable existing deployments export.
            receiver_env: "RECIEVER_ADDRESS".to_string(),
            receiver: None,
            user_data: None,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "flow_stream=info".to_string(),
            json: false,
        }
    }
}
