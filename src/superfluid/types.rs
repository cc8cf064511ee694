//! Flow types and error definitions.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Errors raised by protocol operations.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Invalid flow rate: {0}")]
    InvalidFlowRate(String),

    #[error("Invalid {field} address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("Invalid user data: {0}")]
    InvalidUserData(String),

    #[error("No receiver given; set --receiver or the receiver environment variable")]
    MissingReceiver,

    #[error("Sender and receiver are both {0}")]
    SelfFlow(Address),

    #[error("Failed to decode {0} result")]
    Decode(&'static str),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

/// Lifecycle of a create-flow execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FlowStatus {
    /// Signed but not broadcast (dry run).
    Simulated { raw_transaction: String },
    /// Accepted by the node.
    Submitted,
    /// Mined with the required confirmations.
    Confirmed { block_number: u64 },
    /// Mined but reverted.
    Reverted { reason: String },
}

/// Outcome of a create-flow execution.
#[derive(Debug, Clone, Serialize)]
pub struct FlowResult {
    pub tx_hash: TxHash,
    #[serde(flatten)]
    pub status: FlowStatus,
    pub network: String,
    pub chain_id: u64,
    pub sender: Address,
    pub receiver: Address,
    pub super_token: Address,
    pub host: Address,
    /// Per-second rate as a decimal string.
    pub flow_rate: String,
    pub nonce: u64,
    pub gas_limit: u64,
    pub gas_price: u128,
}

/// Current state of a flow between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowInfo {
    pub super_token: Address,
    pub sender: Address,
    pub receiver: Address,
    /// Last update time (unix seconds); zero when no flow exists.
    pub timestamp: U256,
    /// Per-second rate as a decimal string; "0" when no flow exists.
    pub flow_rate: String,
    pub deposit: U256,
    pub owed_deposit: U256,
}

impl FlowInfo {
    /// Whether a flow is currently active.
    pub fn is_active(&self) -> bool {
        self.flow_rate != "0"
    }
}
