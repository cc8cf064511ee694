//! Constant flow agreement operations.
//!
//! # Data Flow
//! ```text
//! CreateFlowParams (strings from config/CLI)
//!     → create_flow() validates and encodes, no network access
//!     → CreateFlowOperation::exec(signer)
//!         → TxBuilder::build (nonce, gas)  → host.callAgreement(cfa, createFlow(..), userData)
//!         → sign → broadcast once → optional confirmation wait
//!     → FlowResult
//! ```

use std::str::FromStr;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;

use crate::blockchain::{BlockchainClient, ConfirmationStatus, TxBuilder};
use crate::superfluid::abi::{IConstantFlowAgreementV1, ISuperfluid};
use crate::superfluid::flow_rate::FlowRate;
use crate::superfluid::networks::ProtocolAddresses;
use crate::superfluid::types::{FlowError, FlowInfo, FlowResult, FlowStatus};

/// Inputs of a create-flow request, as supplied by the user.
#[derive(Debug, Clone)]
pub struct CreateFlowParams {
    pub super_token: String,
    pub receiver: String,
    /// Per-second rate as a decimal string.
    pub flow_rate: String,
    /// Optional hex user data forwarded to the agreement.
    pub user_data: Option<String>,
}

/// How to execute an operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    /// Sign but do not broadcast.
    pub dry_run: bool,
    /// Wait for the configured confirmations after broadcasting.
    pub wait: bool,
}

/// Entry point for constant flow agreement calls on one deployment.
#[derive(Debug, Clone)]
pub struct ConstantFlowAgreement {
    client: BlockchainClient,
    protocol: ProtocolAddresses,
}

impl ConstantFlowAgreement {
    pub(crate) fn new(client: BlockchainClient, protocol: ProtocolAddresses) -> Self {
        Self { client, protocol }
    }

    /// Validate parameters and prepare a create-flow operation.
    pub fn create_flow(&self, params: CreateFlowParams) -> Result<CreateFlowOperation, FlowError> {
        let super_token = parse_address("super token", &params.super_token)?;
        let receiver = parse_address("receiver", &params.receiver)?;
        let flow_rate = FlowRate::parse(&params.flow_rate)?;
        let user_data = match params.user_data.as_deref() {
            Some(hex) => Bytes::from(
                alloy::hex::decode(hex).map_err(|e| FlowError::InvalidUserData(e.to_string()))?,
            ),
            None => Bytes::new(),
        };

        let inner = IConstantFlowAgreementV1::createFlowCall {
            token: super_token,
            receiver,
            flowRate: flow_rate.to_i96()?,
            ctx: Bytes::new(),
        };
        let outer = ISuperfluid::callAgreementCall {
            agreementClass: self.protocol.cfa_v1,
            callData: inner.abi_encode().into(),
            userData: user_data,
        };

        Ok(CreateFlowOperation {
            protocol: self.protocol.clone(),
            super_token,
            receiver,
            flow_rate,
            calldata: outer.abi_encode().into(),
        })
    }

    /// Read the current flow between `sender` and `receiver`.
    pub async fn get_flow(
        &self,
        super_token: &str,
        sender: &str,
        receiver: &str,
    ) -> Result<FlowInfo, FlowError> {
        let super_token = parse_address("super token", super_token)?;
        let sender = parse_address("sender", sender)?;
        let receiver = parse_address("receiver", receiver)?;

        let call = IConstantFlowAgreementV1::getFlowCall {
            token: super_token,
            sender,
            receiver,
        };
        let request = TransactionRequest::default()
            .with_to(self.protocol.cfa_v1)
            .with_input(Bytes::from(call.abi_encode()));

        let output = self.client.call(&request).await?;
        let decoded = IConstantFlowAgreementV1::getFlowCall::abi_decode_returns(&output)
            .map_err(|_| FlowError::Decode("getFlow"))?;

        Ok(FlowInfo {
            super_token,
            sender,
            receiver,
            timestamp: decoded.timestamp,
            flow_rate: decoded.flowRate.to_string(),
            deposit: decoded.deposit,
            owed_deposit: decoded.owedDeposit,
        })
    }
}

/// A validated, encoded create-flow call ready to execute.
#[derive(Debug, Clone)]
pub struct CreateFlowOperation {
    protocol: ProtocolAddresses,
    super_token: Address,
    receiver: Address,
    flow_rate: FlowRate,
    calldata: Bytes,
}

impl CreateFlowOperation {
    /// Encoded `callAgreement` call sent to the host.
    pub fn calldata(&self) -> &Bytes {
        &self.calldata
    }

    pub fn receiver(&self) -> Address {
        self.receiver
    }

    pub fn super_token(&self) -> Address {
        self.super_token
    }

    pub fn flow_rate(&self) -> FlowRate {
        self.flow_rate
    }

    /// Sign and (unless dry-running) broadcast the operation once.
    pub async fn exec(&self, signer: &TxBuilder, options: ExecOptions) -> Result<FlowResult, FlowError> {
        let sender = signer.address();
        if sender == self.receiver {
            return Err(FlowError::SelfFlow(sender));
        }

        let request = signer.build(self.protocol.host, self.calldata.clone()).await?;
        let nonce = request.nonce.unwrap_or_default();
        let gas_limit = request.gas.unwrap_or_default();
        let gas_price = request.gas_price.unwrap_or_default();

        let (tx_hash, status) = if options.dry_run {
            let signed = signer.sign(request).await?;
            tracing::info!(tx_hash = %signed.hash, "Dry run: transaction signed, not sent");
            let raw_transaction = alloy::hex::encode_prefixed(&signed.raw);
            (signed.hash, FlowStatus::Simulated { raw_transaction })
        } else {
            let tx_hash = signer.send(request).await?;
            let status = if options.wait {
                let timeout_secs = signer.client().config().confirmation_timeout_secs;
                match signer.wait_for_confirmation(tx_hash, timeout_secs).await {
                    Ok(ConfirmationStatus::Confirmed { block_number }) => {
                        FlowStatus::Confirmed { block_number }
                    }
                    Ok(ConfirmationStatus::Failed(reason)) => FlowStatus::Reverted { reason },
                    Ok(ConfirmationStatus::Confirming { .. }) => FlowStatus::Submitted,
                    // Already broadcast: report the hash rather than losing it.
                    Err(e) => {
                        tracing::warn!(
                            tx_hash = %tx_hash,
                            error = %e,
                            "Transaction sent but confirmation unknown"
                        );
                        FlowStatus::Submitted
                    }
                }
            } else {
                FlowStatus::Submitted
            };
            (tx_hash, status)
        };

        Ok(FlowResult {
            tx_hash,
            status,
            network: self.protocol.network.clone(),
            chain_id: self.protocol.chain_id,
            sender,
            receiver: self.receiver,
            super_token: self.super_token,
            host: self.protocol.host,
            flow_rate: self.flow_rate.to_string(),
            nonce,
            gas_limit,
            gas_price,
        })
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, FlowError> {
    Address::from_str(value.trim()).map_err(|_| FlowError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}
