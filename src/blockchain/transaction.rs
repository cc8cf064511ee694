//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Build transactions with node gas estimation
//! - Sign locally and broadcast once
//! - Monitor confirmations
//!
//! A rejected or timed-out broadcast is returned to the caller without retry.

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ConfirmationStatus, SignedTransaction,
};
use crate::blockchain::wallet::Wallet;

/// Signs and submits transactions on behalf of one wallet.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: BlockchainClient,
    wallet: Wallet,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(client: BlockchainClient, wallet: Wallet) -> Self {
        Self { client, wallet }
    }

    /// Current pending transaction count (next nonce) of the wallet.
    pub async fn transaction_count(&self) -> BlockchainResult<u64> {
        self.client.get_transaction_count(self.wallet.address()).await
    }

    /// Build a contract call with nonce, gas price and gas limit filled in.
    ///
    /// # Arguments
    /// * `to` - Destination contract
    /// * `data` - ABI-encoded call data
    pub async fn build(&self, to: Address, data: Bytes) -> BlockchainResult<TransactionRequest> {
        let from = self.wallet.address();
        let nonce = self.client.get_transaction_count(from).await?;

        // Get gas price
        let gas_price = self.client.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;

        // Check against max gas price
        let config = self.client.config();
        if gas_price_gwei > config.max_gas_price_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: config.max_gas_price_gwei,
            });
        }

        let adjusted_gas_price = (gas_price as f64 * config.gas_price_multiplier) as u128;

        let call = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);

        let estimate = self.client.estimate_gas(&call).await?;
        let gas_limit = (estimate as f64 * config.gas_limit_multiplier).ceil() as u64;

        tracing::debug!(
            nonce = nonce,
            gas_price = adjusted_gas_price,
            gas_estimate = estimate,
            gas_limit = gas_limit,
            "Transaction built"
        );

        Ok(call
            .with_nonce(nonce)
            .with_gas_price(adjusted_gas_price)
            .with_chain_id(self.wallet.chain_id())
            .with_gas_limit(gas_limit))
    }

    /// Sign a fully populated transaction request.
    pub async fn sign(&self, request: TransactionRequest) -> BlockchainResult<SignedTransaction> {
        let envelope = request
            .build(&self.wallet.ethereum_wallet())
            .await
            .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;

        let raw = envelope.encoded_2718();
        let hash = keccak256(&raw);
        Ok(SignedTransaction { raw, hash })
    }

    /// Sign and broadcast a transaction. Returns the transaction hash.
    pub async fn send(&self, request: TransactionRequest) -> BlockchainResult<TxHash> {
        let signed = self.sign(request).await?;
        let tx_hash = self.client.send_raw_transaction(&signed.raw).await?;

        if tx_hash != signed.hash {
            tracing::warn!(
                local = %signed.hash,
                remote = %tx_hash,
                "Node returned a different transaction hash"
            );
        }

        tracing::info!(tx_hash = %tx_hash, "Transaction broadcast");
        Ok(tx_hash)
    }

    /// Wait for a transaction to be confirmed.
    ///
    /// # Arguments
    /// * `tx_hash` - Transaction hash to monitor
    /// * `timeout_secs` - Maximum time to wait for confirmation
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        timeout_secs: u64,
    ) -> BlockchainResult<ConfirmationStatus> {
        let required_confirmations = self.client.confirmation_blocks();
        let timeout_duration = Duration::from_secs(timeout_secs);
        let poll_interval = Duration::from_secs(2);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Ok(ConfirmationStatus::Failed(
                        "Transaction reverted".to_string(),
                    ));
                }

                let current_block = self.client.get_block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);
                // The inclusion block itself counts as the first confirmation
                let confirmations = (current_block.saturating_sub(tx_block) + 1) as u32;

                let status = if confirmations >= required_confirmations {
                    ConfirmationStatus::Confirmed {
                        block_number: tx_block,
                    }
                } else {
                    ConfirmationStatus::Confirming {
                        current: confirmations,
                        required: required_confirmations,
                    }
                };

                match status {
                    ConfirmationStatus::Confirming { current, required } => {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            confirmations = current,
                            required = required,
                            "Waiting for confirmations"
                        );
                    }
                    done => return Ok(done),
                }
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(BlockchainError::ConfirmationTimeout(timeout_secs)),
        }
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Get the underlying client.
    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }
}
