//! Protocol client bound to one deployment.

use crate::blockchain::{BlockchainClient, TxBuilder, Wallet};
use crate::superfluid::cfa::ConstantFlowAgreement;
use crate::superfluid::networks::ProtocolAddresses;
use crate::superfluid::types::FlowError;

/// Connected protocol deployment.
#[derive(Debug, Clone)]
pub struct Framework {
    client: BlockchainClient,
    protocol: ProtocolAddresses,
}

impl Framework {
    /// Connect to the deployment described by `protocol`.
    ///
    /// Fails if the RPC endpoint serves a different chain.
    pub async fn create(
        client: BlockchainClient,
        protocol: ProtocolAddresses,
    ) -> Result<Self, FlowError> {
        client.verify_chain_id().await?;

        tracing::info!(
            network = %protocol.network,
            chain_id = protocol.chain_id,
            host = %protocol.host,
            cfa_v1 = %protocol.cfa_v1,
            "Framework connected"
        );

        Ok(Self { client, protocol })
    }

    /// Signer that submits transactions from `wallet`.
    pub fn create_signer(&self, wallet: Wallet) -> TxBuilder {
        TxBuilder::new(self.client.clone(), wallet)
    }

    /// Constant flow agreement v1.
    pub fn cfa_v1(&self) -> ConstantFlowAgreement {
        ConstantFlowAgreement::new(self.client.clone(), self.protocol.clone())
    }
}
