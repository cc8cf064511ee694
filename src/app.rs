//! Run orchestration.
//!
//! `connect` performs setup in dependency order: provider, wallet,
//! framework, signer. Errors there abort the run. Flow operations
//! are issued afterwards through the returned [`Session`];
//! [`run_create`] wraps both steps for the default command.

use alloy::primitives::Address;

use crate::blockchain::{BlockchainClient, TxBuilder, Wallet};
use crate::config::{AppConfig, Secrets};
use crate::error::AppResult;
use crate::superfluid::flow_rate::format_units;
use crate::superfluid::{
    CreateFlowParams, ExecOptions, FlowError, FlowInfo, FlowResult, Framework, ProtocolAddresses,
};

/// Per-invocation overrides for a create-flow run.
#[derive(Debug, Clone, Default)]
pub struct CreateFlowArgs {
    pub receiver: Option<String>,
    pub super_token: Option<String>,
    pub flow_rate: Option<String>,
    pub user_data: Option<String>,
    pub dry_run: bool,
    pub wait: bool,
}

/// Per-invocation overrides for a flow query.
#[derive(Debug, Clone, Default)]
pub struct GetFlowArgs {
    /// Defaults to the wallet address.
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub super_token: Option<String>,
}

/// A connected framework plus the signer for the configured wallet.
#[derive(Debug)]
pub struct Session {
    config: AppConfig,
    env_receiver: Option<String>,
    framework: Framework,
    signer: TxBuilder,
}

/// Build provider, wallet, framework and signer.
pub async fn connect(config: &AppConfig, secrets: &Secrets) -> AppResult<Session> {
    let protocol = ProtocolAddresses::resolve(&config.network)?;
    let endpoint = protocol.rpc_endpoint(
        config.network.rpc_url.as_deref(),
        secrets.infura_api_key.as_deref(),
        &config.network.infura_api_key_env,
    )?;

    let client = BlockchainClient::new(config.blockchain.clone(), endpoint, protocol.chain_id).await?;
    let wallet = Wallet::from_private_key(&secrets.private_key, client.chain_id())?;
    let framework = Framework::create(client, protocol).await?;
    let signer = framework.create_signer(wallet);

    let transaction_count = signer.transaction_count().await?;
    tracing::info!(
        address = %signer.address(),
        transaction_count = transaction_count,
        "Signer ready"
    );

    Ok(Session {
        config: config.clone(),
        env_receiver: secrets.receiver.clone(),
        framework,
        signer,
    })
}

/// Set up a session and open one flow.
///
/// Setup failures are returned. A failure of the flow operation itself is
/// logged, reported on stderr and yields `Ok(None)`.
pub async fn run_create(
    config: &AppConfig,
    secrets: &Secrets,
    args: &CreateFlowArgs,
) -> AppResult<Option<FlowResult>> {
    let session = connect(config, secrets).await?;

    match session.create_flow(args).await {
        Ok(result) => Ok(Some(result)),
        Err(e) => {
            tracing::error!(error = %e, "Flow creation failed");
            eprintln!("error: {}", e);
            Ok(None)
        }
    }
}

impl Session {
    /// Address flows are opened from.
    pub fn sender(&self) -> Address {
        self.signer.address()
    }

    /// Open a flow from the wallet to the receiver.
    ///
    /// Sends at most one transaction.
    pub async fn create_flow(&self, args: &CreateFlowArgs) -> AppResult<FlowResult> {
        let flow = &self.config.flow;
        let receiver = self.receiver(args.receiver.as_deref())?;

        let params = CreateFlowParams {
            super_token: args.super_token.clone().unwrap_or_else(|| flow.super_token.clone()),
            receiver,
            flow_rate: args.flow_rate.clone().unwrap_or_else(|| flow.flow_rate.clone()),
            user_data: args.user_data.clone().or_else(|| flow.user_data.clone()),
        };

        let operation = self.framework.cfa_v1().create_flow(params)?;
        let rate = operation.flow_rate();

        tracing::info!(
            receiver = %operation.receiver(),
            super_token = %operation.super_token(),
            flow_rate = %rate,
            per_month = %format_units(rate.per_month(), 18),
            dry_run = args.dry_run,
            "Creating the stream..."
        );

        let options = ExecOptions {
            dry_run: args.dry_run,
            wait: args.wait,
        };
        let result = operation.exec(&self.signer, options).await?;

        tracing::info!(tx_hash = %result.tx_hash, status = ?result.status, "Flow operation finished");
        Ok(result)
    }

    /// Read the flow between sender (default: wallet) and receiver.
    pub async fn get_flow(&self, args: &GetFlowArgs) -> AppResult<FlowInfo> {
        let receiver = self.receiver(args.receiver.as_deref())?;
        let sender = args
            .sender
            .clone()
            .unwrap_or_else(|| self.sender().to_string());
        let super_token = args
            .super_token
            .clone()
            .unwrap_or_else(|| self.config.flow.super_token.clone());

        let info = self
            .framework
            .cfa_v1()
            .get_flow(&super_token, &sender, &receiver)
            .await?;

        tracing::info!(
            sender = %info.sender,
            receiver = %info.receiver,
            flow_rate = %info.flow_rate,
            active = info.is_active(),
            "Flow fetched"
        );
        Ok(info)
    }

    /// Receiver precedence: explicit argument, config literal, environment.
    fn receiver(&self, explicit: Option<&str>) -> Result<String, FlowError> {
        explicit
            .map(str::to_string)
            .or_else(|| self.config.flow.receiver.clone())
            .or_else(|| self.env_receiver.clone())
            .ok_or(FlowError::MissingReceiver)
    }
}
