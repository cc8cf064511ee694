//! flow-stream: open a constant token stream from a wallet to a receiver.
//!
//! ```text
//!   config (.env, TOML, CLI)
//!       │
//!       ▼
//!   provider ──▶ wallet ──▶ framework ──▶ signer        setup: errors exit non-zero
//!                                           │
//!                                           ▼
//!                         create-flow operation ──▶ exec  errors are logged, exit 0
//!                                           │
//!                                           ▼
//!                                   result (JSON on stdout)
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::Instrument;
use uuid::Uuid;

use flow_stream::app::{self, CreateFlowArgs, GetFlowArgs};
use flow_stream::config::{self, AppConfig, Secrets};
use flow_stream::observability;

#[derive(Parser)]
#[command(name = "flow-stream")]
#[command(about = "Open a constant token stream on the Superfluid protocol", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network name (overrides config)
    #[arg(long)]
    network: Option<String>,

    /// JSON-RPC endpoint (overrides config and Infura)
    #[arg(long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a flow from the wallet to the receiver (default)
    Create(CreateCommand),
    /// Show the current flow between two accounts
    Get(GetCommand),
}

#[derive(Args, Default)]
struct CreateCommand {
    /// Receiver address
    #[arg(long)]
    receiver: Option<String>,

    /// Super token address
    #[arg(long)]
    token: Option<String>,

    /// Flow rate in wei per second
    #[arg(long)]
    flow_rate: Option<String>,

    /// Hex user data passed to the agreement
    #[arg(long)]
    user_data: Option<String>,

    /// Sign the transaction but do not send it
    #[arg(long)]
    dry_run: bool,

    /// Wait for confirmation after sending
    #[arg(long)]
    wait: bool,
}

#[derive(Args)]
struct GetCommand {
    /// Sender address (defaults to the wallet)
    #[arg(long)]
    sender: Option<String>,

    /// Receiver address
    #[arg(long)]
    receiver: Option<String>,

    /// Super token address
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::loader::load(cli.config.as_deref())?;
    if let Some(network) = cli.network {
        config.network.name = network;
    }
    if let Some(rpc_url) = cli.rpc_url {
        config.network.rpc_url = Some(rpc_url);
    }

    observability::logging::init(&config.logging);

    match config::loader::load_dotenv(None) {
        Ok(Some(path)) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Create(CreateCommand::default()));

    let span = tracing::info_span!("run", run_id = %Uuid::new_v4());
    run(config, command).instrument(span).await
}

async fn run(config: AppConfig, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(network = %config.network.name, "flow-stream v0.1.0 starting");

    let secrets = Secrets::from_env(&config)?;

    match command {
        Commands::Create(cmd) => {
            let args = CreateFlowArgs {
                receiver: cmd.receiver,
                super_token: cmd.token,
                flow_rate: cmd.flow_rate,
                user_data: cmd.user_data,
                dry_run: cmd.dry_run,
                wait: cmd.wait,
            };

            if let Some(result) = app::run_create(&config, &secrets, &args).await? {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
        Commands::Get(cmd) => {
            let args = GetFlowArgs {
                sender: cmd.sender,
                receiver: cmd.receiver,
                super_token: cmd.token,
            };
            let session = app::connect(&config, &secrets).await?;
            let info = session.get_flow(&args).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
