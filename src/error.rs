//! Top-level error type.

use thiserror::Error;

use crate::blockchain::BlockchainError;
use crate::config::ConfigError;
use crate::superfluid::FlowError;

/// Any failure surfaced by a flow-stream run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    #[error(transparent)]
    Flow(#[from] FlowError),
}

pub type AppResult<T> = Result<T, AppError>;
