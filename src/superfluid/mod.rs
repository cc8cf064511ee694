//! Payment-streaming protocol client.
//!
//! # Data Flow
//! ```text
//! network name → networks.rs (chain id, host, CFA addresses)
//!     → framework.rs (chain check, signer, agreement handles)
//!     → cfa.rs (create / read flows)
//!         → abi.rs (host and agreement call encoding)
//! ```
//!
//! Only the client side lives here; stream accounting happens on-chain.

pub mod abi;
pub mod cfa;
pub mod flow_rate;
pub mod framework;
pub mod networks;
pub mod types;

pub use cfa::{ConstantFlowAgreement, CreateFlowOperation, CreateFlowParams, ExecOptions};
pub use flow_rate::FlowRate;
pub use framework::Framework;
pub use networks::ProtocolAddresses;
pub use types::{FlowError, FlowInfo, FlowResult, FlowStatus};
