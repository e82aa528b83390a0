//! Off-chain settlement for the coin flip game contract.
//!
//! Each pending on-chain request is decoded, its game type resolved to an
//! outcome range, an outcome drawn from a secure entropy source, and a
//! `coinFlipSettle(requestId, result)` call populated for the contract that
//! issued the request. All calls of a run are submitted as one batch.
//!
//! ```no_run
//! use coinflip_settlement::{
//!     json_lines, BatchOptions, EnclaveSigner, JsonEmitter, OsEntropy, SettlementBatchBuilder,
//! };
//!
//! # async fn run(signer: EnclaveSigner) -> Result<(), coinflip_settlement::SettlementError> {
//! let source = json_lines(tokio::io::BufReader::new(tokio::io::stdin()));
//! let emitter = JsonEmitter::new(std::io::stdout());
//!
//! let mut builder = SettlementBatchBuilder::new(OsEntropy, signer, BatchOptions::default());
//! builder.run(source, &emitter).await?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod params;
pub mod randomness;
pub mod settlement;
pub mod signer;
pub mod source;
pub mod submit;
mod utils;

pub use abi::Token;
pub use batch::{
    BatchOptions, BatchSubmitter, BuildReport, ItemFailure, RawRequest, RequestStage,
    SettlementBatchBuilder,
};
pub use config::SettlerConfig;
pub use error::{ConfigError, SettlementError, SignerError};
pub use game::{resolve_game_config, GameConfig, GameKind};
pub use params::RequestParameters;
pub use randomness::{generate_outcome, EntropySource, OsEntropy};
pub use settlement::{SettlementBatch, SettlementTransaction};
pub use signer::{EnclaveSigner, Signer};
pub use source::json_lines;
pub use submit::JsonEmitter;
