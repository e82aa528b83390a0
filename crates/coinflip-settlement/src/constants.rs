/// Canonical signature of the settlement entry point on the game contract.
pub const SETTLE_SIGNATURE: &str = "coinFlipSettle(uint256,uint256)";

/// Number of fields in the on-chain request struct
/// `(gameType, contractAddress, user, requestId, requestTimestamp)`.
pub const REQUEST_PARAM_COUNT: usize = 5;

/// Seconds a submitted batch stays valid.
pub const DEFAULT_EXPIRATION_SECS: u64 = 180;

/// Gas limit attached to a submitted batch.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

/// Tracing target for everything emitted by the settlement pipeline.
pub(crate) const LOG_TARGET: &str = "settlement";
