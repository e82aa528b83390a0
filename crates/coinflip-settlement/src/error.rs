//! Error types

use alloy_primitives::U256;
use thiserror::Error;

use crate::abi::Token;

/// Errors raised while turning requests into settlement transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// The raw parameter tuple does not have the expected arity.
    #[error("invalid params length: expected {expected}, got {actual}")]
    InvalidParameterLength {
        /// Arity of the request struct
        expected: usize,
        /// Arity that was received
        actual: usize,
    },

    /// A positional value cannot be read as the type of its slot.
    #[error("param {index} cannot be read as {expected}: {found}")]
    InvalidParameterType {
        /// Position in the tuple
        index: usize,
        /// Solidity type of the slot
        expected: &'static str,
        /// Value that was found there
        found: Token,
    },

    /// A positional value is not a valid ABI value at all.
    #[error("param {index} is not a valid value ({value}): {reason}")]
    InvalidParameterValue {
        /// Position in the tuple
        index: usize,
        /// Raw value as received
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// No game config is registered for the requested game type.
    #[error("failed to find game config for gameType ({0})")]
    UnknownGameType(U256),

    /// The settlement call could not be populated.
    #[error("failed to build settlement transaction: {0}")]
    TransactionBuildFailure(#[from] SignerError),

    /// The secure random source could not produce bytes.
    #[error("entropy source unavailable: {0}")]
    EntropySourceUnavailable(String),

    /// The inbound request sequence terminated abnormally.
    #[error("upstream request source failed: {0}")]
    UpstreamSourceFailure(String),

    /// The batch could not be handed to the submitter.
    #[error("failed to submit settlement batch: {0}")]
    SubmissionFailure(String),
}

impl SettlementError {
    /// Returns true for errors that must abort the whole run instead of
    /// skipping a single request.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::EntropySourceUnavailable(_))
    }
}

/// Errors raised by a [`Signer`](crate::Signer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// No signing identity is configured for this run.
    #[error("signer unavailable")]
    Unavailable,
}

/// Errors raised while loading [`SettlerConfig`](crate::SettlerConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable holds a value that is not a valid address.
    #[error("invalid {var} {value}: {reason}")]
    InvalidAddress {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
        /// Parser message
        reason: String,
    },
}
