//! Request parameter decoding

use alloy_primitives::{Address, U256};
use serde_json::Value;

use crate::{abi::Token, constants::REQUEST_PARAM_COUNT, error::SettlementError};

/// Typed view of the on-chain request struct.
///
/// Fields are in the order the Solidity struct declares them:
/// `(gameType, contractAddress, user, requestId, requestTimestamp)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestParameters {
    /// Game variant selector
    pub game_type: U256,
    /// Contract that receives the settlement call
    pub contract_address: Address,
    /// Player that made the request
    pub user: Address,
    /// Identifier of the pending request
    pub request_id: U256,
    /// Time the request was made
    pub request_timestamp: U256,
}

impl RequestParameters {
    /// Decode a positional tuple of raw values.
    ///
    /// The tuple must contain exactly [`REQUEST_PARAM_COUNT`] values. Each
    /// slot is converted with [`Token::from_json`]; nothing is checked beyond
    /// the word coercion each slot implies.
    pub fn decode(raw: &[Value]) -> Result<Self, SettlementError> {
        let [game_type, contract_address, user, request_id, request_timestamp] = raw else {
            return Err(SettlementError::InvalidParameterLength {
                expected: REQUEST_PARAM_COUNT,
                actual: raw.len(),
            });
        };

        Ok(Self {
            game_type: Token::from_json(game_type, 0)?.as_uint(),
            contract_address: Token::from_json(contract_address, 1)?.as_address(1)?,
            user: Token::from_json(user, 2)?.as_address(2)?,
            request_id: Token::from_json(request_id, 3)?.as_uint(),
            request_timestamp: Token::from_json(request_timestamp, 4)?.as_uint(),
        })
    }
}
