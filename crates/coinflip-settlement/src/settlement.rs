//! Settlement transaction and batch structures

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    abi::{encode_call, Token},
    constants::SETTLE_SIGNATURE,
    error::SettlementError,
    signer::Signer,
};

/// A populated, not yet submitted `coinFlipSettle` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementTransaction {
    /// Signing account
    pub from: Address,
    /// Game contract that issued the request
    pub to: Address,
    /// Encoded `coinFlipSettle(requestId, result)` call
    pub data: Bytes,
    /// Request being settled
    pub request_id: U256,
    /// Generated outcome
    pub outcome: U256,
}

impl SettlementTransaction {
    /// Populate a settlement call for `request_id` on `contract`.
    pub fn populate<S: Signer + ?Sized>(
        signer: &S,
        contract: Address,
        request_id: U256,
        outcome: U256,
    ) -> Result<Self, SettlementError> {
        let from = signer.address()?;
        let data = encode_call(SETTLE_SIGNATURE, &[Token::Uint(request_id), Token::Uint(outcome)]);

        Ok(Self {
            from,
            to: contract,
            data: data.into(),
            request_id,
            outcome,
        })
    }

    /// JSON form handed to the submitter
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "from": format!("{:#x}", self.from),
            "to": format!("{:#x}", self.to),
            "data": format!("0x{}", hex::encode(&self.data)),
            "requestId": self.request_id.to_string(),
            "result": self.outcome.to_string(),
        })
    }
}

/// Every settlement produced by one run, submitted in a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementBatch {
    /// Unix time after which the batch must not be executed
    pub expiration_timestamp: U256,
    /// Gas limit for executing the batch
    pub gas_limit: U256,
    /// Settlements in request arrival order
    pub transactions: Vec<SettlementTransaction>,
}

impl SettlementBatch {
    /// Number of settlements in the batch
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the batch carries no settlement
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// JSON form handed to the submitter
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "expirationTimestamp": self.expiration_timestamp.to_string(),
            "gasLimit": self.gas_limit.to_string(),
            "transactions": self
                .transactions
                .iter()
                .map(SettlementTransaction::to_json)
                .collect::<Vec<_>>(),
        })
    }
}
