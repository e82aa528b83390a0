//! Settlement batch builder
//!
//! Drains a stream of raw requests, runs each one through
//! decode → resolve → generate → build, and hands the accumulated
//! transactions to a [`BatchSubmitter`] in a single call.

use std::{fmt, pin::pin};

use alloy_primitives::U256;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::{
    constants::{DEFAULT_EXPIRATION_SECS, DEFAULT_GAS_LIMIT, LOG_TARGET},
    error::SettlementError,
    game::resolve_game_config,
    params::RequestParameters,
    randomness::{generate_outcome, EntropySource},
    settlement::{SettlementBatch, SettlementTransaction},
    signer::Signer,
    utils::unix_timestamp,
};

/// One request as delivered by the upstream source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequest {
    /// Opaque identifier used for diagnostics
    pub call_id: String,
    /// Positional request struct values, converted per slot when decoded
    pub params: Vec<Value>,
}

/// Pipeline stage of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    /// Delivered by the source
    Received,
    /// Raw tuple being decoded
    Decoding,
    /// Game config being looked up
    Resolving,
    /// Outcome being drawn
    Generating,
    /// Settlement call being populated
    Building,
    /// Settlement call ready
    Built,
}

impl RequestStage {
    /// Returns the string representation of the stage.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Decoding => "decoding",
            Self::Resolving => "resolving",
            Self::Generating => "generating",
            Self::Building => "building",
            Self::Built => "built",
        }
    }
}

impl fmt::Display for RequestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Identifier of the skipped request
    pub call_id: String,
    /// Stage the request failed in
    pub stage: RequestStage,
    /// Why it failed
    pub error: SettlementError,
}

/// Outcome of draining the request source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Requests delivered by the source
    pub received: usize,
    /// Built settlements, in arrival order
    pub transactions: Vec<SettlementTransaction>,
    /// Requests that were skipped
    pub failures: Vec<ItemFailure>,
    /// Set when the source terminated abnormally
    pub upstream_failure: Option<SettlementError>,
}

/// Batch envelope settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Seconds from submission until the batch expires
    pub expiration_secs: u64,
    /// Gas limit for the batch
    pub gas_limit: u64,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

/// Receives the finished batch of a run.
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
    /// Submit every settlement of the run in one call.
    async fn submit(&self, batch: SettlementBatch) -> Result<(), SettlementError>;
}

/// Turns raw requests into a batch of settlement transactions.
#[derive(Debug)]
pub struct SettlementBatchBuilder<E, S> {
    entropy: E,
    signer: S,
    options: BatchOptions,
}

impl<E: EntropySource, S: Signer> SettlementBatchBuilder<E, S> {
    /// Create a new builder
    pub const fn new(entropy: E, signer: S, options: BatchOptions) -> Self {
        Self {
            entropy,
            signer,
            options,
        }
    }

    /// Run a single request through the pipeline.
    ///
    /// On failure the error is tagged with the stage it happened in.
    pub fn settle(
        &mut self,
        raw: &[Value],
    ) -> Result<SettlementTransaction, (RequestStage, SettlementError)> {
        let request =
            RequestParameters::decode(raw).map_err(|e| (RequestStage::Decoding, e))?;
        let config =
            resolve_game_config(request.game_type).map_err(|e| (RequestStage::Resolving, e))?;
        debug!(
            target: LOG_TARGET,
            request_id = %request.request_id,
            game = config.kind.as_str(),
            "Resolved game config"
        );
        let outcome = generate_outcome(&mut self.entropy, config.min, config.max)
            .map_err(|e| (RequestStage::Generating, e))?;

        SettlementTransaction::populate(
            &self.signer,
            request.contract_address,
            request.request_id,
            outcome,
        )
        .map_err(|e| (RequestStage::Building, e))
    }

    /// Drain `source` and collect every settlement that could be built.
    ///
    /// Per-request failures are logged and skipped. A source error stops
    /// consumption and is recorded in the report. Only fatal errors are
    /// returned, in which case nothing must be submitted.
    pub async fn build<St, SE>(&mut self, source: St) -> Result<BuildReport, SettlementError>
    where
        St: Stream<Item = Result<RawRequest, SE>>,
        SE: fmt::Display,
    {
        let mut source = pin!(source);
        let mut report = BuildReport::default();

        while let Some(item) = source.next().await {
            let request = match item {
                Ok(request) => request,
                Err(e) => {
                    error!(target: LOG_TARGET, error = %e, "Request source failed");
                    report.upstream_failure =
                        Some(SettlementError::UpstreamSourceFailure(e.to_string()));
                    break;
                }
            };
            report.received += 1;
            debug!(
                target: LOG_TARGET,
                call_id = %request.call_id,
                stage = %RequestStage::Received,
                params = request.params.len(),
                "Request received"
            );

            match self.settle(&request.params) {
                Ok(tx) => {
                    info!(
                        target: LOG_TARGET,
                        call_id = %request.call_id,
                        stage = %RequestStage::Built,
                        "Adding settlement for request #{} with result={}, address={:#x}",
                        tx.request_id,
                        tx.outcome,
                        tx.to
                    );
                    report.transactions.push(tx);
                }
                Err((stage, e)) if e.is_fatal() => {
                    error!(
                        target: LOG_TARGET,
                        call_id = %request.call_id,
                        %stage,
                        error = %e,
                        "Aborting run"
                    );
                    return Err(e);
                }
                Err((stage, e)) => {
                    error!(
                        target: LOG_TARGET,
                        call_id = %request.call_id,
                        %stage,
                        error = %e,
                        "Skipping request"
                    );
                    report.failures.push(ItemFailure {
                        call_id: request.call_id,
                        stage,
                        error: e,
                    });
                }
            }
        }

        info!(
            target: LOG_TARGET,
            received = report.received,
            built = report.transactions.len(),
            failed = report.failures.len(),
            "Request source drained"
        );
        Ok(report)
    }

    /// Wrap settlements in a batch envelope expiring relative to now
    pub fn batch(&self, transactions: Vec<SettlementTransaction>) -> SettlementBatch {
        let expiration = unix_timestamp().saturating_add(self.options.expiration_secs);
        SettlementBatch {
            expiration_timestamp: U256::from(expiration),
            gas_limit: U256::from(self.options.gas_limit),
            transactions,
        }
    }

    /// Build a batch from `source` and submit it.
    ///
    /// The batch is submitted even when it is empty or the source failed
    /// part way; a source failure is reported after submission. If the
    /// submission itself fails, the source failure is folded into its message.
    pub async fn run<St, SE, B>(
        &mut self,
        source: St,
        submitter: &B,
    ) -> Result<BuildReport, SettlementError>
    where
        St: Stream<Item = Result<RawRequest, SE>>,
        SE: fmt::Display,
        B: BatchSubmitter + ?Sized,
    {
        let mut report = self.build(source).await?;

        let batch = self.batch(std::mem::take(&mut report.transactions));
        if batch.is_empty() {
            warn!(target: LOG_TARGET, "Failed to build any settlement calls");
        }
        info!(target: LOG_TARGET, calls = batch.len(), "Submitting settlement batch");
        let submitted = batch.transactions.clone();
        if let Err(e) = submitter.submit(batch).await {
            return Err(match (e, &report.upstream_failure) {
                (SettlementError::SubmissionFailure(msg), Some(upstream)) => {
                    SettlementError::SubmissionFailure(format!("{msg}; {upstream}"))
                }
                (e, _) => e,
            });
        }
        report.transactions = submitted;

        match report.upstream_failure.clone() {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::EnclaveSigner;
    use alloy_primitives::Address;
    use serde_json::json;

    struct CountingEntropy(u64);

    impl EntropySource for CountingEntropy {
        fn fill(&mut self, dest: &mut [u8; 32]) -> Result<(), SettlementError> {
            self.0 += 1;
            *dest = U256::from(self.0).to_be_bytes::<32>();
            Ok(())
        }
    }

    fn raw(game_type: u64, request_id: u64) -> Vec<Value> {
        vec![
            json!(game_type),
            json!("0xcccccccccccccccccccccccccccccccccccccccc"),
            json!("0xdddddddddddddddddddddddddddddddddddddddd"),
            json!(request_id),
            json!(1_700_000_000u64),
        ]
    }

    fn builder(signer: EnclaveSigner) -> SettlementBatchBuilder<CountingEntropy, EnclaveSigner> {
        SettlementBatchBuilder::new(CountingEntropy(0), signer, BatchOptions::default())
    }

    #[test]
    fn test_settle_tags_failure_stage() {
        let mut builder = builder(EnclaveSigner::new(Address::repeat_byte(0x01)));

        let (stage, _) = builder.settle(&raw(1, 1)[..4]).unwrap_err();
        assert_eq!(stage, RequestStage::Decoding);

        let (stage, err) = builder.settle(&raw(9, 1)).unwrap_err();
        assert_eq!(stage, RequestStage::Resolving);
        assert_eq!(err, SettlementError::UnknownGameType(U256::from(9)));

        let mut bad_slot = raw(1, 1);
        bad_slot[3] = json!("zz");
        let (stage, err) = builder.settle(&bad_slot).unwrap_err();
        assert_eq!(stage, RequestStage::Decoding);
        assert!(matches!(err, SettlementError::InvalidParameterValue { index: 3, .. }));

        let mut unsigned = self::builder(EnclaveSigner::unavailable());
        let (stage, _) = unsigned.settle(&raw(1, 1)).unwrap_err();
        assert_eq!(stage, RequestStage::Building);
    }

    #[test]
    fn test_settle_coin_flip() {
        let mut builder = builder(EnclaveSigner::new(Address::repeat_byte(0x01)));

        // First draw is 1: 1 + (1 % 2) = 2
        let tx = builder.settle(&raw(1, 77)).unwrap();
        assert_eq!(tx.request_id, U256::from(77));
        assert_eq!(tx.outcome, U256::from(2));
        assert_eq!(tx.to, Address::repeat_byte(0xcc));
    }

    #[test]
    fn test_batch_envelope() {
        let builder = SettlementBatchBuilder::new(
            CountingEntropy(0),
            EnclaveSigner::unavailable(),
            BatchOptions {
                expiration_secs: 60,
                gas_limit: 500,
            },
        );

        let before = unix_timestamp();
        let batch = builder.batch(Vec::new());
        assert!(batch.is_empty());
        assert_eq!(batch.gas_limit, U256::from(500));
        assert!(batch.expiration_timestamp >= U256::from(before + 60));
    }

    #[test]
    fn test_raw_request_json() {
        let request: RawRequest = serde_json::from_str(
            r#"{"callId": "call-1", "params": [1, "0xcccccccccccccccccccccccccccccccccccccccc", "0xdddddddddddddddddddddddddddddddddddddddd", 7, 1700000000]}"#,
        )
        .unwrap();

        assert_eq!(request.call_id, "call-1");
        assert_eq!(request.params, raw(1, 7));
    }

    #[test]
    fn test_raw_request_keeps_bad_values() {
        let request: RawRequest =
            serde_json::from_str(r#"{"callId": "call-2", "params": [1, -1, "zz", null]}"#).unwrap();

        assert_eq!(request.params.len(), 4);
        assert!(serde_json::from_str::<RawRequest>(r#"{"params": []}"#).is_err());
    }
}
