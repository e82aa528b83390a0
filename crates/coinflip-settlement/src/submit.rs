//! Batch emitter that writes JSON

use std::{io::Write, sync::Mutex};

use async_trait::async_trait;

use crate::{batch::BatchSubmitter, error::SettlementError, settlement::SettlementBatch};

/// Writes each submitted batch as one JSON document per line.
///
/// The runner reads the emitted document and broadcasts the calls.
#[derive(Debug)]
pub struct JsonEmitter<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonEmitter<W> {
    /// Create an emitter over `out`
    pub const fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Consume the emitter and return the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> BatchSubmitter for JsonEmitter<W> {
    async fn submit(&self, batch: SettlementBatch) -> Result<(), SettlementError> {
        let mut out = self
            .out
            .lock()
            .map_err(|e| SettlementError::SubmissionFailure(e.to_string()))?;

        serde_json::to_writer(&mut *out, &batch.to_json())
            .map_err(|e| SettlementError::SubmissionFailure(e.to_string()))?;
        writeln!(out).map_err(|e| SettlementError::SubmissionFailure(e.to_string()))?;
        out.flush().map_err(|e| SettlementError::SubmissionFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[tokio::test]
    async fn test_emits_one_line_per_batch() {
        let emitter = JsonEmitter::new(Vec::new());
        let batch = SettlementBatch {
            expiration_timestamp: U256::from(10),
            gas_limit: U256::from(20),
            transactions: Vec::new(),
        };

        emitter.submit(batch.clone()).await.unwrap();
        emitter.submit(batch).await.unwrap();

        let out = String::from_utf8(emitter.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let json: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(json["gasLimit"], "20");
        assert_eq!(json["transactions"].as_array().unwrap().len(), 0);
    }
}
