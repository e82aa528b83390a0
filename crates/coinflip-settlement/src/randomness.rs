//! Outcome generation from a secure entropy source

use alloy_primitives::U256;
use rand::{rngs::OsRng, RngCore};

use crate::{abi::WORD_SIZE, error::SettlementError};

/// Source of raw entropy for outcome generation.
pub trait EntropySource {
    /// Fill `dest` with uniformly random bytes.
    fn fill(&mut self, dest: &mut [u8; WORD_SIZE]) -> Result<(), SettlementError>;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8; WORD_SIZE]) -> Result<(), SettlementError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| SettlementError::EntropySourceUnavailable(e.to_string()))
    }
}

/// Draw a uniformly distributed value in `[min(a, b), max(a, b)]`.
///
/// One 256-bit draw is reduced modulo the window size. That leaves a bias of
/// at most `window / 2^256`, which is negligible for game-sized windows but
/// is not a provably fair selection for arbitrary ranges.
///
/// When `a == b` no entropy is consumed.
pub fn generate_outcome<E: EntropySource + ?Sized>(
    entropy: &mut E,
    a: U256,
    b: U256,
) -> Result<U256, SettlementError> {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    if low == high {
        return Ok(low);
    }

    let mut bytes = [0u8; WORD_SIZE];
    entropy.fill(&mut bytes)?;
    let drawn = U256::from_be_bytes(bytes);

    // `high - low` cannot underflow after normalization; `+ 1` overflows only
    // for the full 256-bit range, where the raw draw is already uniform.
    match (high - low).checked_add(U256::from(1)) {
        Some(window) => Ok(low + drawn % window),
        None => Ok(drawn),
    }
}
