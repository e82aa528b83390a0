//! Signing identity seam

use alloy_primitives::Address;

use crate::error::SignerError;

/// Identity that settlement transactions are sent from.
///
/// Key material stays with the implementor; the builder only needs the
/// sending address.
pub trait Signer {
    /// Address of the signing account.
    fn address(&self) -> Result<Address, SignerError>;
}

/// Signer backed by the runner's enclave wallet.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnclaveSigner {
    address: Option<Address>,
}

impl EnclaveSigner {
    /// Signer for a known enclave wallet address
    pub const fn new(address: Address) -> Self {
        Self { address: Some(address) }
    }

    /// Signer for a run that has no wallet attached
    pub const fn unavailable() -> Self {
        Self { address: None }
    }
}

impl From<Option<Address>> for EnclaveSigner {
    fn from(address: Option<Address>) -> Self {
        Self { address }
    }
}

impl Signer for EnclaveSigner {
    fn address(&self) -> Result<Address, SignerError> {
        self.address.ok_or(SignerError::Unavailable)
    }
}
