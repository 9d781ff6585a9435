//! Two-round hash commitments over security-question answers.
//!
//! A creator stores `H(H(answer))`. A claimant later submits `H(answer)`,
//! which the vault re-hashes and compares against the stored value. The hash
//! primitive and the exact bytes hashed must match whatever produced the
//! stored commitments, so the primitive is selected explicitly and never
//! inferred.

use alloy_primitives::{keccak256, B256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum::{Display, EnumString};
use subtle::ConstantTimeEq;

/// A 32-byte one-way hash function supplied by the environment.
pub trait HashPrimitive: Send + Sync {
    /// Hashes `data` to a 32-byte digest.
    fn hash(&self, data: &[u8]) -> B256;
}

/// Hash primitives shipped with the crate.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Keccak-256, the primitive used by EVM deployments of the vault.
    #[default]
    Keccak256,
    /// SHA-256.
    Sha256,
}

impl HashPrimitive for HashAlgorithm {
    fn hash(&self, data: &[u8]) -> B256 {
        match self {
            Self::Keccak256 => keccak256(data),
            Self::Sha256 => B256::from_slice(&Sha256::digest(data)),
        }
    }
}

/// Commitment scheme bound to a specific hash primitive.
#[derive(Debug, Clone, Default)]
pub struct CommitmentScheme<H = HashAlgorithm> {
    hasher: H,
}

impl<H: HashPrimitive> CommitmentScheme<H> {
    /// Creates a scheme over `hasher`.
    #[must_use]
    pub const fn new(hasher: H) -> Self {
        Self { hasher }
    }

    /// Returns the underlying hash primitive.
    #[must_use]
    pub const fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Single hash of the raw answer bytes; this is what a claimant submits.
    #[must_use]
    pub fn reveal(&self, answer: &[u8]) -> B256 {
        self.hasher.hash(answer)
    }

    /// Double hash of the raw answer bytes; this is what a vault stores.
    #[must_use]
    pub fn commit(&self, answer: &[u8]) -> B256 {
        self.hasher.hash(self.reveal(answer).as_slice())
    }

    /// Returns `true` if `revealed` hashes to `commitment`.
    #[must_use]
    pub fn verify(&self, commitment: &B256, revealed: &B256) -> bool {
        let rehashed = self.hasher.hash(revealed.as_slice());
        rehashed.as_slice().ct_eq(commitment.as_slice()).into()
    }
}
