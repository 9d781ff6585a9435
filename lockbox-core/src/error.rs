//! Error types for vault operations.

use thiserror::Error;

use crate::codec::CodecError;
use crate::vault::VaultId;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Named failure conditions of the vault protocol.
///
/// Every operation is all-or-nothing: when one of these is returned, no
/// field of the vault or the owner index has changed and no transfer was
/// signalled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// A vault with this id already exists
    #[error("vault already exists")]
    AlreadyExists,
    /// No vault exists under this id
    #[error("vault does not exist")]
    NotFound,
    /// An id, hints blob, commitments blob or revealed-answers blob is malformed
    #[error("malformed input: {0}")]
    MalformedInput(#[from] CodecError),
    /// `num_answers_required` is not within `1..=N`
    #[error("invalid threshold: {required} of {questions} answers")]
    InvalidThreshold {
        /// Requested threshold.
        required: u8,
        /// Number of questions on the vault.
        questions: usize,
    },
    /// The caller is not the owner (spend) or the redeemer (redeem)
    #[error("caller is not allowed to perform this operation")]
    Unauthorized,
    /// The owner cannot spend once the vault has been triggered
    #[error("vault cannot be spent from after it is unlocked")]
    PostUnlockSpendDenied,
    /// The requested amount exceeds the vault value
    #[error("not enough value in vault")]
    InsufficientValue,
    /// The vault has already been triggered
    #[error("vault has already been unlocked")]
    AlreadyTriggered,
    /// Fewer revealed answers verified than the vault requires
    #[error("not enough correct answers: {correct} of {required}")]
    InsufficientAnswers {
        /// Answers that verified.
        correct: usize,
        /// Threshold stored on the vault.
        required: u8,
    },
    /// The vault is not triggered or its unlocking period has not elapsed
    #[error("vault is still locked")]
    StillLocked,
    /// Adding value would overflow the vault balance
    #[error("vault value overflow")]
    ValueOverflow,
    /// The unlock height does not fit the clock range
    #[error("unlock height overflows the clock")]
    ClockOverflow,
    /// The ledger could not provide exclusive access
    #[error("ledger lock error: {0}")]
    Lock(String),
}

/// Operations exposed by the vault state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// Vault creation.
    Create,
    /// Top-up by any caller.
    AddValue,
    /// Owner spend.
    Spend,
    /// Challenge response that starts the unlocking period.
    TriggerUnlock,
    /// Redeemer withdrawal.
    Redeem,
    /// Read of a single vault.
    Get,
}

/// A [`VaultError`] together with the operation and vault it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} {vault_id}: {error}")]
pub struct OperationError {
    /// Operation that failed.
    pub operation: Operation,
    /// Vault the operation targeted.
    pub vault_id: VaultId,
    /// Failure condition.
    #[source]
    pub error: VaultError,
}

impl OperationError {
    /// Wraps `error` with its originating operation and vault.
    #[must_use]
    pub fn new(operation: Operation, vault_id: VaultId, error: VaultError) -> Self {
        Self {
            operation,
            vault_id,
            error,
        }
    }

    /// The underlying failure condition.
    #[must_use]
    pub const fn kind(&self) -> &VaultError {
        &self.error
    }
}
