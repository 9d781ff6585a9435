//! Seams to the ledger collaborator.
//!
//! The ledger supplies durable keyed storage for vault records and the
//! owner index, exclusive per-vault access, and executes the transfers the
//! state machine signals. The state machine only expresses the rules; these
//! traits are where an environment enforces them.

pub mod memory;

use alloy_primitives::{Address, U256};
use serde::Serialize;
use strum::Display;

use crate::error::VaultResult;
use crate::vault::{Vault, VaultId};

pub use memory::{MemoryLockManager, MemoryVaultStore, StoreSnapshot};

/// Keyed storage for vault records plus the owner index.
///
/// The owner index is append-only: each owner maps to the ids they created,
/// in creation order. It holds plain identifiers, never records.
pub trait VaultStore: Send + Sync {
    /// Loads the vault stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, id: &VaultId) -> VaultResult<Option<Vault>>;

    /// Inserts a new vault and appends its id to the owner's index.
    ///
    /// The existence check, the insert and the index append happen as one
    /// step.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::AlreadyExists`](crate::VaultError::AlreadyExists)
    /// if a vault with the same id is present.
    fn insert(&self, vault: Vault) -> VaultResult<()>;

    /// Overwrites an existing vault record.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`](crate::VaultError::NotFound) if no
    /// vault with the same id is present.
    fn replace(&self, vault: Vault) -> VaultResult<()>;

    /// Ids created by `owner`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn owned_ids(&self, owner: Address) -> VaultResult<Vec<VaultId>>;

    /// Number of vaults created by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn owned_count(&self, owner: Address) -> VaultResult<usize> {
        Ok(self.owned_ids(owner)?.len())
    }

    /// The `index`-th id created by `owner`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn owned_id(&self, owner: Address, index: usize) -> VaultResult<Option<VaultId>> {
        Ok(self.owned_ids(owner)?.into_iter().nth(index))
    }
}

/// Per-vault locking to serialize mutations.
///
/// Every mutating operation on a vault runs its whole check-then-mutate
/// sequence inside the lock for that vault's id. Operations on distinct ids
/// never contend.
pub trait VaultLockManager: Send + Sync {
    /// Executes the closure while holding the lock for `id`.
    ///
    /// The lock is released when the closure returns, whether it succeeds
    /// or fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired or the closure
    /// returns an error.
    fn with_vault_lock<R, F>(&self, id: &VaultId, f: F) -> VaultResult<R>
    where
        F: FnOnce() -> VaultResult<R>;

    /// Attempts to acquire the lock for `id` without blocking.
    ///
    /// Returns `Ok(None)` if the lock is held elsewhere.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned or the closure returns an
    /// error.
    fn try_with_vault_lock<R, F>(&self, id: &VaultId, f: F) -> VaultResult<Option<R>>
    where
        F: FnOnce() -> VaultResult<R>;
}

/// Why value leaves a vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    /// Owner spend.
    Spend,
    /// Redeemer withdrawal.
    Redeem,
}

/// A value transfer signalled by a successful spend or redeem.
///
/// The state machine has already debited the vault; the ledger credits
/// `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// Vault the value came from.
    pub vault_id: VaultId,
    /// Spend or redeem.
    pub kind: TransferKind,
    /// Account to credit.
    pub recipient: Address,
    /// Amount debited from the vault.
    pub amount: U256,
}
