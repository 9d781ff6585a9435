//! The vault state machine.
//!
//! [`LockBox`] binds a [`VaultStore`], a [`VaultLockManager`] and a
//! [`CommitmentScheme`]. Every mutating operation holds the per-id lock
//! across load, check, mutate and store. The mutation runs on a loaded copy
//! and only a fully successful copy is written back, so a rejected operation
//! leaves the store untouched.

use alloy_primitives::{Address, U256};
use serde::Serialize;

use crate::commitment::{CommitmentScheme, HashAlgorithm, HashPrimitive};
use crate::error::{Operation, OperationError, VaultError, VaultResult};
use crate::ledger::{
    MemoryLockManager, MemoryVaultStore, Transfer, TransferKind, VaultLockManager, VaultStore,
};
use crate::vault::{BlockHeight, NewVault, Vault, VaultId, VaultStatus};

/// A vault as observed at a given clock reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultView {
    /// The stored record.
    #[serde(flatten)]
    pub vault: Vault,
    /// Decoded hint text, in question order.
    pub decoded_hints: Vec<String>,
    /// Status derived from `unlocked_at` and `as_of`.
    pub status: VaultStatus,
    /// Clock reading the status was derived at.
    pub as_of: BlockHeight,
}

impl VaultView {
    /// Derives the view of `vault` at `now`.
    #[must_use]
    pub fn new(vault: Vault, now: BlockHeight) -> Self {
        Self {
            decoded_hints: vault.hints().to_vec(),
            status: vault.status(now),
            as_of: now,
            vault,
        }
    }
}

/// Knowledge-gated value vaults over pluggable storage, locking and hashing.
pub struct LockBox<S = MemoryVaultStore, L = MemoryLockManager, H = HashAlgorithm> {
    store: S,
    locks: L,
    scheme: CommitmentScheme<H>,
}

impl LockBox {
    /// An in-memory lock box committing with `algorithm`.
    #[must_use]
    pub fn in_memory(algorithm: HashAlgorithm) -> Self {
        Self::with_components(
            MemoryVaultStore::new(),
            MemoryLockManager::new(),
            CommitmentScheme::new(algorithm),
        )
    }
}

impl<S, L, H> LockBox<S, L, H>
where
    S: VaultStore,
    L: VaultLockManager,
    H: HashPrimitive,
{
    /// Assembles a lock box from its collaborators.
    pub const fn with_components(store: S, locks: L, scheme: CommitmentScheme<H>) -> Self {
        Self {
            store,
            locks,
            scheme,
        }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The per-id lock manager.
    pub const fn locks(&self) -> &L {
        &self.locks
    }

    /// The commitment scheme used to verify revealed answers.
    pub const fn scheme(&self) -> &CommitmentScheme<H> {
        &self.scheme
    }

    /// Consumes the lock box, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Creates a vault owned by `caller` and records it in the owner index.
    ///
    /// Returns the initial snapshot of the vault.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the id is taken, `MalformedInput` if either blob
    /// fails to decode or their counts differ, `InvalidThreshold` if the
    /// threshold is not within `1..=N`.
    pub fn create(
        &self,
        request: NewVault,
        caller: Address,
        now: BlockHeight,
    ) -> Result<Vault, OperationError> {
        let id = request.id.clone();
        let vault = self
            .locks
            .with_vault_lock(&id, || {
                if self.store.get(&id)?.is_some() {
                    return Err(VaultError::AlreadyExists);
                }
                let vault = Vault::open(&request, caller, now)?;
                self.store.insert(vault.clone())?;
                Ok(vault)
            })
            .map_err(|error| reject(Operation::Create, &id, error))?;

        tracing::info!(
            vault_id = %id,
            owner = %caller,
            value = %vault.value(),
            questions = vault.num_questions(),
            required = vault.num_answers_required(),
            unlocking_period = vault.unlocking_period(),
            created_at = now,
            "vault created"
        );
        Ok(vault)
    }

    /// Adds `amount` to a vault. Any caller may top up.
    ///
    /// # Errors
    ///
    /// `NotFound` if the vault is absent, `ValueOverflow` if the balance
    /// would overflow.
    pub fn add_value(
        &self,
        id: &VaultId,
        amount: U256,
        caller: Address,
        now: BlockHeight,
    ) -> Result<Vault, OperationError> {
        let (vault, ()) = self.mutate(Operation::AddValue, id, |vault| vault.add_value(amount))?;
        tracing::info!(
            vault_id = %id,
            %caller,
            %amount,
            value = %vault.value(),
            at = now,
            "value added"
        );
        Ok(vault)
    }

    /// Owner spend of `amount` to `recipient`.
    ///
    /// # Errors
    ///
    /// `NotFound`, then `Unauthorized` if `caller` is not the owner, then
    /// `PostUnlockSpendDenied` once triggered unless the vault allows it,
    /// then `InsufficientValue`.
    pub fn spend(
        &self,
        id: &VaultId,
        amount: U256,
        recipient: Address,
        caller: Address,
        now: BlockHeight,
    ) -> Result<Transfer, OperationError> {
        let (vault, ()) = self.mutate(Operation::Spend, id, |vault| vault.spend(caller, amount))?;
        tracing::info!(
            vault_id = %id,
            %caller,
            %recipient,
            %amount,
            value = %vault.value(),
            at = now,
            "vault spent"
        );
        Ok(Transfer {
            vault_id: id.clone(),
            kind: TransferKind::Spend,
            recipient,
            amount,
        })
    }

    /// Submits revealed answers and, if enough verify, starts the unlocking
    /// period with `caller` as redeemer.
    ///
    /// # Errors
    ///
    /// `NotFound`, then `AlreadyTriggered`, then `MalformedInput` if the blob
    /// does not hold exactly one answer per question, then
    /// `InsufficientAnswers`.
    pub fn trigger_unlock(
        &self,
        id: &VaultId,
        revealed_answers: &[u8],
        caller: Address,
        now: BlockHeight,
    ) -> Result<Vault, OperationError> {
        let (vault, correct) = self.mutate(Operation::TriggerUnlock, id, |vault| {
            vault.trigger_unlock(&self.scheme, revealed_answers, caller, now)
        })?;
        tracing::info!(
            vault_id = %id,
            redeemer = %caller,
            correct,
            required = vault.num_answers_required(),
            unlocked_at = vault.unlocked_at(),
            at = now,
            "vault unlock triggered"
        );
        Ok(vault)
    }

    /// Redeemer withdrawal of `amount` to `recipient`.
    ///
    /// # Errors
    ///
    /// `NotFound`, then `StillLocked` until `now >= unlocked_at`, then
    /// `Unauthorized` if `caller` is not the redeemer, then
    /// `InsufficientValue`.
    pub fn redeem(
        &self,
        id: &VaultId,
        amount: U256,
        recipient: Address,
        caller: Address,
        now: BlockHeight,
    ) -> Result<Transfer, OperationError> {
        let (vault, ()) = self.mutate(Operation::Redeem, id, |vault| {
            vault.redeem(caller, amount, now)
        })?;
        tracing::info!(
            vault_id = %id,
            %caller,
            %recipient,
            %amount,
            value = %vault.value(),
            at = now,
            "vault redeemed"
        );
        Ok(Transfer {
            vault_id: id.clone(),
            kind: TransferKind::Redeem,
            recipient,
            amount,
        })
    }

    /// Reads a vault.
    ///
    /// # Errors
    ///
    /// `NotFound` if the vault is absent.
    pub fn get(&self, id: &VaultId) -> Result<Vault, OperationError> {
        self.store
            .get(id)
            .and_then(|vault| vault.ok_or(VaultError::NotFound))
            .map_err(|error| reject(Operation::Get, id, error))
    }

    /// Reads a vault together with its status at `now`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the vault is absent.
    pub fn view(&self, id: &VaultId, now: BlockHeight) -> Result<VaultView, OperationError> {
        self.get(id).map(|vault| VaultView::new(vault, now))
    }

    /// Ids created by `owner`, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn owned_vault_ids(&self, owner: Address) -> VaultResult<Vec<VaultId>> {
        self.store.owned_ids(owner)
    }

    /// Number of vaults created by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn owned_vault_count(&self, owner: Address) -> VaultResult<usize> {
        self.store.owned_count(owner)
    }

    /// The `index`-th vault id created by `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn owned_vault_id(&self, owner: Address, index: usize) -> VaultResult<Option<VaultId>> {
        self.store.owned_id(owner, index)
    }

    fn mutate<R, F>(
        &self,
        operation: Operation,
        id: &VaultId,
        apply: F,
    ) -> Result<(Vault, R), OperationError>
    where
        F: FnOnce(&mut Vault) -> VaultResult<R>,
    {
        self.locks
            .with_vault_lock(id, || {
                let mut vault = self.store.get(id)?.ok_or(VaultError::NotFound)?;
                let outcome = apply(&mut vault)?;
                self.store.replace(vault.clone())?;
                Ok((vault, outcome))
            })
            .map_err(|error| reject(operation, id, error))
    }
}

fn reject(operation: Operation, id: &VaultId, error: VaultError) -> OperationError {
    tracing::debug!(%operation, vault_id = %id, %error, "operation rejected");
    OperationError::new(operation, id.clone(), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{Challenge, Question};
    use alloy_primitives::address;

    const OWNER: Address = address!("0x00000000000000000000000000000000000000a1");
    const CLAIMANT: Address = address!("0x00000000000000000000000000000000000000c3");

    fn lockbox_with_vault() -> (LockBox, VaultId) {
        let lockbox = LockBox::in_memory(HashAlgorithm::Keccak256);
        let id = VaultId::from_name("vault").unwrap();
        let request = Challenge::build(lockbox.scheme(), &[Question::new("pet?", "rex")])
            .unwrap()
            .into_request(id.clone())
            .with_unlocking_period(3)
            .with_value(U256::from(100));
        lockbox.create(request, OWNER, 1).unwrap();
        (lockbox, id)
    }

    #[test]
    fn test_rejection_carries_operation_and_id() {
        let (lockbox, id) = lockbox_with_vault();
        let err = lockbox
            .spend(&id, U256::from(1), CLAIMANT, CLAIMANT, 2)
            .unwrap_err();
        assert_eq!(err.operation, Operation::Spend);
        assert_eq!(err.vault_id, id);
        assert_eq!(err.kind(), &VaultError::Unauthorized);
        assert_eq!(
            err.to_string(),
            "spend 0x7661756c74: caller is not allowed to perform this operation"
        );
    }

    #[test]
    fn test_missing_vault_is_not_found_for_every_operation() {
        let lockbox = LockBox::in_memory(HashAlgorithm::Keccak256);
        let id = VaultId::from_name("nope").unwrap();
        let one = U256::from(1);

        let errors = [
            lockbox.add_value(&id, one, OWNER, 1).unwrap_err(),
            lockbox.spend(&id, one, OWNER, OWNER, 1).unwrap_err(),
            lockbox.trigger_unlock(&id, &[0; 32], OWNER, 1).unwrap_err(),
            lockbox.redeem(&id, one, OWNER, OWNER, 1).unwrap_err(),
            lockbox.get(&id).unwrap_err(),
        ];
        for err in errors {
            assert_eq!(err.kind(), &VaultError::NotFound);
        }
    }

    #[test]
    fn test_rejected_ids_leave_no_lock_entries() {
        let (lockbox, id) = lockbox_with_vault();
        let one = U256::from(1);
        for i in 0..500 {
            let missing = VaultId::from_name(&format!("missing-{i}")).unwrap();
            let err = lockbox.add_value(&missing, one, CLAIMANT, 2).unwrap_err();
            assert_eq!(err.kind(), &VaultError::NotFound);
            lockbox
                .trigger_unlock(&missing, &[0; 32], CLAIMANT, 2)
                .unwrap_err();
        }
        lockbox.add_value(&id, one, CLAIMANT, 2).unwrap();

        assert_eq!(lockbox.locks().tracked().unwrap(), 0);
    }

    #[test]
    fn test_failed_trigger_leaves_store_unchanged() {
        let (lockbox, id) = lockbox_with_vault();
        let before = lockbox.get(&id).unwrap();
        let wrong = Challenge::reveal_answers(lockbox.scheme(), &[Some("max")]);

        let err = lockbox.trigger_unlock(&id, &wrong, CLAIMANT, 5).unwrap_err();
        assert_eq!(
            err.kind(),
            &VaultError::InsufficientAnswers {
                correct: 0,
                required: 1
            }
        );
        assert_eq!(lockbox.get(&id).unwrap(), before);
    }

    #[test]
    fn test_view_status_follows_clock() {
        let (lockbox, id) = lockbox_with_vault();
        let revealed = Challenge::reveal_answers(lockbox.scheme(), &[Some("rex")]);
        lockbox.trigger_unlock(&id, &revealed, CLAIMANT, 10).unwrap();

        assert_eq!(lockbox.view(&id, 10).unwrap().status, VaultStatus::Unlocking);
        assert_eq!(lockbox.view(&id, 13).unwrap().status, VaultStatus::Unlocking);
        let view = lockbox.view(&id, 14).unwrap();
        assert_eq!(view.status, VaultStatus::Redeemable);
        assert_eq!(view.as_of, 14);
        assert_eq!(view.decoded_hints, vec!["pet?"]);
    }

    #[test]
    fn test_view_serializes_flat() {
        let (lockbox, id) = lockbox_with_vault();
        let json = serde_json::to_value(lockbox.view(&id, 1).unwrap()).unwrap();
        assert_eq!(json["id"], "0x7661756c74");
        assert_eq!(json["status"], "locked");
        assert_eq!(json["unlockedAt"], 0);
        assert_eq!(json["decodedHints"][0], "pet?");
        assert!(json["redeemableBy"].is_null());
    }

    #[test]
    fn test_transfers_describe_debit() {
        let (lockbox, id) = lockbox_with_vault();
        let transfer = lockbox
            .spend(&id, U256::from(40), CLAIMANT, OWNER, 2)
            .unwrap();
        assert_eq!(
            transfer,
            Transfer {
                vault_id: id.clone(),
                kind: TransferKind::Spend,
                recipient: CLAIMANT,
                amount: U256::from(40),
            }
        );
        assert_eq!(lockbox.get(&id).unwrap().value(), U256::from(60));
    }
}
