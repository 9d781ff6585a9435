//! In-memory ledger implementations.
//!
//! Used by tests and by single-process hosts that persist state themselves
//! through [`MemoryVaultStore::snapshot`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::codec::CodecError;
use crate::error::{VaultError, VaultResult};
use crate::vault::{Vault, VaultId};

use super::{VaultLockManager, VaultStore};

fn poisoned<T>(err: &PoisonError<T>) -> VaultError {
    VaultError::Lock(format!("lock poisoned: {err}"))
}

// =============================================================================
// Memory Vault Store
// =============================================================================

#[derive(Default)]
struct Inner {
    vaults: HashMap<VaultId, Vault>,
    owners: HashMap<Address, Vec<VaultId>>,
}

/// Serializable copy of a [`MemoryVaultStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Vault records, ordered by id.
    pub vaults: Vec<Vault>,
    /// Owner index, ids in creation order.
    pub owners: BTreeMap<Address, Vec<VaultId>>,
}

/// Vault store backed by a `HashMap` behind a single `RwLock`.
///
/// Records and the owner index share the lock, so an insert and its index
/// append are never observed separately.
#[derive(Default)]
pub struct MemoryVaultStore {
    inner: RwLock<Inner>,
}

impl MemoryVaultStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::IndexMismatch`] (as `MalformedInput`) unless
    /// every vault appears exactly once in its owner's index and every
    /// indexed id has a record.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> VaultResult<Self> {
        let mut vaults = HashMap::with_capacity(snapshot.vaults.len());
        for vault in snapshot.vaults {
            let id = vault.id().clone();
            if vaults.contains_key(&id) {
                return Err(index_mismatch(&id));
            }
            vaults.insert(id, vault);
        }

        let mut indexed = HashSet::with_capacity(vaults.len());
        for (owner, ids) in &snapshot.owners {
            for id in ids {
                let owned = vaults.get(id).is_some_and(|v| v.owner() == *owner);
                if !owned || !indexed.insert(id.clone()) {
                    return Err(index_mismatch(id));
                }
            }
        }
        if let Some(id) = vaults.keys().find(|id| !indexed.contains(*id)) {
            return Err(index_mismatch(id));
        }

        Ok(Self {
            inner: RwLock::new(Inner {
                vaults,
                owners: snapshot.owners.into_iter().collect(),
            }),
        })
    }

    /// Copies the current contents into a serializable snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Lock`] if the store lock is poisoned.
    pub fn snapshot(&self) -> VaultResult<StoreSnapshot> {
        let inner = self.inner.read().map_err(|e| poisoned(&e))?;
        let mut vaults: Vec<Vault> = inner.vaults.values().cloned().collect();
        vaults.sort_by(|a, b| a.id().cmp(b.id()));
        let owners = inner
            .owners
            .iter()
            .map(|(owner, ids)| (*owner, ids.clone()))
            .collect();
        Ok(StoreSnapshot { vaults, owners })
    }

    /// Number of stored vaults.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Lock`] if the store lock is poisoned.
    pub fn len(&self) -> VaultResult<usize> {
        Ok(self.inner.read().map_err(|e| poisoned(&e))?.vaults.len())
    }

    /// Whether the store holds no vaults.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Lock`] if the store lock is poisoned.
    pub fn is_empty(&self) -> VaultResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn index_mismatch(id: &VaultId) -> VaultError {
    CodecError::IndexMismatch { id: id.to_string() }.into()
}

impl VaultStore for MemoryVaultStore {
    fn get(&self, id: &VaultId) -> VaultResult<Option<Vault>> {
        let inner = self.inner.read().map_err(|e| poisoned(&e))?;
        Ok(inner.vaults.get(id).cloned())
    }

    fn insert(&self, vault: Vault) -> VaultResult<()> {
        let mut inner = self.inner.write().map_err(|e| poisoned(&e))?;
        if inner.vaults.contains_key(vault.id()) {
            return Err(VaultError::AlreadyExists);
        }
        inner
            .owners
            .entry(vault.owner())
            .or_default()
            .push(vault.id().clone());
        inner.vaults.insert(vault.id().clone(), vault);
        Ok(())
    }

    fn replace(&self, vault: Vault) -> VaultResult<()> {
        let mut inner = self.inner.write().map_err(|e| poisoned(&e))?;
        let slot = inner
            .vaults
            .get_mut(vault.id())
            .ok_or(VaultError::NotFound)?;
        *slot = vault;
        Ok(())
    }

    fn owned_ids(&self, owner: Address) -> VaultResult<Vec<VaultId>> {
        let inner = self.inner.read().map_err(|e| poisoned(&e))?;
        Ok(inner.owners.get(&owner).cloned().unwrap_or_default())
    }

    fn owned_count(&self, owner: Address) -> VaultResult<usize> {
        let inner = self.inner.read().map_err(|e| poisoned(&e))?;
        Ok(inner.owners.get(&owner).map_or(0, Vec::len))
    }

    fn owned_id(&self, owner: Address, index: usize) -> VaultResult<Option<VaultId>> {
        let inner = self.inner.read().map_err(|e| poisoned(&e))?;
        Ok(inner
            .owners
            .get(&owner)
            .and_then(|ids| ids.get(index))
            .cloned())
    }
}

// =============================================================================
// Memory Lock Manager
// =============================================================================

/// Lock manager holding one `Mutex` per vault id.
///
/// An id's entry exists only while some caller holds or awaits its lock.
#[derive(Default)]
pub struct MemoryLockManager {
    locks: RwLock<HashMap<VaultId, Arc<Mutex<()>>>>,
}

impl MemoryLockManager {
    /// Creates a lock manager with no tracked ids.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets or creates the lock for `id`.
    fn get_lock(&self, id: &VaultId) -> VaultResult<Arc<Mutex<()>>> {
        {
            let locks = self.locks.read().map_err(|e| poisoned(&e))?;
            if let Some(lock) = locks.get(id) {
                return Ok(Arc::clone(lock));
            }
        }

        let mut locks = self.locks.write().map_err(|e| poisoned(&e))?;
        Ok(Arc::clone(
            locks
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        ))
    }

    /// Drops the table entry for `id` once no other caller holds `lock`.
    fn release(&self, id: &VaultId, lock: &Arc<Mutex<()>>) -> VaultResult<()> {
        let mut locks = self.locks.write().map_err(|e| poisoned(&e))?;
        // One reference in the table, one here; clones only happen under
        // the table lock, so the count cannot rise while we hold it.
        if Arc::strong_count(lock) == 2 {
            locks.remove(id);
        }
        Ok(())
    }

    /// Number of ids whose lock is currently held or awaited.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Lock`] if the lock table is poisoned.
    pub fn tracked(&self) -> VaultResult<usize> {
        Ok(self.locks.read().map_err(|e| poisoned(&e))?.len())
    }
}

impl VaultLockManager for MemoryLockManager {
    fn with_vault_lock<R, F>(&self, id: &VaultId, f: F) -> VaultResult<R>
    where
        F: FnOnce() -> VaultResult<R>,
    {
        let lock = self.get_lock(id)?;
        let result = {
            let _guard = lock.lock().map_err(|e| poisoned(&e))?;
            f()
        };
        self.release(id, &lock)?;
        result
    }

    fn try_with_vault_lock<R, F>(&self, id: &VaultId, f: F) -> VaultResult<Option<R>>
    where
        F: FnOnce() -> VaultResult<R>,
    {
        let lock = self.get_lock(id)?;
        let result = match lock.try_lock() {
            Ok(guard) => {
                let result = f();
                drop(guard);
                result.map(Some)
            }
            Err(TryLockError::WouldBlock) => Ok(None),
            Err(TryLockError::Poisoned(e)) => return Err(poisoned(&e)),
        };
        self.release(id, &lock)?;
        result
    }
}
