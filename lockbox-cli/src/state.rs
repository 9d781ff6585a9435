//! The persisted local ledger: vault store, block clock and balances.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::{Address, U256};
use eyre::{bail, eyre, WrapErr};
use lockbox_core::{
    BlockHeight, CommitmentScheme, HashAlgorithm, LockBox, MemoryLockManager, MemoryVaultStore,
    StoreSnapshot, Transfer,
};
use serde::{Deserialize, Serialize};

/// Everything the CLI persists between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerState {
    /// Hash primitive every commitment in this ledger was made with.
    pub hash: HashAlgorithm,
    /// Current block height.
    pub block_height: BlockHeight,
    /// Vault records and owner index.
    pub store: StoreSnapshot,
    /// Account balances credited by transfers.
    pub balances: BTreeMap<Address, U256>,
}

impl LedgerState {
    /// A fresh ledger at height zero.
    pub fn new(hash: HashAlgorithm) -> Self {
        Self {
            hash,
            ..Self::default()
        }
    }

    /// Loads the ledger at `path`, or starts a fresh one if none exists.
    ///
    /// A `requested` hash that differs from the one the ledger was created
    /// with is refused: existing commitments would no longer verify.
    pub fn load_or_init(path: &Path, requested: Option<HashAlgorithm>) -> eyre::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "starting new ledger");
            return Ok(Self::new(requested.unwrap_or_default()));
        }
        let bytes =
            fs::read(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let state: Self = serde_json::from_slice(&bytes)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        if let Some(requested) = requested {
            if requested != state.hash {
                bail!(
                    "ledger {} uses {}, refusing to open it with {requested}",
                    path.display(),
                    state.hash
                );
            }
        }
        Ok(state)
    }

    /// Writes the ledger to `path` atomically.
    pub fn save(&self, path: &Path) -> eyre::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(self).wrap_err("failed to encode ledger")?;
        write_atomic(path, &bytes)
    }

    /// Rebuilds the in-memory lock box over the stored vaults.
    pub fn lockbox(&self) -> eyre::Result<LockBox> {
        let store = MemoryVaultStore::from_snapshot(self.store.clone())
            .wrap_err("ledger holds an inconsistent vault store")?;
        Ok(LockBox::with_components(
            store,
            MemoryLockManager::new(),
            CommitmentScheme::new(self.hash),
        ))
    }

    /// Takes the store back from `lockbox` after a mutation.
    pub fn commit(&mut self, lockbox: &LockBox) -> eyre::Result<()> {
        self.store = lockbox
            .store()
            .snapshot()
            .wrap_err("failed to snapshot vault store")?;
        Ok(())
    }

    /// Credits the recipient of `transfer`.
    pub fn credit(&mut self, transfer: &Transfer) -> eyre::Result<()> {
        let balance = self.balances.entry(transfer.recipient).or_default();
        *balance = balance
            .checked_add(transfer.amount)
            .ok_or_else(|| eyre!("balance of {} overflows", transfer.recipient))?;
        Ok(())
    }

    /// Balance of `account`.
    pub fn balance(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    /// Height the next mutating command executes at.
    pub fn next_height(&self) -> eyre::Result<BlockHeight> {
        self.block_height
            .checked_add(1)
            .ok_or_else(|| eyre!("block height overflows"))
    }

    /// Advances the clock by `blocks`.
    pub fn mine(&mut self, blocks: u64) -> eyre::Result<BlockHeight> {
        self.block_height = self
            .block_height
            .checked_add(blocks)
            .ok_or_else(|| eyre!("block height overflows"))?;
        Ok(self.block_height)
    }
}

/// The default ledger location under the user's data directory.
pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("lockbox").join("state.json"))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> eyre::Result<()> {
    let tmp_path = PathBuf::from(format!("{}.tmp", path.to_string_lossy()));
    let result = fs::write(&tmp_path, bytes)
        .wrap_err_with(|| format!("failed to write {}", tmp_path.display()))
        .and_then(|()| {
            fs::rename(&tmp_path, path).wrap_err_with(|| {
                format!("failed to rename {} to {}", tmp_path.display(), path.display())
            })
        });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
