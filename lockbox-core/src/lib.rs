//! Knowledge-gated value vaults.
//!
//! A vault holds value behind a set of security questions. Its owner may
//! spend from it freely until someone proves knowledge of enough answers;
//! that proof starts an unlocking period, after which the prover alone may
//! redeem the remaining value.
//!
//! ```
//! use alloy_primitives::{address, U256};
//! use lockbox_core::{Challenge, HashAlgorithm, LockBox, Question, VaultId, VaultStatus};
//!
//! let owner = address!("0x00000000000000000000000000000000000000a1");
//! let claimant = address!("0x00000000000000000000000000000000000000c3");
//! let lockbox = LockBox::in_memory(HashAlgorithm::Keccak256);
//!
//! let id = VaultId::from_name("savings")?;
//! let request = Challenge::build(lockbox.scheme(), &[Question::new("First pet?", "rex")])?
//!     .into_request(id.clone())
//!     .with_unlocking_period(2)
//!     .with_value(U256::from(1000));
//! lockbox.create(request, owner, 5)?;
//!
//! let revealed = Challenge::reveal_answers(lockbox.scheme(), &[Some("rex")]);
//! let vault = lockbox.trigger_unlock(&id, &revealed, claimant, 10)?;
//! assert_eq!(vault.unlocked_at(), 13);
//! assert_eq!(lockbox.view(&id, 13)?.status, VaultStatus::Redeemable);
//!
//! let transfer = lockbox.redeem(&id, U256::from(500), claimant, claimant, 13)?;
//! assert_eq!(transfer.amount, U256::from(500));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod challenge;
pub mod codec;
pub mod commitment;
pub mod ledger;

mod error;
pub use error::*;

mod machine;
pub use machine::*;

mod vault;
pub use vault::*;

pub use challenge::{Challenge, Question};
pub use commitment::{CommitmentScheme, HashAlgorithm, HashPrimitive};
pub use ledger::{
    MemoryLockManager, MemoryVaultStore, StoreSnapshot, Transfer, TransferKind, VaultLockManager,
    VaultStore,
};
