//! Common fixtures shared across integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code, missing_docs)]

use std::sync::Once;

use alloy_primitives::{address, Address, U256};
use lockbox_core::{Challenge, HashAlgorithm, LockBox, NewVault, Question, VaultId};
use tracing_subscriber::EnvFilter;

pub const OWNER: Address = address!("0x00000000000000000000000000000000000000a1");
pub const CLAIMANT: Address = address!("0x00000000000000000000000000000000000000c3");
pub const STRANGER: Address = address!("0x00000000000000000000000000000000000000d4");
pub const RECIPIENT: Address = address!("0x00000000000000000000000000000000000000e5");

pub const QUESTIONS: [(&str, &str); 3] = [
    ("Name of your first pet?", "rex"),
    ("City you were born in?", "lisbon"),
    ("Favourite colour?", "green"),
];

static TRACING: Once = Once::new();

/// Installs a test subscriber honouring `RUST_LOG`, once per binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn lockbox() -> LockBox {
    init_tracing();
    LockBox::in_memory(HashAlgorithm::Keccak256)
}

pub fn id(name: &str) -> VaultId {
    VaultId::from_name(name).expect("vault id")
}

/// A creation request over the first `count` fixture questions.
pub fn request(lockbox: &LockBox, name: &str, count: usize, threshold: u8) -> NewVault {
    let questions: Vec<Question> = QUESTIONS[..count]
        .iter()
        .map(|(hint, answer)| Question::new(*hint, *answer))
        .collect();
    Challenge::build(lockbox.scheme(), &questions)
        .expect("challenge")
        .into_request(id(name))
        .with_threshold(threshold)
}

/// Revealed answers for the first `count` fixture questions, keeping only
/// the positions in `answered`.
pub fn reveal(lockbox: &LockBox, count: usize, answered: &[usize]) -> Vec<u8> {
    let answers: Vec<Option<&str>> = QUESTIONS[..count]
        .iter()
        .enumerate()
        .map(|(i, (_, answer))| answered.contains(&i).then_some(*answer))
        .collect();
    Challenge::reveal_answers(lockbox.scheme(), &answers)
}

pub fn value(amount: u64) -> U256 {
    U256::from(amount)
}
