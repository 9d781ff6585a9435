//! The vault record, its derived status and its state transitions.
//!
//! Transition methods check every precondition before touching any field, so
//! a returned error always leaves the record exactly as it was.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::Display;

use crate::codec::{self, CodecError};
use crate::commitment::{CommitmentScheme, HashPrimitive};
use crate::error::{VaultError, VaultResult};

/// Reading of the external monotonic clock (e.g. a block height).
pub type BlockHeight = u64;

/// Opaque, non-empty vault identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VaultId(Vec<u8>);

impl VaultId {
    /// Creates an id from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyId`] if `bytes` is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CodecError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CodecError::EmptyId);
        }
        Ok(Self(bytes))
    }

    /// Creates an id from the UTF-8 bytes of a human-readable name.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyId`] if `name` is empty.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        Self::new(name.as_bytes())
    }

    /// Raw id bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The id as text, if its bytes are valid UTF-8.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VaultId({self})")
    }
}

/// Parses `0x`-prefixed hex as raw bytes and anything else as a name.
impl FromStr for VaultId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("0x") {
            Some(digits) => {
                let bytes = hex::decode(digits).map_err(|_| CodecError::InvalidIdHex)?;
                Self::new(bytes)
            }
            None => Self::from_name(s),
        }
    }
}

impl Serialize for VaultId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VaultId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| serde::de::Error::custom("vault id must be 0x-prefixed hex"))?;
        let bytes = hex::decode(digits).map_err(serde::de::Error::custom)?;
        Self::new(bytes).map_err(serde::de::Error::custom)
    }
}

/// Status derived from `unlocked_at` and the current clock reading.
///
/// Never stored: the clock advances independently of vault mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VaultStatus {
    /// Not yet triggered.
    Locked,
    /// Triggered, unlocking period still running.
    Unlocking,
    /// Triggered and past `unlocked_at`.
    Redeemable,
}

/// Parameters for creating a vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVault {
    /// Identifier of the new vault.
    pub id: VaultId,
    /// Hints blob (see [`codec::encode_hints`]).
    pub hints: Bytes,
    /// Commitments blob (see [`codec::encode_commitments`]).
    pub answer_commitments: Bytes,
    /// Number of correct answers needed to trigger.
    pub num_answers_required: u8,
    /// Delay in clock ticks between trigger and redeemability.
    pub unlocking_period: u64,
    /// Whether the owner keeps spend rights after a trigger.
    pub spendable_once_unlocked: bool,
    /// Value locked at creation.
    pub value: U256,
}

impl NewVault {
    /// Starts a creation request with a 1-answer threshold, no unlocking
    /// period, no post-unlock spending and zero value.
    #[must_use]
    pub const fn new(id: VaultId, hints: Bytes, answer_commitments: Bytes) -> Self {
        Self {
            id,
            hints,
            answer_commitments,
            num_answers_required: 1,
            unlocking_period: 0,
            spendable_once_unlocked: false,
            value: U256::ZERO,
        }
    }

    /// Sets the answer threshold.
    #[must_use]
    pub fn with_threshold(mut self, num_answers_required: u8) -> Self {
        self.num_answers_required = num_answers_required;
        self
    }

    /// Sets the unlocking period.
    #[must_use]
    pub fn with_unlocking_period(mut self, unlocking_period: u64) -> Self {
        self.unlocking_period = unlocking_period;
        self
    }

    /// Sets whether the owner may spend after a trigger.
    #[must_use]
    pub fn with_spendable_once_unlocked(mut self, spendable: bool) -> Self {
        self.spendable_once_unlocked = spendable;
        self
    }

    /// Sets the value locked at creation.
    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// A value vault gated by security questions and an unlocking period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VaultRecord", into = "VaultRecord")]
pub struct Vault {
    id: VaultId,
    owner: Address,
    value: U256,
    created_at: BlockHeight,
    unlocked_at: BlockHeight,
    unlocking_period: u64,
    redeemable_by: Option<Address>,
    num_answers_required: u8,
    spendable_once_unlocked: bool,
    hints_blob: Bytes,
    commitments_blob: Bytes,
    hints: Vec<String>,
    answer_commitments: Vec<B256>,
}

impl Vault {
    /// Builds a fresh, untriggered vault owned by `owner`.
    pub(crate) fn open(
        request: &NewVault,
        owner: Address,
        now: BlockHeight,
    ) -> VaultResult<Self> {
        let (hints, answer_commitments) = decode_terms(
            &request.hints,
            &request.answer_commitments,
            request.num_answers_required,
        )?;
        Ok(Self {
            id: request.id.clone(),
            owner,
            value: request.value,
            created_at: now,
            unlocked_at: 0,
            unlocking_period: request.unlocking_period,
            redeemable_by: None,
            num_answers_required: request.num_answers_required,
            spendable_once_unlocked: request.spendable_once_unlocked,
            hints_blob: request.hints.clone(),
            commitments_blob: request.answer_commitments.clone(),
            hints,
            answer_commitments,
        })
    }

    /// Vault identifier.
    #[must_use]
    pub const fn id(&self) -> &VaultId {
        &self.id
    }

    /// Creator of the vault.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Currently locked value.
    #[must_use]
    pub const fn value(&self) -> U256 {
        self.value
    }

    /// Clock reading at creation.
    #[must_use]
    pub const fn created_at(&self) -> BlockHeight {
        self.created_at
    }

    /// Clock reading from which the vault is redeemable; `0` while untriggered.
    #[must_use]
    pub const fn unlocked_at(&self) -> BlockHeight {
        self.unlocked_at
    }

    /// Delay between a trigger and redeemability.
    #[must_use]
    pub const fn unlocking_period(&self) -> u64 {
        self.unlocking_period
    }

    /// The identity that triggered the vault, once it has been triggered.
    #[must_use]
    pub const fn redeemable_by(&self) -> Option<Address> {
        self.redeemable_by
    }

    /// Number of correct answers needed to trigger.
    #[must_use]
    pub const fn num_answers_required(&self) -> u8 {
        self.num_answers_required
    }

    /// Whether the owner keeps spend rights after a trigger.
    #[must_use]
    pub const fn spendable_once_unlocked(&self) -> bool {
        self.spendable_once_unlocked
    }

    /// Hint texts, in question order.
    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Answer commitments, aligned with [`Self::hints`].
    #[must_use]
    pub fn answer_commitments(&self) -> &[B256] {
        &self.answer_commitments
    }

    /// Number of questions.
    #[must_use]
    pub fn num_questions(&self) -> usize {
        self.hints.len()
    }

    /// Hints blob exactly as persisted.
    #[must_use]
    pub const fn hints_blob(&self) -> &Bytes {
        &self.hints_blob
    }

    /// Commitments blob exactly as persisted.
    #[must_use]
    pub const fn commitments_blob(&self) -> &Bytes {
        &self.commitments_blob
    }

    /// Whether a successful trigger has been recorded.
    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        self.unlocked_at != 0
    }

    /// Status at clock reading `now`.
    #[must_use]
    pub const fn status(&self, now: BlockHeight) -> VaultStatus {
        if self.unlocked_at == 0 {
            VaultStatus::Locked
        } else if self.unlocked_at > now {
            VaultStatus::Unlocking
        } else {
            VaultStatus::Redeemable
        }
    }

    /// Whether `caller` would currently be allowed to spend.
    ///
    /// Matches the rule enforced on spend: any trigger, including
    /// one whose unlock height equals the current reading, removes spend
    /// rights unless `spendable_once_unlocked` is set.
    #[must_use]
    pub fn can_spend(&self, caller: Address) -> bool {
        caller == self.owner && (!self.is_triggered() || self.spendable_once_unlocked)
    }

    /// Whether `caller` would be allowed to redeem at `now`.
    #[must_use]
    pub fn can_redeem(&self, caller: Address, now: BlockHeight) -> bool {
        self.status(now) == VaultStatus::Redeemable && self.redeemable_by == Some(caller)
    }

    /// Whether a trigger can still be attempted.
    #[must_use]
    pub const fn can_trigger(&self) -> bool {
        !self.is_triggered()
    }

    pub(crate) fn add_value(&mut self, amount: U256) -> VaultResult<()> {
        self.value = self
            .value
            .checked_add(amount)
            .ok_or(VaultError::ValueOverflow)?;
        Ok(())
    }

    pub(crate) fn spend(&mut self, caller: Address, amount: U256) -> VaultResult<()> {
        if caller != self.owner {
            return Err(VaultError::Unauthorized);
        }
        if self.is_triggered() && !self.spendable_once_unlocked {
            return Err(VaultError::PostUnlockSpendDenied);
        }
        self.withdraw(amount)
    }

    /// Verifies revealed answers and, on success, starts the unlocking period.
    ///
    /// Returns the number of answers that verified.
    pub(crate) fn trigger_unlock<H: HashPrimitive>(
        &mut self,
        scheme: &CommitmentScheme<H>,
        revealed: &[u8],
        caller: Address,
        now: BlockHeight,
    ) -> VaultResult<usize> {
        if self.is_triggered() {
            return Err(VaultError::AlreadyTriggered);
        }
        let revealed = codec::decode_revealed_answers(revealed, self.num_questions())?;
        let correct = self
            .answer_commitments
            .iter()
            .zip(&revealed)
            .filter(|(commitment, answer)| scheme.verify(commitment, answer))
            .count();
        if correct < usize::from(self.num_answers_required) {
            return Err(VaultError::InsufficientAnswers {
                correct,
                required: self.num_answers_required,
            });
        }
        // The trigger occupies `now`; the period starts on the next tick.
        let unlocked_at = now
            .checked_add(1)
            .and_then(|next| next.checked_add(self.unlocking_period))
            .ok_or(VaultError::ClockOverflow)?;
        self.unlocked_at = unlocked_at;
        self.redeemable_by = Some(caller);
        Ok(correct)
    }

    pub(crate) fn redeem(
        &mut self,
        caller: Address,
        amount: U256,
        now: BlockHeight,
    ) -> VaultResult<()> {
        if self.status(now) != VaultStatus::Redeemable {
            return Err(VaultError::StillLocked);
        }
        if self.redeemable_by != Some(caller) {
            return Err(VaultError::Unauthorized);
        }
        self.withdraw(amount)
    }

    fn withdraw(&mut self, amount: U256) -> VaultResult<()> {
        self.value = self
            .value
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientValue)?;
        Ok(())
    }
}

fn decode_terms(
    hints_blob: &[u8],
    commitments_blob: &[u8],
    num_answers_required: u8,
) -> VaultResult<(Vec<String>, Vec<B256>)> {
    let hints = codec::decode_hints(hints_blob)?;
    let commitments = codec::decode_commitments(commitments_blob)?;
    if hints.len() != commitments.len() {
        return Err(CodecError::CountMismatch {
            hints: hints.len(),
            commitments: commitments.len(),
        }
        .into());
    }
    if num_answers_required == 0 || usize::from(num_answers_required) > hints.len() {
        return Err(VaultError::InvalidThreshold {
            required: num_answers_required,
            questions: hints.len(),
        });
    }
    Ok((hints, commitments))
}

/// Persisted form of a [`Vault`]: scalar fields plus the raw blobs.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultRecord {
    id: VaultId,
    owner: Address,
    value: U256,
    created_at: BlockHeight,
    unlocked_at: BlockHeight,
    unlocking_period: u64,
    redeemable_by: Option<Address>,
    num_answers_required: u8,
    spendable_once_unlocked: bool,
    hints: Bytes,
    answers: Bytes,
}

impl From<Vault> for VaultRecord {
    fn from(vault: Vault) -> Self {
        Self {
            id: vault.id,
            owner: vault.owner,
            value: vault.value,
            created_at: vault.created_at,
            unlocked_at: vault.unlocked_at,
            unlocking_period: vault.unlocking_period,
            redeemable_by: vault.redeemable_by,
            num_answers_required: vault.num_answers_required,
            spendable_once_unlocked: vault.spendable_once_unlocked,
            hints: vault.hints_blob,
            answers: vault.commitments_blob,
        }
    }
}

impl TryFrom<VaultRecord> for Vault {
    type Error = VaultError;

    fn try_from(record: VaultRecord) -> VaultResult<Self> {
        let (hints, answer_commitments) =
            decode_terms(&record.hints, &record.answers, record.num_answers_required)?;
        if (record.unlocked_at == 0) != record.redeemable_by.is_none() {
            return Err(CodecError::InconsistentTrigger {
                unlocked_at: record.unlocked_at,
            }
            .into());
        }
        Ok(Self {
            id: record.id,
            owner: record.owner,
            value: record.value,
            created_at: record.created_at,
            unlocked_at: record.unlocked_at,
            unlocking_period: record.unlocking_period,
            redeemable_by: record.redeemable_by,
            num_answers_required: record.num_answers_required,
            spendable_once_unlocked: record.spendable_once_unlocked,
            hints_blob: record.hints,
            commitments_blob: record.answers,
            hints,
            answer_commitments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_commitments, encode_hints, encode_revealed_answers};
    use crate::commitment::HashAlgorithm;
    use alloy_primitives::address;

    const OWNER: Address = address!("0x00000000000000000000000000000000000000a1");
    const OTHER: Address = address!("0x00000000000000000000000000000000000000b2");

    fn scheme() -> CommitmentScheme {
        CommitmentScheme::new(HashAlgorithm::Keccak256)
    }

    fn request(answers: &[&str], threshold: u8) -> NewVault {
        let scheme = scheme();
        let hints: Vec<String> = (0..answers.len()).map(|i| format!("q{i}")).collect();
        let commitments: Vec<B256> =
            answers.iter().map(|a| scheme.commit(a.as_bytes())).collect();
        NewVault::new(
            VaultId::from_name("vault").unwrap(),
            encode_hints(&hints).unwrap().into(),
            encode_commitments(&commitments).unwrap().into(),
        )
        .with_threshold(threshold)
        .with_unlocking_period(2)
        .with_value(U256::from(1000))
    }

    fn reveal(answers: &[Option<&str>]) -> Vec<u8> {
        let scheme = scheme();
        let revealed: Vec<B256> = answers
            .iter()
            .map(|a| a.map_or(B256::ZERO, |a| scheme.reveal(a.as_bytes())))
            .collect();
        encode_revealed_answers(&revealed)
    }

    #[test]
    fn test_open_sets_initial_state() {
        let vault = Vault::open(&request(&["a", "b"], 2), OWNER, 5).unwrap();
        assert_eq!(vault.owner(), OWNER);
        assert_eq!(vault.created_at(), 5);
        assert_eq!(vault.unlocked_at(), 0);
        assert_eq!(vault.redeemable_by(), None);
        assert_eq!(vault.hints(), ["q0", "q1"]);
        assert_eq!(vault.num_questions(), 2);
        assert_eq!(vault.status(5), VaultStatus::Locked);
        assert_eq!(vault.status(u64::MAX), VaultStatus::Locked);
    }

    #[test]
    fn test_open_rejects_bad_threshold() {
        assert_eq!(
            Vault::open(&request(&["a"], 0), OWNER, 1).unwrap_err(),
            VaultError::InvalidThreshold {
                required: 0,
                questions: 1
            }
        );
        assert_eq!(
            Vault::open(&request(&["a", "b"], 3), OWNER, 1).unwrap_err(),
            VaultError::InvalidThreshold {
                required: 3,
                questions: 2
            }
        );
    }

    #[test]
    fn test_open_rejects_zero_questions() {
        let empty: [&str; 0] = [];
        let request = NewVault::new(
            VaultId::from_name("empty").unwrap(),
            encode_hints(&empty).unwrap().into(),
            encode_commitments(&[]).unwrap().into(),
        );
        assert!(matches!(
            Vault::open(&request, OWNER, 1),
            Err(VaultError::InvalidThreshold { questions: 0, .. })
        ));
    }

    #[test]
    fn test_open_rejects_count_mismatch() {
        let mut request = request(&["a", "b"], 1);
        request.hints = encode_hints(&["only one"]).unwrap().into();
        assert_eq!(
            Vault::open(&request, OWNER, 1).unwrap_err(),
            VaultError::MalformedInput(CodecError::CountMismatch {
                hints: 1,
                commitments: 2
            })
        );
    }

    #[test]
    fn test_status_boundaries() {
        let mut vault = Vault::open(&request(&["a"], 1), OWNER, 5).unwrap();
        vault
            .trigger_unlock(&scheme(), &reveal(&[Some("a")]), OTHER, 10)
            .unwrap();
        assert_eq!(vault.unlocked_at(), 13);
        assert_eq!(vault.status(10), VaultStatus::Unlocking);
        assert_eq!(vault.status(12), VaultStatus::Unlocking);
        assert_eq!(vault.status(13), VaultStatus::Redeemable);
        assert_eq!(vault.status(14), VaultStatus::Redeemable);
    }

    #[test]
    fn test_threshold_counts_only_verified_answers() {
        let mut vault = Vault::open(&request(&["a", "b", "c"], 2), OWNER, 1).unwrap();
        let err = vault
            .trigger_unlock(&scheme(), &reveal(&[Some("a"), None, Some("wrong")]), OTHER, 2)
            .unwrap_err();
        assert_eq!(
            err,
            VaultError::InsufficientAnswers {
                correct: 1,
                required: 2
            }
        );
        assert!(!vault.is_triggered());

        let correct = vault
            .trigger_unlock(&scheme(), &reveal(&[None, Some("b"), Some("c")]), OTHER, 2)
            .unwrap();
        assert_eq!(correct, 2);
        assert_eq!(vault.redeemable_by(), Some(OTHER));
    }

    #[test]
    fn test_answers_are_positional() {
        let mut vault = Vault::open(&request(&["a", "b"], 1), OWNER, 1).unwrap();
        let err = vault
            .trigger_unlock(&scheme(), &reveal(&[Some("b"), Some("a")]), OTHER, 2)
            .unwrap_err();
        assert!(matches!(err, VaultError::InsufficientAnswers { correct: 0, .. }));
    }

    #[test]
    fn test_trigger_rejects_wrong_blob_length() {
        let mut vault = Vault::open(&request(&["a", "b"], 1), OWNER, 1).unwrap();
        let err = vault
            .trigger_unlock(&scheme(), &reveal(&[Some("a")]), OTHER, 2)
            .unwrap_err();
        assert!(matches!(err, VaultError::MalformedInput(_)));
        assert_eq!(vault.unlocked_at(), 0);
    }

    #[test]
    fn test_trigger_clock_overflow_leaves_vault_untouched() {
        let mut request = request(&["a"], 1);
        request.unlocking_period = u64::MAX;
        let mut vault = Vault::open(&request, OWNER, 1).unwrap();
        let before = vault.clone();
        assert_eq!(
            vault
                .trigger_unlock(&scheme(), &reveal(&[Some("a")]), OTHER, 1)
                .unwrap_err(),
            VaultError::ClockOverflow
        );
        assert_eq!(vault, before);
    }

    #[test]
    fn test_spend_checks_in_order() {
        let mut vault = Vault::open(&request(&["a"], 1), OWNER, 1).unwrap();
        assert_eq!(
            vault.spend(OTHER, U256::from(5000)).unwrap_err(),
            VaultError::Unauthorized
        );
        assert_eq!(
            vault.spend(OWNER, U256::from(1001)).unwrap_err(),
            VaultError::InsufficientValue
        );
        vault.spend(OWNER, U256::from(1000)).unwrap();
        assert_eq!(vault.value(), U256::ZERO);
        vault.spend(OWNER, U256::ZERO).unwrap();
    }

    #[test]
    fn test_can_spend_matches_spend_at_unlock_height() {
        let mut vault = Vault::open(&request(&["a"], 1), OWNER, 1).unwrap();
        assert!(vault.can_spend(OWNER));
        assert!(!vault.can_spend(OTHER));
        vault
            .trigger_unlock(&scheme(), &reveal(&[Some("a")]), OTHER, 4)
            .unwrap();
        assert!(!vault.can_spend(OWNER));
        assert_eq!(
            vault.clone().spend(OWNER, U256::from(1)).unwrap_err(),
            VaultError::PostUnlockSpendDenied
        );
        assert!(!vault.can_redeem(OTHER, 6));
        assert!(vault.can_redeem(OTHER, 7));
        assert!(!vault.can_redeem(OWNER, 7));
    }

    #[test]
    fn test_add_value_overflow() {
        let mut vault = Vault::open(&request(&["a"], 1), OWNER, 1).unwrap();
        vault.add_value(U256::MAX - U256::from(1000)).unwrap();
        assert_eq!(vault.value(), U256::MAX);
        assert_eq!(
            vault.add_value(U256::from(1)).unwrap_err(),
            VaultError::ValueOverflow
        );
        assert_eq!(vault.value(), U256::MAX);
    }

    #[test]
    fn test_vault_id_parsing_and_display() {
        let id = VaultId::from_name("X").unwrap();
        assert_eq!(id.to_string(), "0x58");
        assert_eq!("X".parse::<VaultId>().unwrap(), id);
        assert_eq!("0x58".parse::<VaultId>().unwrap(), id);
        assert_eq!(id.as_name(), Some("X"));
        assert_eq!(VaultId::new(Vec::new()).unwrap_err(), CodecError::EmptyId);
        assert!("".parse::<VaultId>().is_err());
        assert!("0x".parse::<VaultId>().is_err());
        assert!("0xzz".parse::<VaultId>().is_err());
    }

    #[test]
    fn test_persisted_form_keeps_blobs() {
        let mut vault = Vault::open(&request(&["a", "b"], 1), OWNER, 3).unwrap();
        vault
            .trigger_unlock(&scheme(), &reveal(&[Some("a"), None]), OTHER, 4)
            .unwrap();
        let json = serde_json::to_value(&vault).unwrap();
        assert_eq!(json["id"], "0x7661756c74");
        assert_eq!(json["unlockedAt"], 7);
        assert_eq!(json["hints"], vault.hints_blob().to_string());
        let restored: Vault = serde_json::from_value(json).unwrap();
        assert_eq!(restored, vault);
    }

    #[test]
    fn test_persisted_form_is_validated() {
        let vault = Vault::open(&request(&["a"], 1), OWNER, 3).unwrap();
        let mut json = serde_json::to_value(&vault).unwrap();
        json["numAnswersRequired"] = 2.into();
        assert!(serde_json::from_value::<Vault>(json.clone()).is_err());

        json["numAnswersRequired"] = 1.into();
        json["redeemableBy"] = serde_json::Value::String(OTHER.to_string());
        assert!(serde_json::from_value::<Vault>(json).is_err());
    }
}
