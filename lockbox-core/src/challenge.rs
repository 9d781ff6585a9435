//! Creator- and claimant-side helpers for security-question challenges.
//!
//! A creator turns `(hint, answer)` pairs into the hints and commitments
//! blobs a vault is created with. A claimant turns the answers they know
//! into a revealed-answers blob, and can check locally how many of them
//! would verify before submitting a trigger.

use std::fmt;

use alloy_primitives::{Bytes, B256};
use secrecy::{ExposeSecret, SecretString};

use crate::codec::{self, CodecError, MAX_QUESTIONS};
use crate::commitment::{CommitmentScheme, HashPrimitive};
use crate::vault::{NewVault, VaultId};

/// A security question: a public hint and its secret answer.
pub struct Question {
    hint: String,
    answer: SecretString,
}

impl Question {
    /// Creates a question from a hint and its answer.
    #[must_use]
    pub fn new(hint: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            hint: hint.into(),
            answer: SecretString::from(answer.into()),
        }
    }

    /// The public hint.
    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("hint", &self.hint)
            .field("answer", &"[REDACTED]")
            .finish()
    }
}

/// Encoded hints and answer commitments ready for vault creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    hints: Bytes,
    answer_commitments: Bytes,
}

impl Challenge {
    /// Commits to each answer and encodes the hints and commitments.
    ///
    /// # Errors
    ///
    /// Returns an error if there are more than 255 questions or a hint is
    /// longer than 65535 bytes.
    pub fn build<H: HashPrimitive>(
        scheme: &CommitmentScheme<H>,
        questions: &[Question],
    ) -> Result<Self, CodecError> {
        if questions.len() > MAX_QUESTIONS {
            return Err(CodecError::TooManyEntries {
                count: questions.len(),
            });
        }
        let hints: Vec<&str> = questions.iter().map(Question::hint).collect();
        let commitments: Vec<B256> = questions
            .iter()
            .map(|question| scheme.commit(question.answer.expose_secret().as_bytes()))
            .collect();
        Ok(Self {
            hints: codec::encode_hints(&hints)?.into(),
            answer_commitments: codec::encode_commitments(&commitments)?.into(),
        })
    }

    /// The encoded hints blob.
    #[must_use]
    pub const fn hints(&self) -> &Bytes {
        &self.hints
    }

    /// The encoded commitments blob.
    #[must_use]
    pub const fn answer_commitments(&self) -> &Bytes {
        &self.answer_commitments
    }

    /// Starts a creation request for this challenge under `id`.
    #[must_use]
    pub fn into_request(self, id: VaultId) -> NewVault {
        NewVault::new(id, self.hints, self.answer_commitments)
    }

    /// Builds a revealed-answers blob, one entry per question.
    ///
    /// `None` and empty entries become the 32-byte zero placeholder.
    #[must_use]
    pub fn reveal_answers<H: HashPrimitive>(
        scheme: &CommitmentScheme<H>,
        answers: &[Option<&str>],
    ) -> Vec<u8> {
        let revealed: Vec<B256> = answers
            .iter()
            .map(|answer| {
                answered(*answer)
                    .map_or(B256::ZERO, |answer| scheme.reveal(answer.as_bytes()))
            })
            .collect();
        codec::encode_revealed_answers(&revealed)
    }

    /// Whether `answer` is the answer committed to by `commitment`.
    #[must_use]
    pub fn check_answer<H: HashPrimitive>(
        scheme: &CommitmentScheme<H>,
        commitment: &B256,
        answer: &str,
    ) -> bool {
        scheme.verify(commitment, &scheme.reveal(answer.as_bytes()))
    }

    /// Counts how many of `answers` match their positional commitment.
    ///
    /// Empty answers count as unanswered.
    #[must_use]
    pub fn count_correct<H: HashPrimitive>(
        scheme: &CommitmentScheme<H>,
        commitments: &[B256],
        answers: &[Option<&str>],
    ) -> usize {
        commitments
            .iter()
            .zip(answers)
            .filter(|(commitment, answer)| {
                answered(**answer)
                    .is_some_and(|answer| Self::check_answer(scheme, commitment, answer))
            })
            .count()
    }
}

fn answered(answer: Option<&str>) -> Option<&str> {
    answer.filter(|answer| !answer.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::HashAlgorithm;

    fn scheme() -> CommitmentScheme {
        CommitmentScheme::new(HashAlgorithm::Keccak256)
    }

    #[test]
    fn test_build_encodes_commitments() {
        let challenge =
            Challenge::build(&scheme(), &[Question::new("What is this?", "test")]).unwrap();
        assert_eq!(
            challenge.answer_commitments().to_string(),
            "0x01805dc8973ad04df3f1195bda4e1a00894dbedce0288eb8c6a3bf8d228616489e"
        );
        assert_eq!(
            codec::decode_hints(challenge.hints()).unwrap(),
            vec!["What is this?"]
        );
    }

    #[test]
    fn test_reveal_uses_zero_placeholders() {
        let blob = Challenge::reveal_answers(&scheme(), &[None, Some("test"), None]);
        assert_eq!(blob.len(), 96);
        assert!(blob[..32].iter().all(|b| *b == 0));
        assert_eq!(
            hex::encode(&blob[32..64]),
            "9c22ff5f21f0b81b113e63f7db6da94fedef11b2119b4088b89664fb9a3cb658"
        );
        assert!(blob[64..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_empty_answer_is_unanswered() {
        let scheme = scheme();
        let blob = Challenge::reveal_answers(&scheme, &[Some(""), Some("test")]);
        assert!(blob[..32].iter().all(|b| *b == 0));
        assert_eq!(blob, Challenge::reveal_answers(&scheme, &[None, Some("test")]));

        let commitments = [scheme.commit(b""), scheme.commit(b"test")];
        assert_eq!(
            Challenge::count_correct(&scheme, &commitments, &[Some(""), Some("test")]),
            1
        );
    }

    #[test]
    fn test_count_correct() {
        let scheme = scheme();
        let commitments = [scheme.commit(b"red"), scheme.commit(b"paris")];
        assert_eq!(
            Challenge::count_correct(&scheme, &commitments, &[Some("red"), Some("paris")]),
            2
        );
        assert_eq!(
            Challenge::count_correct(&scheme, &commitments, &[Some("Red"), None]),
            0
        );
        assert_eq!(
            Challenge::count_correct(&scheme, &commitments, &[None, Some("paris")]),
            1
        );
        assert!(Challenge::check_answer(&scheme, &commitments[0], "red"));
        assert!(!Challenge::check_answer(&scheme, &commitments[0], "red "));
    }

    #[test]
    fn test_build_rejects_too_many_questions() {
        let questions: Vec<Question> = (0..=MAX_QUESTIONS)
            .map(|i| Question::new(format!("q{i}"), "a"))
            .collect();
        assert_eq!(
            Challenge::build(&scheme(), &questions).unwrap_err(),
            CodecError::TooManyEntries { count: 256 }
        );
    }

    #[test]
    fn test_question_debug_redacts_answer() {
        let question = Question::new("pet", "rex");
        let debug = format!("{question:?}");
        assert!(debug.contains("pet"));
        assert!(!debug.contains("rex"));
    }

    #[test]
    fn test_into_request_defaults() {
        let challenge = Challenge::build(&scheme(), &[Question::new("h", "a")]).unwrap();
        let request = challenge
            .clone()
            .into_request(VaultId::from_name("id").unwrap());
        assert_eq!(&request.hints, challenge.hints());
        assert_eq!(request.num_answers_required, 1);
        assert_eq!(request.unlocking_period, 0);
        assert!(!request.spendable_once_unlocked);
    }
}
