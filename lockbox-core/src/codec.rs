//! Byte layouts for hints, answer commitments and revealed answers.
//!
//! These layouts are a compatibility boundary: vaults persisted by earlier
//! deployments carry blobs in exactly this shape, so encode and decode must
//! stay bit-exact. All integers are big-endian.

// Layout comments describe binary structure, not Rust identifiers
#![allow(clippy::doc_markdown)]

use alloy_primitives::B256;
use thiserror::Error;

/// Size of a single commitment or revealed answer in bytes.
pub const COMMITMENT_SIZE: usize = 32;

/// Largest number of questions a single vault can carry (1-byte count).
pub const MAX_QUESTIONS: usize = u8::MAX as usize;

/// Largest hint in bytes (2-byte length prefix).
pub const MAX_HINT_LEN: usize = u16::MAX as usize;

/// Size of the per-hint length prefix.
const HINT_LEN_PREFIX: usize = 2;

/// Errors raised while encoding or decoding vault blobs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The blob has no count byte.
    #[error("{context} blob is empty")]
    EmptyBlob {
        /// Which blob was being decoded.
        context: &'static str,
    },

    /// More entries than a 1-byte count can describe.
    #[error("too many entries: {count} (max {MAX_QUESTIONS})")]
    TooManyEntries {
        /// Number of entries supplied.
        count: usize,
    },

    /// A hint does not fit behind a 2-byte length prefix.
    #[error("hint {index} is {len} bytes (max {MAX_HINT_LEN})")]
    HintTooLong {
        /// Position of the offending hint.
        index: usize,
        /// Its UTF-8 length in bytes.
        len: usize,
    },

    /// The blob ended in the middle of a record.
    #[error("hints blob truncated in record {index}")]
    Truncated {
        /// Record being read when the data ran out.
        index: usize,
    },

    /// Bytes remain after the declared number of records.
    #[error("{remaining} trailing bytes after {count} hint records")]
    TrailingBytes {
        /// Declared record count.
        count: usize,
        /// Unconsumed bytes.
        remaining: usize,
    },

    /// A fixed-size blob has the wrong total length.
    #[error("{context} blob is {found} bytes, expected {expected}")]
    LengthMismatch {
        /// Which blob was being decoded.
        context: &'static str,
        /// Length implied by the declared or expected count.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// Hint text is not valid UTF-8.
    #[error("hint {index} is not valid UTF-8")]
    InvalidUtf8 {
        /// Position of the offending hint.
        index: usize,
    },

    /// The hints and commitments blobs describe different question counts.
    #[error("{hints} hints but {commitments} answer commitments")]
    CountMismatch {
        /// Number of decoded hints.
        hints: usize,
        /// Number of decoded commitments.
        commitments: usize,
    },

    /// A vault id must contain at least one byte.
    #[error("vault id is empty")]
    EmptyId,

    /// A `0x`-prefixed vault id is not valid hex.
    #[error("vault id is not valid hex")]
    InvalidIdHex,

    /// A persisted vault has `unlocked_at` and `redeemable_by` out of step.
    #[error("inconsistent trigger state (unlocked at {unlocked_at})")]
    InconsistentTrigger {
        /// Persisted unlock height.
        unlocked_at: u64,
    },

    /// A persisted owner index does not match the vault records.
    #[error("owner index is inconsistent for vault {id}")]
    IndexMismatch {
        /// Display form of the vault id.
        id: String,
    },
}

fn count_byte(count: usize) -> Result<u8, CodecError> {
    u8::try_from(count).map_err(|_| CodecError::TooManyEntries { count })
}

/// Encodes hints as a counted list of length-prefixed UTF-8 records.
///
/// # Binary Layout
///
/// ```text
/// Size  Field
/// ----  -----
/// 1     N (number of hints)
/// N x { 2: L (u16 BE), L: UTF-8 text }
/// ```
///
/// # Errors
///
/// Returns an error if there are more than 255 hints or a hint is longer
/// than 65535 bytes.
pub fn encode_hints<S: AsRef<str>>(hints: &[S]) -> Result<Vec<u8>, CodecError> {
    let count = count_byte(hints.len())?;
    let body: usize = hints
        .iter()
        .map(|hint| HINT_LEN_PREFIX + hint.as_ref().len())
        .sum();
    let mut out = Vec::with_capacity(1 + body);
    out.push(count);
    for (index, hint) in hints.iter().enumerate() {
        let text = hint.as_ref().as_bytes();
        let len = u16::try_from(text.len()).map_err(|_| CodecError::HintTooLong {
            index,
            len: text.len(),
        })?;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(text);
    }
    Ok(out)
}

/// Decodes a hints blob produced by [`encode_hints`].
///
/// # Errors
///
/// Returns an error if the blob is empty, a record is truncated, bytes
/// remain after the declared count, or a hint is not valid UTF-8.
pub fn decode_hints(blob: &[u8]) -> Result<Vec<String>, CodecError> {
    let (&count, mut rest) = blob
        .split_first()
        .ok_or(CodecError::EmptyBlob { context: "hints" })?;
    let count = usize::from(count);
    let mut hints = Vec::with_capacity(count);
    for index in 0..count {
        if rest.len() < HINT_LEN_PREFIX {
            return Err(CodecError::Truncated { index });
        }
        let (prefix, tail) = rest.split_at(HINT_LEN_PREFIX);
        let len = usize::from(u16::from_be_bytes([prefix[0], prefix[1]]));
        if tail.len() < len {
            return Err(CodecError::Truncated { index });
        }
        let (text, tail) = tail.split_at(len);
        let hint = std::str::from_utf8(text)
            .map_err(|_| CodecError::InvalidUtf8 { index })?
            .to_owned();
        hints.push(hint);
        rest = tail;
    }
    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes {
            count,
            remaining: rest.len(),
        });
    }
    Ok(hints)
}

/// Encodes commitments as a count byte followed by fixed 32-byte values.
///
/// # Binary Layout
///
/// ```text
/// Size    Field
/// ----    -----
/// 1       N (number of commitments)
/// 32 x N  commitments, concatenated
/// ```
///
/// # Errors
///
/// Returns an error if there are more than 255 commitments.
pub fn encode_commitments(commitments: &[B256]) -> Result<Vec<u8>, CodecError> {
    let count = count_byte(commitments.len())?;
    let mut out = Vec::with_capacity(1 + commitments.len() * COMMITMENT_SIZE);
    out.push(count);
    for commitment in commitments {
        out.extend_from_slice(commitment.as_slice());
    }
    Ok(out)
}

/// Decodes a commitments blob produced by [`encode_commitments`].
///
/// # Errors
///
/// Returns an error if the blob is empty or its length is not exactly
/// `1 + 32 * N`.
pub fn decode_commitments(blob: &[u8]) -> Result<Vec<B256>, CodecError> {
    let (&count, body) = blob
        .split_first()
        .ok_or(CodecError::EmptyBlob {
            context: "commitments",
        })?;
    split_fixed(body, usize::from(count), "commitments")
}

/// Concatenates revealed answers, one 32-byte value per question.
///
/// Unanswered questions are expected to be passed as [`B256::ZERO`].
#[must_use]
pub fn encode_revealed_answers(answers: &[B256]) -> Vec<u8> {
    answers
        .iter()
        .flat_map(|answer| answer.as_slice().iter().copied())
        .collect()
}

/// Splits a revealed-answers blob into exactly `expected` values.
///
/// # Errors
///
/// Returns an error if the blob is not exactly `32 * expected` bytes.
pub fn decode_revealed_answers(
    blob: &[u8],
    expected: usize,
) -> Result<Vec<B256>, CodecError> {
    split_fixed(blob, expected, "revealed answers")
}

fn split_fixed(
    body: &[u8],
    count: usize,
    context: &'static str,
) -> Result<Vec<B256>, CodecError> {
    let expected = count * COMMITMENT_SIZE;
    if body.len() != expected {
        return Err(CodecError::LengthMismatch {
            context,
            expected,
            found: body.len(),
        });
    }
    Ok(body
        .chunks_exact(COMMITMENT_SIZE)
        .map(B256::from_slice)
        .collect())
}
