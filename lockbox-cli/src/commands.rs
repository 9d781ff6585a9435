//! Subcommands and their execution against a [`LedgerState`].

use alloy_primitives::{Address, Bytes, U256};
use clap::Subcommand;
use eyre::{bail, eyre, WrapErr};
use lockbox_core::{BlockHeight, Challenge, LockBox, NewVault, Question, VaultId, VaultView};
use serde_json::{json, Value};

use crate::state::LedgerState;

/// Placeholder for a question the claimant leaves unanswered.
const SKIP: &str = "-";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a vault from hint/answer pairs (or raw blobs)
    Create {
        /// Vault name, or a 0x-prefixed hex id
        id: VaultId,

        /// Question hint; repeat once per question
        #[arg(long = "hint")]
        hints: Vec<String>,

        /// Answer to the hint in the same position
        #[arg(long = "answer")]
        answers: Vec<String>,

        /// Pre-encoded hints blob (hex), instead of --hint/--answer
        #[arg(long, requires = "commitments_hex", conflicts_with_all = ["hints", "answers"])]
        hints_hex: Option<Bytes>,

        /// Pre-encoded commitments blob (hex)
        #[arg(long, requires = "hints_hex")]
        commitments_hex: Option<Bytes>,

        /// Answers required to unlock
        #[arg(short, long, default_value_t = 1)]
        threshold: u8,

        /// Blocks between a successful unlock and redemption
        #[arg(short, long, default_value_t = 0)]
        period: u64,

        /// Keep owner spend rights after an unlock
        #[arg(long)]
        spendable_once_unlocked: bool,

        /// Initial value
        #[arg(long, default_value = "0")]
        value: U256,
    },

    /// Add value to a vault
    AddValue {
        /// Vault name or 0x id
        id: VaultId,

        /// Amount to add
        value: U256,
    },

    /// Spend from a vault you own
    Spend {
        /// Vault name or 0x id
        id: VaultId,

        /// Amount to spend
        amount: U256,

        /// Recipient (defaults to the caller)
        #[arg(long)]
        to: Option<Address>,
    },

    /// Answer a vault's questions to start its unlocking period
    Unlock {
        /// Vault name or 0x id
        id: VaultId,

        /// One answer per question, in order; `-` or an empty string skips a question
        answers: Vec<String>,

        /// Only report how many answers are correct
        #[arg(long)]
        check: bool,
    },

    /// Redeem from a vault you unlocked
    Redeem {
        /// Vault name or 0x id
        id: VaultId,

        /// Amount to redeem
        amount: U256,

        /// Recipient (defaults to the caller)
        #[arg(long)]
        to: Option<Address>,
    },

    /// Show a vault and its status
    Show {
        /// Vault name or 0x id
        id: VaultId,

        /// Block height to derive the status at (defaults to the current one)
        #[arg(long)]
        at: Option<u64>,
    },

    /// List vaults created by an address
    #[command(alias = "ls")]
    List {
        /// Owner (defaults to the caller)
        owner: Option<Address>,
    },

    /// Advance the block clock
    Mine {
        /// Number of blocks
        #[arg(default_value_t = 1)]
        blocks: u64,
    },

    /// Show an account balance
    Balance {
        /// Account (defaults to the caller)
        account: Option<Address>,
    },

    /// Show ledger status
    Status,
}

/// Result of running a command.
pub struct Outcome {
    /// JSON written to stdout.
    pub output: Value,
    /// Whether the ledger must be saved.
    pub changed: bool,
}

impl Outcome {
    const fn read(output: Value) -> Self {
        Self {
            output,
            changed: false,
        }
    }

    const fn write(output: Value) -> Self {
        Self {
            output,
            changed: true,
        }
    }
}

fn require_caller(caller: Option<Address>) -> eyre::Result<Address> {
    caller.ok_or_else(|| eyre!("no caller address: pass --from or set LOCKBOX_FROM"))
}

/// Runs `command` as `caller` against `state`.
///
/// Mutating commands execute at the next block height and advance the clock
/// to it on success. On failure `state` is left untouched.
#[allow(clippy::too_many_lines)]
pub fn execute(
    command: Command,
    state: &mut LedgerState,
    caller: Option<Address>,
) -> eyre::Result<Outcome> {
    let lockbox = state.lockbox()?;
    let now = state.block_height;

    match command {
        Command::Create {
            id,
            hints,
            answers,
            hints_hex,
            commitments_hex,
            threshold,
            period,
            spendable_once_unlocked,
            value,
        } => {
            let caller = require_caller(caller)?;
            let request = match (hints_hex, commitments_hex) {
                (Some(hints), Some(commitments)) => NewVault::new(id.clone(), hints, commitments),
                _ => {
                    if hints.len() != answers.len() {
                        bail!(
                            "{} hints but {} answers: pass one --answer per --hint",
                            hints.len(),
                            answers.len()
                        );
                    }
                    let questions: Vec<Question> = hints
                        .into_iter()
                        .zip(answers)
                        .map(|(hint, answer)| Question::new(hint, answer))
                        .collect();
                    Challenge::build(lockbox.scheme(), &questions)
                        .wrap_err("failed to encode questions")?
                        .into_request(id.clone())
                }
            }
            .with_threshold(threshold)
            .with_unlocking_period(period)
            .with_spendable_once_unlocked(spendable_once_unlocked)
            .with_value(value);

            let at = state.next_height()?;
            lockbox.create(request, caller, at)?;
            finish(state, &lockbox, at)?;
            Ok(Outcome::write(view(&lockbox, &id, at)?))
        }

        Command::AddValue { id, value } => {
            let caller = require_caller(caller)?;
            let at = state.next_height()?;
            lockbox.add_value(&id, value, caller, at)?;
            finish(state, &lockbox, at)?;
            Ok(Outcome::write(view(&lockbox, &id, at)?))
        }

        Command::Spend { id, amount, to } => {
            let caller = require_caller(caller)?;
            let at = state.next_height()?;
            let transfer = lockbox.spend(&id, amount, to.unwrap_or(caller), caller, at)?;
            state.credit(&transfer)?;
            finish(state, &lockbox, at)?;
            Ok(Outcome::write(json!({
                "transfer": transfer,
                "vault": view(&lockbox, &id, at)?,
            })))
        }

        Command::Unlock { id, answers, check } => {
            let answers: Vec<Option<&str>> = answers
                .iter()
                .map(|answer| (!answer.is_empty() && answer != SKIP).then_some(answer.as_str()))
                .collect();
            if check {
                let vault = lockbox.get(&id)?;
                let correct = Challenge::count_correct(
                    lockbox.scheme(),
                    vault.answer_commitments(),
                    &answers,
                );
                return Ok(Outcome::read(json!({
                    "id": id,
                    "correct": correct,
                    "required": vault.num_answers_required(),
                    "wouldUnlock": vault.can_trigger()
                        && answers.len() == vault.num_questions()
                        && correct >= usize::from(vault.num_answers_required()),
                })));
            }

            let caller = require_caller(caller)?;
            let revealed = Challenge::reveal_answers(lockbox.scheme(), &answers);
            let at = state.next_height()?;
            lockbox.trigger_unlock(&id, &revealed, caller, at)?;
            finish(state, &lockbox, at)?;
            Ok(Outcome::write(view(&lockbox, &id, at)?))
        }

        Command::Redeem { id, amount, to } => {
            let caller = require_caller(caller)?;
            let at = state.next_height()?;
            let transfer = lockbox.redeem(&id, amount, to.unwrap_or(caller), caller, at)?;
            state.credit(&transfer)?;
            finish(state, &lockbox, at)?;
            Ok(Outcome::write(json!({
                "transfer": transfer,
                "vault": view(&lockbox, &id, at)?,
            })))
        }

        Command::Show { id, at } => Ok(Outcome::read(view(&lockbox, &id, at.unwrap_or(now))?)),

        Command::List { owner } => {
            let owner = match owner {
                Some(owner) => owner,
                None => require_caller(caller)?,
            };
            let vaults = lockbox
                .owned_vault_ids(owner)?
                .iter()
                .map(|id| lockbox.view(id, now))
                .collect::<Result<Vec<VaultView>, _>>()?;
            Ok(Outcome::read(json!({
                "owner": owner,
                "count": vaults.len(),
                "vaults": vaults,
            })))
        }

        Command::Mine { blocks } => {
            let height = state.mine(blocks)?;
            tracing::info!(blocks, height, "mined");
            Ok(Outcome::write(json!({ "blockHeight": height })))
        }

        Command::Balance { account } => {
            let account = match account {
                Some(account) => account,
                None => require_caller(caller)?,
            };
            Ok(Outcome::read(json!({
                "account": account,
                "balance": state.balance(account),
            })))
        }

        Command::Status => Ok(Outcome::read(json!({
            "hash": state.hash,
            "blockHeight": now,
            "vaults": state.store.vaults.len(),
            "owners": state.store.owners.len(),
            "caller": caller,
        }))),
    }
}

fn finish(
    state: &mut LedgerState,
    lockbox: &LockBox,
    at: BlockHeight,
) -> eyre::Result<()> {
    state.commit(lockbox)?;
    state.block_height = at;
    Ok(())
}

fn view(
    lockbox: &LockBox,
    id: &VaultId,
    at: BlockHeight,
) -> eyre::Result<Value> {
    serde_json::to_value(lockbox.view(id, at)?).wrap_err("failed to encode vault")
}
