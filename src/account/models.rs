//! Domain models: accounts, ledger entries, transfer results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core_types::{AccountId, TransactionId};

/// A monetary account owned by exactly one user.
///
/// # Invariants (enforced by the service layer):
/// 1. `id`, `owner_id` and `created_at` are immutable after creation
/// 2. `balance >= 0` at the end of every successful operation
/// 3. `balance` is only mutated while the account's update lock is held
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner_id: Uuid,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether the available balance covers a debit of `amount`.
    pub fn has_enough_balance(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

/// Direction of a balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdraw,
}

/// One immutable ledger entry. A deposit or withdrawal appends one entry;
/// a transfer appends two (WITHDRAW on the source, DEPOSIT on the
/// destination) under the same pair of account locks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub tx_type: TransactionType,
    /// Magnitude moved, always positive
    pub amount: Decimal,
    /// The user on whose behalf the movement happened
    pub actor_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Result of a completed transfer. Returned to the caller, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferResult {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub completed_at: DateTime<Utc>,
}
