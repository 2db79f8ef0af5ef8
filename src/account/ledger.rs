//! Ledger - append-only transaction history
//!
//! Records every balance change as one immutable entry. Entries are never
//! updated or deleted; per-account order is creation order. The running
//! reconciliation invariant is: an account's balance equals the sum of its
//! DEPOSIT entries minus the sum of its WITHDRAW entries.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::models::{TransactionRecord, TransactionType};
use crate::core_types::AccountId;

/// Append-only store of [`TransactionRecord`]s, indexed per account.
pub struct Ledger {
    entries: DashMap<AccountId, Vec<TransactionRecord>>,
    next_id: AtomicU64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append one entry, assigning its id and timestamp.
    pub fn append(
        &self,
        account_id: AccountId,
        tx_type: TransactionType,
        amount: Decimal,
        actor_user_id: Uuid,
    ) -> TransactionRecord {
        let record = TransactionRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            account_id,
            tx_type,
            amount,
            actor_user_id,
            created_at: Utc::now(),
        };
        self.entries
            .entry(account_id)
            .or_default()
            .push(record.clone());
        record
    }

    /// All entries for one account, oldest first. Each call returns the
    /// current snapshot.
    pub fn list_for_account(&self, account_id: AccountId) -> Vec<TransactionRecord> {
        self.entries
            .get(&account_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Net balance implied by an account's entries (deposits minus
    /// withdrawals). Used by tests to check the reconciliation invariant.
    pub fn net_for_account(&self, account_id: AccountId) -> Decimal {
        self.list_for_account(account_id)
            .iter()
            .fold(Decimal::ZERO, |acc, record| match record.tx_type {
                TransactionType::Deposit => acc + record.amount,
                TransactionType::Withdraw => acc - record.amount,
            })
    }

    /// Total number of entries across all accounts.
    pub fn entry_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.value().len()).sum()
    }
}

// ============================================================
// Unit Tests
// ============================================================
