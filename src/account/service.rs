//! AccountService - the account-mutation engine
//!
//! Implements create/read/deposit/withdraw/transfer over [`AccountStore`],
//! [`Ledger`] and [`UserDirectory`]. Every mutating operation follows the
//! same shape:
//!
//! ```text
//! validate -> acquire lock(s) -> re-check invariants under lock
//!          -> mutate -> save -> append ledger -> release (guard drop)
//! ```
//!
//! All business failures happen before the first `save`, so a failed
//! operation leaves no trace. Balances are never cached across calls: each
//! operation decides from the snapshot read while holding the lock.
//!
//! # Lock ordering
//!
//! Transfers need two locks. They are always acquired in ascending
//! account-id order, independent of which account is the source. Locking in
//! request order would deadlock two opposite-direction transfers over the
//! same pair, each holding one lock and waiting on the other.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::directory::{DirectoryError, User, UserDirectory};
use super::error::AccountServiceError;
use super::ledger::Ledger;
use super::models::{Account, TransactionRecord, TransactionType, TransferResult};
use super::store::{AccountLock, AccountStore};
use crate::core_types::AccountId;
use crate::money;

pub struct AccountService {
    store: Arc<AccountStore>,
    directory: Arc<UserDirectory>,
    ledger: Arc<Ledger>,
}

impl AccountService {
    pub fn new(store: Arc<AccountStore>, directory: Arc<UserDirectory>, ledger: Arc<Ledger>) -> Self {
        Self {
            store,
            directory,
            ledger,
        }
    }

    /// Create a zero-balance account owned by an existing user.
    pub fn create_account(&self, user_id: &Uuid) -> Result<Account, AccountServiceError> {
        let user = self.resolve_user(user_id)?;
        let account = self.store.create(user.id);
        info!(account_id = account.id, owner_id = %user.id, "account created");
        Ok(account)
    }

    /// Unlocked informational read, with an ownership check.
    pub fn get_account(
        &self,
        user_id: &Uuid,
        account_id: AccountId,
    ) -> Result<Account, AccountServiceError> {
        let account = self.store.get(account_id)?;
        self.check_ownership(user_id, &account)?;
        Ok(account)
    }

    /// Credit an account. Ownership is not required: anyone who knows the
    /// account id may fund it, but the acting user must exist. The actor is
    /// resolved before the lock is taken so an unknown user causes no side
    /// effects.
    pub async fn deposit(
        &self,
        user_id: &Uuid,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<Account, AccountServiceError> {
        money::validate_amount(amount)?;
        let actor = self.resolve_user(user_id)?;

        let mut lock = self.store.lock_for_update(account_id).await?;
        info!(account_id, amount = %amount, "depositing");

        let mut updated = lock.account().clone();
        updated.balance = money::checked_add(updated.balance, amount)?;
        let account = self.store.save(&mut lock, updated)?;
        self.ledger
            .append(account_id, TransactionType::Deposit, amount, actor.id);

        info!(account_id, balance = %account.balance, "deposit finished");
        Ok(account)
    }

    /// Debit an account. Requires ownership, checked against the snapshot
    /// read while holding the lock, and a sufficient balance.
    pub async fn withdraw(
        &self,
        user_id: &Uuid,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<Account, AccountServiceError> {
        money::validate_amount(amount)?;

        let mut lock = self.store.lock_for_update(account_id).await?;
        info!(account_id, amount = %amount, "withdrawing");

        let owner = self.check_ownership(user_id, lock.account())?;
        if !lock.account().has_enough_balance(amount) {
            warn!(account_id, amount = %amount, "withdrawal rejected: insufficient funds");
            return Err(AccountServiceError::InsufficientFunds);
        }

        let mut updated = lock.account().clone();
        updated.balance = money::checked_sub(updated.balance, amount)?;
        let account = self.store.save(&mut lock, updated)?;
        self.ledger
            .append(account_id, TransactionType::Withdraw, amount, owner.id);

        info!(account_id, balance = %account.balance, "withdrawal finished");
        Ok(account)
    }

    /// Move money between two accounts as one atomic operation.
    ///
    /// Both account locks are held across the whole debit-credit-append
    /// span, so no observer going through the engine can see the debit
    /// without the credit, and the two ledger entries exist together or not
    /// at all.
    pub async fn transfer_money_between_accounts(
        &self,
        user_id: &Uuid,
        source_account_id: AccountId,
        destination_account_id: AccountId,
        amount: Decimal,
    ) -> Result<TransferResult, AccountServiceError> {
        money::validate_amount(amount)?;
        if source_account_id == destination_account_id {
            return Err(AccountServiceError::SameAccount);
        }

        info!(
            source_account_id,
            destination_account_id,
            amount = %amount,
            "starting transfer"
        );

        let (mut source_lock, mut destination_lock) = self
            .lock_pair(source_account_id, destination_account_id)
            .await?;

        let owner = self.check_ownership(user_id, source_lock.account())?;
        if !source_lock.account().has_enough_balance(amount) {
            warn!(
                source_account_id,
                destination_account_id,
                amount = %amount,
                "transfer rejected: insufficient funds"
            );
            return Err(AccountServiceError::InsufficientFunds);
        }

        let source_before = source_lock.account().clone();
        let mut source = source_lock.account().clone();
        let mut destination = destination_lock.account().clone();
        source.balance = money::checked_sub(source.balance, amount)?;
        destination.balance = money::checked_add(destination.balance, amount)?;

        self.store.save(&mut source_lock, source)?;
        if let Err(e) = self.store.save(&mut destination_lock, destination) {
            // Both locks are still held, so the rollback is invisible to
            // every other operation.
            let _ = self.store.save(&mut source_lock, source_before);
            return Err(e);
        }

        self.ledger.append(
            source_account_id,
            TransactionType::Withdraw,
            amount,
            owner.id,
        );
        self.ledger.append(
            destination_account_id,
            TransactionType::Deposit,
            amount,
            owner.id,
        );

        info!(
            source_account_id,
            destination_account_id,
            amount = %amount,
            "transfer finished"
        );

        Ok(TransferResult {
            source_account_id,
            destination_account_id,
            amount,
            completed_at: Utc::now(),
        })
    }

    /// Transaction history for an account the caller owns, oldest first.
    pub fn get_account_transactions(
        &self,
        user_id: &Uuid,
        account_id: AccountId,
    ) -> Result<Vec<TransactionRecord>, AccountServiceError> {
        let account = self.get_account(user_id, account_id)?;
        Ok(self.ledger.list_for_account(account.id))
    }

    /// Acquire both locks of a transfer in ascending account-id order.
    ///
    /// Returns them as (source, destination) regardless of acquisition
    /// order. A missing account surfaces as `AccountNotFound`; any lock
    /// already held is released by guard drop.
    async fn lock_pair(
        &self,
        source_account_id: AccountId,
        destination_account_id: AccountId,
    ) -> Result<(AccountLock, AccountLock), AccountServiceError> {
        if source_account_id < destination_account_id {
            let source = self.store.lock_for_update(source_account_id).await?;
            let destination = self.store.lock_for_update(destination_account_id).await?;
            Ok((source, destination))
        } else {
            let destination = self.store.lock_for_update(destination_account_id).await?;
            let source = self.store.lock_for_update(source_account_id).await?;
            Ok((source, destination))
        }
    }

    fn check_ownership(
        &self,
        user_id: &Uuid,
        account: &Account,
    ) -> Result<User, AccountServiceError> {
        let user = self.resolve_user(user_id)?;
        if account.owner_id != user.id {
            return Err(AccountServiceError::NotOwner);
        }
        Ok(user)
    }

    /// Directory errors never cross the service boundary.
    fn resolve_user(&self, user_id: &Uuid) -> Result<User, AccountServiceError> {
        self.directory.resolve(user_id).map_err(|e| match e {
            DirectoryError::NotFound(id) => AccountServiceError::UserNotFound(id),
        })
    }
}

// ============================================================
// Unit Tests
// ============================================================
