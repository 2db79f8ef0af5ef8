//! AccountStore - canonical account state + per-account update locks
//!
//! The store owns every account record and the lock that serializes
//! mutations of it. Two access paths exist:
//!
//! 1. **Unlocked read** (`get`) - returns the current snapshot. It may run
//!    concurrently with an in-flight mutation of the same account; callers
//!    that need a stable value must take the update lock instead.
//! 2. **Lock-for-update** (`lock_for_update`) - acquires the account's
//!    exclusive update lock and returns a guard. The guard is held across
//!    the caller's whole validate-mutate-save span and releases the lock on
//!    drop, on every exit path.
//!
//! # Lock layout
//!
//! The account map is a sharded [`DashMap`] keyed by account id; each entry
//! carries the record behind a short-lived `RwLock` plus a `tokio` mutex
//! that is the business-level update lock. The DashMap shard guard is
//! released before the update lock is awaited, so map access never blocks
//! behind a slow business operation.
//!
//! Waiting for a contended update lock is bounded: acquisition times out
//! after the configured duration and surfaces [`AccountServiceError::LockTimeout`]
//! instead of hanging forever.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::timeout;
use uuid::Uuid;

use super::error::AccountServiceError;
use super::models::Account;
use crate::core_types::AccountId;

/// Default bound on how long `lock_for_update` waits for a contended lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// One account's storage cell.
struct AccountSlot {
    /// Business lock: held for the whole span of one mutating operation.
    update_lock: Arc<Mutex<()>>,
    /// Record storage: write-locked only for the single `save` assignment,
    /// read-locked briefly for snapshots.
    record: RwLock<Account>,
}

/// Exclusive claim on one account for the duration of one business
/// operation. Dropping the guard releases the lock.
pub struct AccountLock {
    slot: Arc<AccountSlot>,
    snapshot: Account,
    _update: OwnedMutexGuard<()>,
}

impl AccountLock {
    /// The account snapshot taken while holding the lock. Stable until the
    /// holder itself calls `save`.
    pub fn account(&self) -> &Account {
        &self.snapshot
    }

    pub fn account_id(&self) -> AccountId {
        self.snapshot.id
    }
}

impl std::fmt::Debug for AccountLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountLock")
            .field("account_id", &self.snapshot.id)
            .finish()
    }
}

/// Owns canonical account state. Constructed once and shared via `Arc`.
pub struct AccountStore {
    accounts: DashMap<AccountId, Arc<AccountSlot>>,
    next_id: AtomicU32,
    lock_timeout: Duration,
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            accounts: DashMap::new(),
            next_id: AtomicU32::new(1),
            lock_timeout,
        }
    }

    /// Allocate a fresh zero-balance account.
    ///
    /// No lock is involved: the account is not visible to lookups until the
    /// map insert completes.
    pub fn create(&self, owner_id: Uuid) -> Account {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let account = Account {
            id,
            owner_id,
            balance: Decimal::new(0, 2),
            created_at: Utc::now(),
        };
        self.accounts.insert(
            id,
            Arc::new(AccountSlot {
                update_lock: Arc::new(Mutex::new(())),
                record: RwLock::new(account.clone()),
            }),
        );
        account
    }

    /// Unlocked snapshot read, for informational queries.
    pub fn get(&self, id: AccountId) -> Result<Account, AccountServiceError> {
        let slot = self.slot(id)?;
        let record = slot
            .record
            .read()
            .map_err(|_| AccountServiceError::Storage("account record lock poisoned".into()))?;
        Ok(record.clone())
    }

    /// Acquire the account's exclusive update lock, waiting at most the
    /// configured timeout, and return a guard holding the current snapshot.
    pub async fn lock_for_update(&self, id: AccountId) -> Result<AccountLock, AccountServiceError> {
        let slot = self.slot(id)?;
        let guard = timeout(self.lock_timeout, Arc::clone(&slot.update_lock).lock_owned())
            .await
            .map_err(|_| AccountServiceError::LockTimeout(id))?;
        let snapshot = slot
            .record
            .read()
            .map_err(|_| AccountServiceError::Storage("account record lock poisoned".into()))?
            .clone();
        Ok(AccountLock {
            slot,
            snapshot,
            _update: guard,
        })
    }

    /// Persist a mutated account. Only callable while holding the account's
    /// update lock - the `AccountLock` parameter makes a save without the
    /// lock unrepresentable.
    ///
    /// # Panics
    /// Panics if `updated` targets a different account than the held lock,
    /// or changes immutable fields. Both are caller bugs, not runtime
    /// conditions.
    pub fn save(
        &self,
        lock: &mut AccountLock,
        updated: Account,
    ) -> Result<Account, AccountServiceError> {
        assert_eq!(
            lock.snapshot.id, updated.id,
            "save must target the locked account"
        );
        assert_eq!(
            lock.snapshot.owner_id, updated.owner_id,
            "account ownership is immutable"
        );
        let mut record = lock
            .slot
            .record
            .write()
            .map_err(|_| AccountServiceError::Storage("account record lock poisoned".into()))?;
        *record = updated.clone();
        drop(record);
        lock.snapshot = updated.clone();
        Ok(updated)
    }

    fn slot(&self, id: AccountId) -> Result<Arc<AccountSlot>, AccountServiceError> {
        self.accounts
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(AccountServiceError::AccountNotFound(id))
    }
}

// ============================================================
// Unit Tests
// ============================================================
