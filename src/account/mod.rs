//! Account management module
//!
//! Accounts, the per-account lock table, the append-only transaction
//! ledger, the user directory and the service that orchestrates them.

pub mod directory;
pub mod error;
pub mod ledger;
pub mod models;
pub mod service;
pub mod store;

pub use directory::{DirectoryError, NewUser, User, UserDirectory};
pub use error::AccountServiceError;
pub use ledger::Ledger;
pub use models::{Account, TransactionRecord, TransactionType, TransferResult};
pub use service::AccountService;
pub use store::{AccountLock, AccountStore, DEFAULT_LOCK_TIMEOUT};
