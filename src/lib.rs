//! paycore - Concurrent Account & Transfer Core
//!
//! A money-movement service core: user-owned accounts, deposits,
//! withdrawals and transfers, serialized per account by an exclusive
//! lock-for-update and recorded in an append-only transaction ledger.
//!
//! # Modules
//!
//! - [`core_types`] - Core type aliases (AccountId, TransactionId)
//! - [`money`] - Amount validation and checked decimal arithmetic
//! - [`account`] - Store, ledger, user directory and the account service
//! - [`gateway`] - Axum HTTP surface over the service
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing subscriber setup

pub mod account;
pub mod config;
pub mod core_types;
pub mod gateway;
pub mod logging;
pub mod money;

// Convenient re-exports at crate root
pub use account::directory::{DirectoryError, NewUser, User, UserDirectory};
pub use account::error::AccountServiceError;
pub use account::ledger::Ledger;
pub use account::models::{Account, TransactionRecord, TransactionType, TransferResult};
pub use account::service::AccountService;
pub use account::store::{AccountLock, AccountStore, DEFAULT_LOCK_TIMEOUT};
pub use core_types::{AccountId, TransactionId};
