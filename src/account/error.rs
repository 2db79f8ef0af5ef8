use thiserror::Error;
use uuid::Uuid;

use crate::core_types::AccountId;
use crate::money::MoneyError;

/// Errors produced by the account service.
///
/// Every business-rule failure is detected before any balance mutation, so
/// all variants except `Storage` are guaranteed side-effect free.
/// `LockTimeout` and `Storage` are the only kinds a caller might retry.
#[derive(Debug, Error, PartialEq)]
pub enum AccountServiceError {
    #[error("account with id: {0} does not exist")]
    AccountNotFound(AccountId),

    #[error("user with id: {0} does not exist")]
    UserNotFound(Uuid),

    #[error(transparent)]
    InvalidAmount(#[from] MoneyError),

    #[error("you do not own this account")]
    NotOwner,

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("source and destination accounts are the same")]
    SameAccount,

    #[error("timed out waiting for the lock on account {0}")]
    LockTimeout(AccountId),

    #[error("storage fault: {0}")]
    Storage(String),
}
