//! Wire types for the HTTP gateway: the response envelope, stable error
//! codes, and the request/response DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::models::{Account, TransactionRecord, TransferResult};
use crate::account::directory::User;
use crate::core_types::{AccountId, TransactionId};

// ============================================================================
// Response Envelope
// ============================================================================

/// Uniform API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    pub code: i32,
    /// Response message
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Stable numeric error codes, independent of HTTP status
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_FUNDS: i32 = 1002;
    pub const NOT_OWNER: i32 = 1003;
    pub const USER_NOT_FOUND: i32 = 1004;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;
    pub const LOCK_TIMEOUT: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub document_number: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct BalanceChangeRequest {
    pub user_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub user_id: Uuid,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
}

/// Query parameter carrying the acting user for reads
#[derive(Debug, Deserialize)]
pub struct ActingUser {
    pub user_id: Uuid,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub document_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            document_number: user.document_number,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            balance: account.balance,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub source_account_id: AccountId,
    pub destination_account_id: AccountId,
    pub amount: Decimal,
    pub completed_at: DateTime<Utc>,
}

impl From<TransferResult> for TransferResponse {
    fn from(result: TransferResult) -> Self {
        Self {
            source_account_id: result.source_account_id,
            destination_account_id: result.destination_account_id,
            amount: result.amount,
            completed_at: result.completed_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: TransactionId,
    pub transaction_type: crate::account::models::TransactionType,
    pub amount: Decimal,
    pub actor_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<TransactionRecord> for TransactionResponse {
    fn from(record: TransactionRecord) -> Self {
        Self {
            id: record.id,
            transaction_type: record.tx_type,
            amount: record.amount,
            actor_user_id: record.actor_user_id,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_envelope_omits_data_on_error() {
        let err = ApiResponse::<()>::error(error_codes::INVALID_PARAMETER, "bad amount");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("data"));
        assert!(json.contains("\"code\":1001"));
    }

    #[test]
    fn test_balance_change_request_accepts_string_and_number_amounts() {
        let from_string: BalanceChangeRequest = serde_json::from_str(
            r#"{"user_id":"6e4dc7ff-2d89-4f72-9c5d-0b6bd9b9f3f1","amount":"10.99"}"#,
        )
        .unwrap();
        let from_number: BalanceChangeRequest = serde_json::from_str(
            r#"{"user_id":"6e4dc7ff-2d89-4f72-9c5d-0b6bd9b9f3f1","amount":10.99}"#,
        )
        .unwrap();

        assert_eq!(from_string.amount, Decimal::from_str("10.99").unwrap());
        assert_eq!(from_number.amount, Decimal::from_str("10.99").unwrap());
    }
}
