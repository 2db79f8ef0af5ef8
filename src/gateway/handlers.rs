use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::account::directory::{DirectoryError, NewUser};
use crate::account::error::AccountServiceError;
use crate::core_types::AccountId;
use crate::gateway::state::AppState;
use crate::gateway::types::{
    AccountResponse, ActingUser, ApiResponse, BalanceChangeRequest, CreateAccountRequest,
    CreateUserRequest, TransactionResponse, TransferRequest, TransferResponse, UserResponse,
    error_codes,
};

type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Translate an engine error into HTTP status + stable error code.
///
/// Account `NotFound` is the only 404; business-rule rejections are 400,
/// lock contention is 409 (safe to retry), storage faults are 500.
fn error_response(err: AccountServiceError) -> ApiError {
    let (status, code) = match &err {
        AccountServiceError::AccountNotFound(_) => {
            (StatusCode::NOT_FOUND, error_codes::ACCOUNT_NOT_FOUND)
        }
        AccountServiceError::UserNotFound(_) => {
            (StatusCode::BAD_REQUEST, error_codes::USER_NOT_FOUND)
        }
        AccountServiceError::InvalidAmount(_) | AccountServiceError::SameAccount => {
            (StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER)
        }
        AccountServiceError::NotOwner => (StatusCode::BAD_REQUEST, error_codes::NOT_OWNER),
        AccountServiceError::InsufficientFunds => {
            (StatusCode::BAD_REQUEST, error_codes::INSUFFICIENT_FUNDS)
        }
        AccountServiceError::LockTimeout(_) => (StatusCode::CONFLICT, error_codes::LOCK_TIMEOUT),
        AccountServiceError::Storage(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
        }
    };
    (status, Json(ApiResponse::<()>::error(code, err.to_string())))
}

// ============================================================================
// Users
// ============================================================================

/// POST /users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> (StatusCode, Json<ApiResponse<UserResponse>>) {
    let user = state.directory.create(NewUser {
        name: req.name,
        document_number: req.document_number,
        birth_date: req.birth_date,
    });
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(UserResponse::from(user))),
    )
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<uuid::Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    match state.directory.resolve(&user_id) {
        Ok(user) => Ok(Json(ApiResponse::success(UserResponse::from(user)))),
        Err(e @ DirectoryError::NotFound(_)) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error(
                error_codes::USER_NOT_FOUND,
                e.to_string(),
            )),
        )),
    }
}

// ============================================================================
// Accounts
// ============================================================================

/// POST /accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), ApiError> {
    let account = state
        .service
        .create_account(&req.user_id)
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(AccountResponse::from(account))),
    ))
}

/// GET /accounts/{account_id}?user_id=
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<AccountId>,
    Query(acting): Query<ActingUser>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state
        .service
        .get_account(&acting.user_id, account_id)
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

/// POST /accounts/{account_id}/deposits
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<AccountId>,
    Json(req): Json<BalanceChangeRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state
        .service
        .deposit(&req.user_id, account_id, req.amount)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

/// POST /accounts/{account_id}/withdrawals
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<AccountId>,
    Json(req): Json<BalanceChangeRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, ApiError> {
    let account = state
        .service
        .withdraw(&req.user_id, account_id, req.amount)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(AccountResponse::from(account))))
}

/// POST /accounts/{account_id}/transfers
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<AccountId>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<ApiResponse<TransferResponse>>, ApiError> {
    let result = state
        .service
        .transfer_money_between_accounts(
            &req.user_id,
            account_id,
            req.destination_account_id,
            req.amount,
        )
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(TransferResponse::from(result))))
}

/// GET /accounts/{account_id}/transactions?user_id=
pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<AccountId>,
    Query(acting): Query<ActingUser>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, ApiError> {
    let records = state
        .service
        .get_account_transactions(&acting.user_id, account_id)
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        records.into_iter().map(TransactionResponse::from).collect(),
    )))
}

/// GET /health
pub async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::MoneyError;
    use uuid::Uuid;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                AccountServiceError::AccountNotFound(1),
                StatusCode::NOT_FOUND,
            ),
            (
                AccountServiceError::UserNotFound(Uuid::new_v4()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AccountServiceError::InvalidAmount(MoneyError::NotPositive),
                StatusCode::BAD_REQUEST,
            ),
            (AccountServiceError::NotOwner, StatusCode::BAD_REQUEST),
            (
                AccountServiceError::InsufficientFunds,
                StatusCode::BAD_REQUEST,
            ),
            (AccountServiceError::LockTimeout(3), StatusCode::CONFLICT),
            (
                AccountServiceError::Storage("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = error_response(err);
            assert_eq!(status, expected);
        }
    }
}
