use std::sync::Arc;
use axum::Json;
use axum::extract::{Path, State};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use crate::AppState;
use crate::error::{ApiError, ApiResult, StorageError};
use crate::models::accounts_models::Account;
use crate::models::transaction_models::{Transaction, TransactionDetails, TransactionDetailsRequest, TransferRequest};

pub async fn transfer_money(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<Transaction>>)> {
    let Json(req) = payload?;
    req.validate().map_err(ApiError::InvalidInput)?;

    tracing::info!("transferring {} from account {} to account {}", req.amount, req.account_id, req.recipient_id) ;
    match app_state.database_connector.transfer(&req).await {
        Ok(legs) => Ok((StatusCode::OK, Json(legs))),
        Err(e) => {
            tracing::error!("transfer from {} to {} failed {}", req.account_id, req.recipient_id, e) ;
            Err(e.into())
        }
    }
}



pub async fn get_account_transactions(
    State(app_state): State<Arc<AppState>>,
    account_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let Path(account_id) = account_id?;
    tracing::info!("getting transactions of account {}", account_id) ;
    let account = app_state.database_connector
        .get_account_with_transactions(account_id)
        .await?;
    Ok((StatusCode::OK, Json(account)))
}



pub async fn create_transaction_details(
    State(app_state): State<Arc<AppState>>,
    transaction_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TransactionDetailsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TransactionDetails>)> {
    let Path(transaction_id) = transaction_id?;
    let Json(req) = payload?;
    let tags = req.normalized_tags().map_err(ApiError::InvalidInput)?;

    if !app_state.database_connector.transaction_exists(transaction_id).await? {
        tracing::warn!("details posted for unknown transaction {}", transaction_id) ;
        return Err(StorageError::not_found("transaction", transaction_id).into());
    }

    tracing::info!("attaching details to transaction {}", transaction_id) ;
    let details = app_state.database_connector
        .create_transaction_details(transaction_id, req.description.trim(), &tags)
        .await?;
    Ok((StatusCode::CREATED, Json(details)))
}



pub async fn get_transaction_details(
    State(app_state): State<Arc<AppState>>,
    transaction_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let Path(transaction_id) = transaction_id?;
    tracing::info!("getting details of transaction {}", transaction_id) ;
    let transaction = app_state.database_connector
        .get_transaction_with_details(transaction_id)
        .await?;
    Ok((StatusCode::OK, Json(transaction)))
}



pub async fn update_transaction_details(
    State(app_state): State<Arc<AppState>>,
    transaction_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TransactionDetailsRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TransactionDetails>)> {
    let Path(transaction_id) = transaction_id?;
    let Json(req) = payload?;
    let tags = req.normalized_tags().map_err(ApiError::InvalidInput)?;

    tracing::info!("updating details of transaction {}", transaction_id) ;
    let details = app_state.database_connector
        .update_transaction_details(transaction_id, req.description.trim(), &tags)
        .await?;
    Ok((StatusCode::OK, Json(details)))
}
