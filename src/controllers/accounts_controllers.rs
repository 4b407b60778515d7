use std::sync::Arc;
use axum::extract::{Path, State};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::Json;
use axum::http::{Method, StatusCode};
use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::accounts_models::{Account, NewAccount};
use crate::models::common::MessageResponse;
use crate::services::other_services::generate_account_number;

pub async fn get_accounts(
    State(app_state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<Vec<Account>>)> {
    tracing::info!("getting all accounts") ;
    let accounts = app_state.database_connector.get_accounts().await?;
    Ok((StatusCode::OK, Json(accounts)))
}


pub async fn create_account(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let Json(new_account) = payload?;

    if !new_account.is_valid() {
        tracing::warn!("rejected account without a name") ;
        return Err(ApiError::InvalidInput("invalid input: first_name or last_name is required".into()));
    }

    let account_number = generate_account_number();
    tracing::info!("creating account with number {}", account_number) ;
    let account = app_state.database_connector
        .create_account(&new_account, account_number)
        .await?;
    tracing::info!("created account {} with number {}", account.id, account.account_number) ;

    Ok((StatusCode::CREATED, Json(account)))
}


pub async fn get_account(
    State(app_state): State<Arc<AppState>>,
    account_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let Path(account_id) = account_id?;
    tracing::info!("getting account with id {}", account_id) ;
    let account = app_state.database_connector.get_account(account_id).await?;
    Ok((StatusCode::OK, Json(account)))
}


pub async fn get_account_by_number(
    State(app_state): State<Arc<AppState>>,
    account_number: Result<Path<i64>, PathRejection>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let Path(account_number) = account_number?;
    tracing::info!("getting account with number {}", account_number) ;
    let account = app_state.database_connector.get_account_by_number(account_number).await?;
    Ok((StatusCode::OK, Json(account)))
}


pub async fn delete_account(
    State(app_state): State<Arc<AppState>>,
    account_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let Path(account_id) = account_id?;
    tracing::info!("deleting account with id {}", account_id) ;
    app_state.database_connector.delete_account(account_id).await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new(format!("Successfully deleted account with id `{}`", account_id))),
    ))
}


pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}
