use std::sync::Arc;
use axum::Router;
use axum::routing::get;
use crate::AppState;
use crate::controllers::accounts_controllers::{create_account, delete_account, get_account, get_account_by_number, get_accounts, method_not_allowed};
use crate::controllers::transaction_controllers::transfer_money;

pub async fn accounts_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_accounts).post(create_account).put(transfer_money))
        .route("/{account_id}", get(get_account).delete(delete_account))
        .route("/number/{account_number}", get(get_account_by_number))
        .method_not_allowed_fallback(method_not_allowed)
}
