use std::sync::Arc;
use axum::Router;
use axum::routing::get;
use crate::AppState;
use crate::controllers::accounts_controllers::method_not_allowed;
use crate::controllers::transaction_controllers::{create_transaction_details, get_account_transactions, get_transaction_details, update_transaction_details};

// `{id}` is an account id on the first route and a transaction id on the
// details route; the router needs one name per segment.
pub async fn transaction_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{id}", get(get_account_transactions))
        .route(
            "/{id}/details",
            get(get_transaction_details)
                .post(create_transaction_details)
                .put(update_transaction_details),
        )
        .method_not_allowed_fallback(method_not_allowed)
}
