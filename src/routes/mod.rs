pub mod accounts_routes;
pub mod transaction_routes;
