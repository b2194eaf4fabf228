pub mod auth;
pub mod dashboard_service;
pub mod movement_service;
pub mod product_service;
pub mod stock_ledger;
pub mod transaction_service;
