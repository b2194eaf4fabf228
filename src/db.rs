pub mod user_repo;
pub use user_repo::UserRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod movement_repo;
pub use movement_repo::MovementRepository;
pub mod transaction_repo;
pub use transaction_repo::TransactionRepository;

pub mod stock_repo;
pub use stock_repo::PgStockStore;
pub mod memory_stock;
pub use memory_stock::InMemoryStockStore;
