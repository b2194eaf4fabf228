// src/services/dashboard_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{dashboard::InventoryAlert, finance::Transaction},
    services::{product_service::ProductService, transaction_service::TransactionService},
};

const RECENT_TRANSACTIONS: i64 = 20;

#[derive(Clone)]
pub struct DashboardService {
    product_service: ProductService,
    transaction_service: TransactionService,
}

impl DashboardService {
    pub fn new(product_service: ProductService, transaction_service: TransactionService) -> Self {
        Self { product_service, transaction_service }
    }

    pub async fn recent_transactions(&self, owner_id: Uuid) -> Result<Vec<Transaction>, AppError> {
        self.transaction_service
            .recent_transactions(owner_id, RECENT_TRANSACTIONS)
            .await
    }

    pub async fn inventory_alerts(&self, owner_id: Uuid) -> Result<Vec<InventoryAlert>, AppError> {
        let products = self.product_service.low_stock(owner_id).await?;
        Ok(products.into_iter().map(InventoryAlert::from).collect())
    }
}
