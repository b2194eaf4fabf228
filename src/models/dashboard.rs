// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::inventory::Product;

// Alerta de estoque baixo (cards do painel)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAlert {
    pub product_id: Uuid,
    pub name: String,
    pub stock: i32,
    pub stock_minimum: i32,
    /// Quanto falta para voltar ao mínimo.
    pub shortfall: i32,
}

impl From<Product> for InventoryAlert {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id,
            shortfall: (product.stock_minimum - product.stock).max(0),
            name: product.name,
            stock: product.stock,
            stock_minimum: product.stock_minimum,
        }
    }
}
