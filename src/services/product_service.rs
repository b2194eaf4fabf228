// src/services/product_service.rs

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PgStockStore, ProductRepository},
    models::inventory::{
        CreateProductPayload, Product, ProductFilter, ProductReference, StockChangePayload,
        UpdateProductPayload,
    },
    services::stock_ledger::StockLedger,
};

#[derive(Clone)]
pub struct ProductService {
    pool: PgPool,
    product_repo: ProductRepository,
    ledger: StockLedger,
}

impl ProductService {
    pub fn new(pool: PgPool, product_repo: ProductRepository, ledger: StockLedger) -> Self {
        Self { pool, product_repo, ledger }
    }

    pub async fn list_products(&self, owner_id: Uuid, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        self.product_repo.list(owner_id, filter).await
    }

    pub async fn list_categories(&self, owner_id: Uuid) -> Result<Vec<String>, AppError> {
        self.product_repo.list_categories(owner_id).await
    }

    pub async fn low_stock(&self, owner_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.product_repo.low_stock(owner_id).await
    }

    pub async fn get_product(&self, owner_id: Uuid, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(&self.pool, owner_id, id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    // O estoque inicial é gravado direto: ainda não há histórico a preservar.
    pub async fn create_product(&self, owner_id: Uuid, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let product = self.product_repo.create(&self.pool, owner_id, payload).await?;
        tracing::info!(product_id = %product.id, stock = product.stock, "Produto criado");
        Ok(product)
    }

    /// Edição parcial. Um `stock` no payload vira ajuste absoluto pelo ledger.
    pub async fn update_product(
        &self,
        owner_id: Uuid,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        self.product_repo
            .update(&mut *tx, owner_id, id, payload)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if let Some(new_stock) = payload.stock {
            let mut store = PgStockStore::new(&mut *tx);
            self.ledger.apply_adjustment(&mut store, id, new_stock).await?;
        }

        let product = self
            .product_repo
            .find_by_id(&mut *tx, owner_id, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        tx.commit().await?;
        Ok(product)
    }

    // Movimentações e transações que apontam para o produto ficam órfãs.
    pub async fn delete_product(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let product = self
            .product_repo
            .delete(&self.pool, owner_id, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        tracing::info!(product_id = %product.id, "Produto removido");
        Ok(())
    }

    /// Entrada ou saída direta, sem registro de movimentação.
    pub async fn change_stock(
        &self,
        owner_id: Uuid,
        id: Uuid,
        payload: &StockChangePayload,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        // Garante que o produto é do dono antes de tocar no saldo
        self.product_repo
            .find_by_id(&mut *tx, owner_id, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        {
            let mut store = PgStockStore::new(&mut *tx);
            self.ledger.apply(&mut store, id, payload.delta()).await?;
        }

        let product = self
            .product_repo
            .find_by_id(&mut *tx, owner_id, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        tx.commit().await?;
        Ok(product)
    }

    /// Resolve a referência de um registro para um ID de produto.
    ///
    /// Por nome: busca exata entre os produtos do dono, criando um produto
    /// provisório (preço zero, categoria "Ferreteria") se não houver. Por ID:
    /// o produto precisa existir e ser do mesmo dono.
    pub async fn resolve_reference(
        &self,
        conn: &mut PgConnection,
        owner_id: Uuid,
        reference: ProductReference,
    ) -> Result<Uuid, AppError> {
        match reference {
            ProductReference::Id(id) => {
                let product = self
                    .product_repo
                    .find_by_id(&mut *conn, owner_id, id)
                    .await?
                    .ok_or(AppError::ProductNotFound)?;
                Ok(product.id)
            }
            ProductReference::Name(name) => {
                let product = self
                    .product_repo
                    .find_or_create_by_name(conn, owner_id, &name)
                    .await?;
                tracing::debug!(product_id = %product.id, %name, "Produto resolvido pelo nome");
                Ok(product.id)
            }
        }
    }
}
