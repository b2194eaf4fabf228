// src/services/transaction_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PgStockStore, TransactionRepository},
    models::{
        finance::{
            CreateTransactionPayload, Transaction, TransactionDraft, TransactionFilter,
            UpdateTransactionPayload,
        },
        inventory::ProductReference,
    },
    services::{product_service::ProductService, stock_ledger::StockLedger},
};

// Transações movem estoque só quando a categoria indica compra ou venda.
#[derive(Clone)]
pub struct TransactionService {
    pool: PgPool,
    transaction_repo: TransactionRepository,
    product_service: ProductService,
    ledger: StockLedger,
}

impl TransactionService {
    pub fn new(
        pool: PgPool,
        transaction_repo: TransactionRepository,
        product_service: ProductService,
        ledger: StockLedger,
    ) -> Self {
        Self { pool, transaction_repo, product_service, ledger }
    }

    pub async fn list_transactions(
        &self,
        owner_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        self.transaction_repo.list(owner_id, filter).await
    }

    pub async fn recent_transactions(&self, owner_id: Uuid, limit: i64) -> Result<Vec<Transaction>, AppError> {
        self.transaction_repo.recent(owner_id, limit).await
    }

    pub async fn get_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<Transaction, AppError> {
        self.transaction_repo
            .find_by_id(&self.pool, owner_id, id)
            .await?
            .ok_or(AppError::TransactionNotFound)
    }

    pub async fn create_transaction(
        &self,
        owner_id: Uuid,
        payload: CreateTransactionPayload,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        let product_id = match ProductReference::from_parts(payload.product_id, payload.product_name.as_deref()) {
            Some(reference) => Some(
                self.product_service
                    .resolve_reference(&mut *tx, owner_id, reference)
                    .await?,
            ),
            None => None,
        };

        let draft = TransactionDraft {
            occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
            amount: payload.amount,
            kind: payload.kind,
            category: payload.category.trim().to_string(),
            description: payload.description,
            quantity: payload.quantity,
            product_id,
            owner_id,
        };

        if let Some((product_id, effect)) = draft.stock_effect() {
            let mut store = PgStockStore::new(&mut *tx);
            self.ledger.apply_effect(&mut store, product_id, effect).await?;
        }

        let transaction = self.transaction_repo.insert(&mut *tx, &draft).await?;
        tx.commit().await?;

        tracing::info!(
            transaction_id = %transaction.id,
            category = %transaction.category,
            stock_delta = transaction.stock_delta(),
            "Transação registrada"
        );
        Ok(transaction)
    }

    pub async fn update_transaction(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: UpdateTransactionPayload,
    ) -> Result<Transaction, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = self
            .transaction_repo
            .find_for_update(&mut *tx, owner_id, id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;

        let product_id = match ProductReference::from_parts(changes.product_id, changes.product_name.as_deref()) {
            Some(reference) => Some(
                self.product_service
                    .resolve_reference(&mut *tx, owner_id, reference)
                    .await?,
            ),
            None => existing.product_id,
        };

        let draft = TransactionDraft::merged(&existing, changes, product_id);

        {
            let mut store = PgStockStore::new(&mut *tx);
            self.ledger
                .replace(&mut store, existing.applied_effect(), draft.stock_effect())
                .await?;
        }

        let transaction = self.transaction_repo.update(&mut *tx, id, &draft).await?;
        tx.commit().await?;

        tracing::info!(transaction_id = %transaction.id, "Transação editada");
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let transaction = self
            .transaction_repo
            .delete(&mut *tx, owner_id, id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;

        if let Some((product_id, applied)) = transaction.applied_effect() {
            let mut store = PgStockStore::new(&mut *tx);
            self.ledger.revert(&mut store, product_id, applied).await?;
        }

        tx.commit().await?;

        tracing::info!(transaction_id = %transaction.id, "Transação removida");
        Ok(())
    }
}
