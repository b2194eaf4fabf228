// src/db/transaction_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        finance::{Transaction, TransactionDraft, TransactionFilter},
        inventory::day_range,
    },
};

const LIST_LIMIT: i64 = 200;

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, owner_id: Uuid, filter: &TransactionFilter) -> Result<Vec<Transaction>, AppError> {
        let (from, until) = day_range(filter.start, filter.end);

        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE owner_id = $1
              AND ($2::transaction_kind IS NULL OR kind = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::timestamptz IS NULL OR occurred_at >= $4)
              AND ($5::timestamptz IS NULL OR occurred_at < $5)
            ORDER BY occurred_at DESC
            LIMIT $6
            "#,
        )
            .bind(owner_id)
            .bind(filter.kind)
            .bind(filter.category.as_deref())
            .bind(from)
            .bind(until)
            .bind(LIST_LIMIT)
            .fetch_all(&self.pool)
            .await?;
        Ok(transactions)
    }

    /// Últimas transações do dono (painel).
    pub async fn recent(&self, owner_id: Uuid, limit: i64) -> Result<Vec<Transaction>, AppError> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE owner_id = $1 ORDER BY occurred_at DESC LIMIT $2",
        )
            .bind(owner_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(transactions)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, owner_id: Uuid, id: Uuid) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = $1 AND owner_id = $2",
        )
            .bind(id)
            .bind(owner_id)
            .fetch_optional(executor)
            .await?;
        Ok(transaction)
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, owner_id: Uuid, id: Uuid) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            "SELECT * FROM transactions WHERE id = $1 AND owner_id = $2 FOR UPDATE",
        )
            .bind(id)
            .bind(owner_id)
            .fetch_optional(executor)
            .await?;
        Ok(transaction)
    }

    pub async fn insert<'e, E>(&self, executor: E, draft: &TransactionDraft) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                occurred_at, amount, kind, category, description,
                quantity, product_id, owner_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
            .bind(draft.occurred_at)
            .bind(draft.amount)
            .bind(draft.kind)
            .bind(&draft.category)
            .bind(draft.description.as_deref())
            .bind(draft.quantity)
            .bind(draft.product_id)
            .bind(draft.owner_id)
            .fetch_one(executor)
            .await?;
        Ok(transaction)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, draft: &TransactionDraft) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions SET
                occurred_at = $3,
                amount = $4,
                kind = $5,
                category = $6,
                description = $7,
                quantity = $8,
                product_id = $9,
                updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(draft.owner_id)
            .bind(draft.occurred_at)
            .bind(draft.amount)
            .bind(draft.kind)
            .bind(&draft.category)
            .bind(draft.description.as_deref())
            .bind(draft.quantity)
            .bind(draft.product_id)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::TransactionNotFound)
    }

    pub async fn delete<'e, E>(&self, executor: E, owner_id: Uuid, id: Uuid) -> Result<Option<Transaction>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            "DELETE FROM transactions WHERE id = $1 AND owner_id = $2 RETURNING *",
        )
            .bind(id)
            .bind(owner_id)
            .fetch_optional(executor)
            .await?;
        Ok(transaction)
    }
}
