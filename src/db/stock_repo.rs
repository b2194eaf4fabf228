// src/db/stock_repo.rs

use async_trait::async_trait;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{common::error::AppError, services::stock_ledger::StockStore};

/// `StockStore` sobre uma conexão Postgres (normalmente uma transação aberta).
///
/// Todas as escritas são um único UPDATE: a checagem de saldo vive na
/// cláusula WHERE, então duas baixas concorrentes nunca passam juntas.
pub struct PgStockStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> PgStockStore<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }
}

// SQLSTATE 22003 (numeric_value_out_of_range): `stock + $2` estourou o INTEGER.
fn map_out_of_range(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("22003") {
            return AppError::StockOutOfRange;
        }
    }
    e.into()
}

#[async_trait]
impl<'c> StockStore for PgStockStore<'c> {
    async fn increment(&mut self, product_id: Uuid, delta: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE products SET stock = stock + $2, updated_at = now() WHERE id = $1",
        )
            .bind(product_id)
            .bind(delta)
            .execute(&mut *self.conn)
            .await
            .map_err(map_out_of_range)?;

        Ok(result.rows_affected() > 0)
    }

    async fn decrement_if_available(&mut self, product_id: Uuid, quantity: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = now()
            WHERE id = $1 AND stock >= $2
            "#,
        )
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace_stock(&mut self, product_id: Uuid, new_stock: i32) -> Result<Option<i32>, AppError> {
        // O sub-SELECT trava a linha e lê o valor que será sobrescrito.
        let previous = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE products AS p
            SET stock = $2, updated_at = now()
            FROM (SELECT id, stock FROM products WHERE id = $1 FOR UPDATE) AS prev
            WHERE p.id = prev.id
            RETURNING prev.stock
            "#,
        )
            .bind(product_id)
            .bind(new_stock)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(previous)
    }
}
