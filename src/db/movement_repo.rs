// src/db/movement_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{day_range, Movement, MovementDraft, MovementFilter},
};

const LIST_LIMIT: i64 = 1000;

#[derive(Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Movimentações registradas pelo usuário, mais recentes primeiro.
    pub async fn list(&self, user_id: Uuid, filter: &MovementFilter) -> Result<Vec<Movement>, AppError> {
        let (from, until) = day_range(filter.start, filter.end);

        let movements = sqlx::query_as::<_, Movement>(
            r#"
            SELECT * FROM movements
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR product_id = $2)
              AND ($3::movement_kind IS NULL OR kind = $3)
              AND ($4::timestamptz IS NULL OR occurred_at >= $4)
              AND ($5::timestamptz IS NULL OR occurred_at < $5)
            ORDER BY occurred_at DESC
            LIMIT $6
            "#,
        )
            .bind(user_id)
            .bind(filter.product_id)
            .bind(filter.kind)
            .bind(from)
            .bind(until)
            .bind(LIST_LIMIT)
            .fetch_all(&self.pool)
            .await?;
        Ok(movements)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Movement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, Movement>("SELECT * FROM movements WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(movement)
    }

    /// Trava a linha até o fim da transação (edição concorrente espera).
    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Movement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, Movement>("SELECT * FROM movements WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(movement)
    }

    pub async fn insert<'e, E>(&self, executor: E, draft: &MovementDraft) -> Result<Movement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, Movement>(
            r#"
            INSERT INTO movements (
                occurred_at, kind, quantity, product_id, user_id,
                notes, origin, destination, reference, previous_stock
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
            .bind(draft.occurred_at)
            .bind(draft.kind)
            .bind(draft.quantity)
            .bind(draft.product_id)
            .bind(draft.user_id)
            .bind(draft.notes.as_deref())
            .bind(draft.origin.as_deref())
            .bind(draft.destination.as_deref())
            .bind(draft.reference.as_deref())
            .bind(draft.previous_stock)
            .fetch_one(executor)
            .await?;
        Ok(movement)
    }

    /// Regrava todos os campos editáveis (o rascunho já vem mesclado).
    pub async fn update<'e, E>(&self, executor: E, id: Uuid, draft: &MovementDraft) -> Result<Movement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Movement>(
            r#"
            UPDATE movements SET
                occurred_at = $2,
                kind = $3,
                quantity = $4,
                product_id = $5,
                notes = $6,
                origin = $7,
                destination = $8,
                reference = $9,
                previous_stock = $10,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(draft.occurred_at)
            .bind(draft.kind)
            .bind(draft.quantity)
            .bind(draft.product_id)
            .bind(draft.notes.as_deref())
            .bind(draft.origin.as_deref())
            .bind(draft.destination.as_deref())
            .bind(draft.reference.as_deref())
            .bind(draft.previous_stock)
            .fetch_optional(executor)
            .await?
            .ok_or(AppError::MovementNotFound)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Movement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, Movement>("DELETE FROM movements WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(movement)
    }
}
