// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{
        CreateProductPayload, DEFAULT_STOCK_MINIMUM, DEFAULT_UNIT, PLACEHOLDER_PRODUCT_CATEGORY,
        Product, ProductFilter, UpdateProductPayload,
    },
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

fn map_unique_name(e: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some("products_owner_name_key") {
            return AppError::ProductNameAlreadyExists(name.to_string());
        }
    }
    e.into()
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list(&self, owner_id: Uuid, filter: &ProductFilter) -> Result<Vec<Product>, AppError> {
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE owner_id = $1
              AND ($2::text IS NULL OR category = $2)
              AND ($3::text IS NULL OR name ILIKE $3 OR code ILIKE $3)
              AND (NOT $4 OR stock <= stock_minimum)
            ORDER BY name ASC
            "#,
        )
            .bind(owner_id)
            .bind(filter.category.as_deref())
            .bind(search)
            .bind(filter.low_stock.unwrap_or(false))
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn list_categories(&self, owner_id: Uuid) -> Result<Vec<String>, AppError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products WHERE owner_id = $1 ORDER BY category ASC",
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, owner_id: Uuid, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Produtos com `stock <= stock_minimum`, do mais crítico para o menos.
    pub async fn low_stock(&self, owner_id: Uuid) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE owner_id = $1 AND stock <= stock_minimum
            ORDER BY stock ASC, name ASC
            "#,
        )
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    // ---
    // Escrita
    // ---

    pub async fn create<'e, E>(&self, executor: E, owner_id: Uuid, payload: &CreateProductPayload) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let name = payload.name.trim();
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                owner_id, name, description, code, price, stock,
                stock_minimum, unit, category, supplier, location
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
            .bind(owner_id)
            .bind(name)
            .bind(payload.description.as_deref())
            .bind(payload.code.as_deref())
            .bind(payload.price)
            .bind(payload.stock.unwrap_or(0))
            .bind(payload.stock_minimum.unwrap_or(DEFAULT_STOCK_MINIMUM))
            .bind(payload.unit.as_deref().unwrap_or(DEFAULT_UNIT))
            .bind(payload.category.trim())
            .bind(payload.supplier.as_deref())
            .bind(payload.location.as_deref())
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_name(e, name))
    }

    /// Atualiza os campos descritivos. O estoque não passa por aqui.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let name = payload.name.as_deref().map(str::trim);
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                code = COALESCE($5, code),
                price = COALESCE($6, price),
                stock_minimum = COALESCE($7, stock_minimum),
                unit = COALESCE($8, unit),
                category = COALESCE($9, category),
                supplier = COALESCE($10, supplier),
                location = COALESCE($11, location),
                updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(owner_id)
            .bind(name)
            .bind(payload.description.as_deref())
            .bind(payload.code.as_deref())
            .bind(payload.price)
            .bind(payload.stock_minimum)
            .bind(payload.unit.as_deref())
            .bind(payload.category.as_deref().map(str::trim))
            .bind(payload.supplier.as_deref())
            .bind(payload.location.as_deref())
            .fetch_optional(executor)
            .await
            .map_err(|e| map_unique_name(e, name.unwrap_or_default()))
    }

    pub async fn delete<'e, E>(&self, executor: E, owner_id: Uuid, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("DELETE FROM products WHERE id = $1 AND owner_id = $2 RETURNING *")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Busca pelo nome exato; se não existir, cria com categoria provisória e preço zero.
    ///
    /// O ON CONFLICT faz o "busca ou cria" num comando só, sem corrida entre
    /// duas requisições com o mesmo nome.
    pub async fn find_or_create_by_name<'e, E>(&self, executor: E, owner_id: Uuid, name: &str) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (owner_id, name, price, stock, stock_minimum, unit, category)
            VALUES ($1, $2, $3, 0, $4, $5, $6)
            ON CONFLICT (owner_id, name) DO UPDATE SET name = EXCLUDED.name
            RETURNING *
            "#,
        )
            .bind(owner_id)
            .bind(name)
            .bind(Decimal::ZERO)
            .bind(DEFAULT_STOCK_MINIMUM)
            .bind(DEFAULT_UNIT)
            .bind(PLACEHOLDER_PRODUCT_CATEGORY)
            .fetch_one(executor)
            .await?;
        Ok(product)
    }
}
