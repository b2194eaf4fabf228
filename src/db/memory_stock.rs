// src/db/memory_stock.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{common::error::AppError, services::stock_ledger::StockStore};

/// `StockStore` em memória, para desenvolvimento e testes.
///
/// Clones compartilham o mesmo mapa; cada operação roda inteira sob o mutex,
/// o que dá a mesma garantia do UPDATE condicional do Postgres.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStockStore {
    stock: Arc<Mutex<HashMap<Uuid, i32>>>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_product(&self, product_id: Uuid, stock: i32) -> Result<(), AppError> {
        self.lock()?.insert(product_id, stock);
        Ok(())
    }

    pub fn remove_product(&self, product_id: Uuid) -> Result<(), AppError> {
        self.lock()?.remove(&product_id);
        Ok(())
    }

    pub fn stock_of(&self, product_id: Uuid) -> Result<Option<i32>, AppError> {
        Ok(self.lock()?.get(&product_id).copied())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, i32>>, AppError> {
        self.stock
            .lock()
            .map_err(|_| anyhow::anyhow!("mutex do estoque envenenado").into())
    }
}

#[async_trait]
impl StockStore for InMemoryStockStore {
    async fn increment(&mut self, product_id: Uuid, delta: i32) -> Result<bool, AppError> {
        let mut stock = self.lock()?;
        match stock.get_mut(&product_id) {
            Some(current) => {
                // Mesmo comportamento do Postgres: estouro de INTEGER é erro
                *current = current.checked_add(delta).ok_or(AppError::StockOutOfRange)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn decrement_if_available(&mut self, product_id: Uuid, quantity: i32) -> Result<bool, AppError> {
        let mut stock = self.lock()?;
        match stock.get_mut(&product_id) {
            Some(current) if *current >= quantity => {
                *current -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn replace_stock(&mut self, product_id: Uuid, new_stock: i32) -> Result<Option<i32>, AppError> {
        let mut stock = self.lock()?;
        Ok(stock
            .get_mut(&product_id)
            .map(|current| std::mem::replace(current, new_stock)))
    }
}
