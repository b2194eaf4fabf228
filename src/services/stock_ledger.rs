// src/services/stock_ledger.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{AppliedEffect, StockEffect},
};

/// Acesso mínimo ao campo `stock` dos produtos.
///
/// Cada método é UMA operação indivisível no armazenamento. Em especial,
/// `decrement_if_available` precisa ser ler-checar-escrever num passo só
/// (um único UPDATE condicional), nunca um SELECT seguido de UPDATE.
#[async_trait]
pub trait StockStore: Send {
    /// Soma `delta` sem nenhuma condição. `false` se o produto não existe.
    async fn increment(&mut self, product_id: Uuid, delta: i32) -> Result<bool, AppError>;

    /// Subtrai `quantity` somente se `stock >= quantity`.
    /// `false` se o produto não existe ou o saldo não basta.
    async fn decrement_if_available(&mut self, product_id: Uuid, quantity: i32) -> Result<bool, AppError>;

    /// Grava `new_stock` e devolve o valor imediatamente anterior.
    /// `None` se o produto não existe.
    async fn replace_stock(&mut self, product_id: Uuid, new_stock: i32) -> Result<Option<i32>, AppError>;
}

/// Regras de aplicação e reversão de efeitos sobre o estoque.
#[derive(Clone, Copy, Debug, Default)]
pub struct StockLedger;

impl StockLedger {
    pub fn new() -> Self {
        Self
    }

    /// Aplica uma variação relativa.
    ///
    /// Positiva: incremento incondicional. Negativa: decremento atômico,
    /// falhando com `InsufficientStock` se o produto não existe ou não tem
    /// saldo. Zero: não toca no produto.
    pub async fn apply<S>(&self, store: &mut S, product_id: Uuid, delta: i32) -> Result<(), AppError>
    where
        S: StockStore,
    {
        if delta == 0 {
            return Ok(());
        }

        if delta > 0 {
            if !store.increment(product_id, delta).await? {
                tracing::debug!(%product_id, delta, "Incremento ignorado: produto inexistente");
            }
            return Ok(());
        }

        let quantity = delta.saturating_neg();
        if !store.decrement_if_available(product_id, quantity).await? {
            tracing::info!(%product_id, quantity, "Baixa recusada: estoque insuficiente");
            return Err(AppError::InsufficientStock);
        }
        Ok(())
    }

    /// Ajuste absoluto. Devolve o estoque anterior (o snapshot `previousStock`).
    pub async fn apply_adjustment<S>(&self, store: &mut S, product_id: Uuid, new_stock: i32) -> Result<i32, AppError>
    where
        S: StockStore,
    {
        if new_stock < 0 {
            return Err(AppError::InvalidQuantity(new_stock));
        }

        let previous = store
            .replace_stock(product_id, new_stock)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        tracing::info!(%product_id, previous, new_stock, "Ajuste de estoque aplicado");
        Ok(previous)
    }

    /// Aplica o efeito de um registro novo (ou editado).
    /// Para ajustes devolve `Some(previous_stock)`; para variações, `None`.
    pub async fn apply_effect<S>(&self, store: &mut S, product_id: Uuid, effect: StockEffect) -> Result<Option<i32>, AppError>
    where
        S: StockStore,
    {
        match effect {
            StockEffect::Delta(delta) => {
                self.apply(store, product_id, delta).await?;
                Ok(None)
            }
            StockEffect::Set(new_stock) => {
                let previous = self.apply_adjustment(store, product_id, new_stock).await?;
                Ok(Some(previous))
            }
        }
    }

    /// Desfaz o efeito gravado por um registro.
    ///
    /// Nunca falha por falta de saldo nem por produto inexistente: variações
    /// são revertidas com incremento incondicional, ajustes voltam ao snapshot.
    pub async fn revert<S>(&self, store: &mut S, product_id: Uuid, applied: AppliedEffect) -> Result<(), AppError>
    where
        S: StockStore,
    {
        match applied {
            AppliedEffect::Delta(0) => {}
            AppliedEffect::Delta(delta) => {
                if !store.increment(product_id, delta.saturating_neg()).await? {
                    tracing::debug!(%product_id, "Reversão ignorada: produto inexistente");
                }
            }
            AppliedEffect::Adjustment { previous_stock: Some(previous) } => {
                if store.replace_stock(product_id, previous).await?.is_none() {
                    tracing::debug!(%product_id, "Reversão ignorada: produto inexistente");
                }
            }
            AppliedEffect::Adjustment { previous_stock: None } => {
                // Sem snapshot não há para onde voltar.
                tracing::warn!(%product_id, "Ajuste sem previousStock: reversão não aplicada");
            }
        }
        Ok(())
    }

    /// Troca o efeito antigo de um registro pelo novo (edição).
    ///
    /// Não é atômico por si só: quem chama deve rodar dentro de uma transação
    /// do banco para que uma falha no novo efeito desfaça também a reversão.
    pub async fn replace<S>(
        &self,
        store: &mut S,
        old: Option<(Uuid, AppliedEffect)>,
        new: Option<(Uuid, StockEffect)>,
    ) -> Result<Option<i32>, AppError>
    where
        S: StockStore,
    {
        if let Some((product_id, applied)) = old {
            self.revert(store, product_id, applied).await?;
        }

        match new {
            Some((product_id, effect)) => self.apply_effect(store, product_id, effect).await,
            None => Ok(None),
        }
    }
}
