// src/models/finance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::serde_utils::{blank_string_as_none, blank_uuid_as_none};
use crate::models::inventory::{AppliedEffect, StockEffect};

pub const DEFAULT_CATEGORY: &str = "General";

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    #[serde(alias = "ingreso")]
    Income,
    #[serde(alias = "gasto")]
    Expense,
}

// Palavras-chave procuradas na categoria (minúsculas).
const SALE_KEYWORDS: [&str; 2] = ["sale", "venta"];
const PURCHASE_KEYWORDS: [&str; 2] = ["purchase", "compra"];

/// Direção do estoque inferida da categoria de uma transação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// Venda: sai do estoque.
    Out,
    /// Compra: entra no estoque.
    In,
}

impl StockDirection {
    /// "Ventas de productos" -> Out, "Compra de insumos" -> In, "Otros gastos" -> None.
    /// Venda tem prioridade quando a categoria cita as duas.
    pub fn from_category(category: &str) -> Option<Self> {
        let category = category.to_lowercase();
        if SALE_KEYWORDS.iter().any(|k| category.contains(k)) {
            Some(StockDirection::Out)
        } else if PURCHASE_KEYWORDS.iter().any(|k| category.contains(k)) {
            Some(StockDirection::In)
        } else {
            None
        }
    }
}

/// Variação de estoque de uma transação. Zero = sem efeito.
pub fn transaction_stock_delta(category: &str, quantity: i32) -> i32 {
    if quantity == 0 {
        return 0;
    }
    let magnitude = quantity.saturating_abs();
    match StockDirection::from_category(category) {
        Some(StockDirection::Out) => -magnitude,
        Some(StockDirection::In) => magnitude,
        None => 0,
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,

    //Positivo = Entrada, Negativo = Saída
    #[schema(example = "120000.00")]
    pub amount: Decimal,
    pub kind: TransactionKind,

    #[schema(example = "Ventas de productos")]
    pub category: String,
    pub description: Option<String>,

    #[schema(example = 4)]
    pub quantity: i32,
    pub product_id: Option<Uuid>,

    #[schema(ignore)]
    pub owner_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn stock_delta(&self) -> i32 {
        transaction_stock_delta(&self.category, self.quantity)
    }

    /// Produto afetado e o efeito a desfazer. `None` se não mexeu no estoque.
    pub fn applied_effect(&self) -> Option<(Uuid, AppliedEffect)> {
        let product_id = self.product_id?;
        match self.stock_delta() {
            0 => None,
            delta => Some((product_id, AppliedEffect::Delta(delta))),
        }
    }
}

// --- Payloads ---

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionPayload {
    pub occurred_at: Option<DateTime<Utc>>,
    #[schema(example = "120000.00")]
    pub amount: Decimal,
    pub kind: TransactionKind,

    #[serde(default = "default_category")]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Ventas de productos")]
    pub category: String,
    pub description: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "not_negative"))]
    pub quantity: i32,

    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    pub product_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_string_as_none")]
    pub product_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionPayload {
    pub occurred_at: Option<DateTime<Utc>>,
    pub amount: Option<Decimal>,
    pub kind: Option<TransactionKind>,

    #[validate(length(min = 1, message = "required"))]
    pub category: Option<String>,
    pub description: Option<String>,

    #[validate(range(min = 0, message = "not_negative"))]
    pub quantity: Option<i32>,

    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    pub product_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_string_as_none")]
    pub product_name: Option<String>,
}

/// Linha a gravar em `transactions`.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub occurred_at: DateTime<Utc>,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub product_id: Option<Uuid>,
    pub owner_id: Uuid,
}

impl TransactionDraft {
    pub fn stock_effect(&self) -> Option<(Uuid, StockEffect)> {
        let product_id = self.product_id?;
        match transaction_stock_delta(&self.category, self.quantity) {
            0 => None,
            delta => Some((product_id, StockEffect::Delta(delta))),
        }
    }

    pub fn merged(existing: &Transaction, changes: UpdateTransactionPayload, product_id: Option<Uuid>) -> Self {
        Self {
            occurred_at: changes.occurred_at.unwrap_or(existing.occurred_at),
            amount: changes.amount.unwrap_or(existing.amount),
            kind: changes.kind.unwrap_or(existing.kind),
            category: changes
                .category
                .map(|category| category.trim().to_string())
                .unwrap_or_else(|| existing.category.clone()),
            description: changes.description.or_else(|| existing.description.clone()),
            quantity: changes.quantity.unwrap_or(existing.quantity),
            product_id,
            owner_id: existing.owner_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_categories_take_stock_out() {
        assert_eq!(StockDirection::from_category("Ventas de productos"), Some(StockDirection::Out));
        assert_eq!(StockDirection::from_category("Product SALES"), Some(StockDirection::Out));
        assert_eq!(transaction_stock_delta("Ventas de productos", 4), -4);
    }

    #[test]
    fn purchase_categories_bring_stock_in() {
        assert_eq!(StockDirection::from_category("Compra de mercancía"), Some(StockDirection::In));
        assert_eq!(transaction_stock_delta("Purchase", -6), 6);
    }

    #[test]
    fn other_categories_have_no_effect() {
        assert_eq!(StockDirection::from_category("Otros gastos"), None);
        assert_eq!(transaction_stock_delta("Otros gastos", 4), 0);
    }

    #[test]
    fn zero_quantity_never_moves_stock() {
        assert_eq!(transaction_stock_delta("Ventas", 0), 0);
    }

    fn transaction(category: &str, quantity: i32, product_id: Option<Uuid>) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::new_v4(),
            occurred_at: now,
            amount: Decimal::new(120_000, 0),
            kind: TransactionKind::Income,
            category: category.to_string(),
            description: None,
            quantity,
            product_id,
            owner_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn transaction_without_product_has_nothing_to_revert() {
        assert_eq!(transaction("Ventas", 4, None).applied_effect(), None);
        let product_id = Uuid::new_v4();
        assert_eq!(
            transaction("Ventas", 4, Some(product_id)).applied_effect(),
            Some((product_id, AppliedEffect::Delta(-4)))
        );
    }

    #[test]
    fn edit_moving_to_a_neutral_category_drops_the_effect() {
        let product_id = Uuid::new_v4();
        let existing = transaction("Ventas", 4, Some(product_id));
        let changes = UpdateTransactionPayload { category: Some("Otros gastos".into()), ..Default::default() };

        let draft = TransactionDraft::merged(&existing, changes, existing.product_id);
        assert_eq!(draft.quantity, 4);
        assert_eq!(draft.stock_effect(), None);
    }

    #[test]
    fn edited_category_is_trimmed_like_on_create() {
        let existing = transaction("Otros gastos", 2, None);
        let changes = UpdateTransactionPayload { category: Some("  Compra de insumos ".into()), ..Default::default() };

        let draft = TransactionDraft::merged(&existing, changes, None);
        assert_eq!(draft.category, "Compra de insumos");
    }

    #[test]
    fn category_defaults_to_general() {
        let payload: CreateTransactionPayload =
            serde_json::from_str(r#"{"amount": 10, "kind": "gasto", "productId": ""}"#).unwrap();
        assert_eq!(payload.category, DEFAULT_CATEGORY);
        assert_eq!(payload.kind, TransactionKind::Expense);
        assert_eq!(payload.quantity, 0);
        assert_eq!(payload.product_id, None);
    }

    #[test]
    fn sale_wins_when_both_keywords_appear() {
        assert_eq!(StockDirection::from_category("compra-venta"), Some(StockDirection::Out));
    }
}
