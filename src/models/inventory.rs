// src/models/inventory.rs

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::serde_utils::{blank_string_as_none, blank_uuid_as_none};

// Valores usados quando um produto nasce só pelo nome (movimentação/transação).
pub const PLACEHOLDER_PRODUCT_CATEGORY: &str = "Ferreteria";
pub const DEFAULT_STOCK_MINIMUM: i32 = 5;
pub const DEFAULT_UNIT: &str = "unidad";

// --- 1. Produtos (Catálogo) ---
// `stock` é a quantidade atual. Só o ledger de estoque escreve nele.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub owner_id: Uuid,
    #[schema(example = "Martillo de uña 16oz")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "MRT-016")]
    pub code: Option<String>,
    #[schema(example = "25000.00")]
    pub price: Decimal,
    #[schema(example = 12)]
    pub stock: i32,
    #[schema(example = 5)]
    pub stock_minimum: i32,
    #[schema(example = "unidad")]
    pub unit: String,
    #[schema(example = "Ferreteria")]
    pub category: String,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.stock_minimum
    }
}

// --- 2. Movimentações de Estoque ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "movement_kind", rename_all = "snake_case")] // Banco
#[serde(rename_all = "snake_case")] // JSON
pub enum MovementKind {
    #[serde(alias = "entrada")]
    Inbound,
    #[serde(alias = "salida")]
    Outbound,
    #[serde(alias = "transferencia")]
    Transfer,
    #[serde(alias = "ajuste")]
    Adjustment,
}

/// Efeito que um registro quer produzir no estoque de um produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockEffect {
    /// Variação relativa. Zero não toca no produto.
    Delta(i32),
    /// Ajuste absoluto: o estoque passa a ser exatamente este valor.
    Set(i32),
}

/// Efeito já gravado por um registro, do jeito que a reversão precisa dele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedEffect {
    Delta(i32),
    Adjustment { previous_stock: Option<i32> },
}

impl MovementKind {
    /// entrada = +qtd; saída e transferência = -|qtd|; ajuste = valor absoluto.
    pub fn stock_effect(self, quantity: i32) -> StockEffect {
        match self {
            MovementKind::Inbound => StockEffect::Delta(quantity),
            MovementKind::Outbound | MovementKind::Transfer => {
                StockEffect::Delta(quantity.saturating_abs().saturating_neg())
            }
            MovementKind::Adjustment => StockEffect::Set(quantity),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub kind: MovementKind,
    #[schema(example = 5)]
    pub quantity: i32,
    pub product_id: Option<Uuid>,
    pub user_id: Uuid,
    pub notes: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub reference: Option<String>,
    /// Só preenchido em ajustes: estoque imediatamente antes do ajuste.
    pub previous_stock: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movement {
    /// Produto afetado e o efeito a desfazer. `None` se não há produto.
    pub fn applied_effect(&self) -> Option<(Uuid, AppliedEffect)> {
        let product_id = self.product_id?;
        let effect = match self.kind.stock_effect(self.quantity) {
            StockEffect::Delta(delta) => AppliedEffect::Delta(delta),
            StockEffect::Set(_) => AppliedEffect::Adjustment {
                previous_stock: self.previous_stock,
            },
        };
        Some((product_id, effect))
    }
}

// ---
// Validação Customizada
// ---
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("not_negative".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Referência a produto: por ID ou pelo nome (busca ou cria)
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductReference {
    Id(Uuid),
    Name(String),
}

impl ProductReference {
    /// O ID ganha do nome. Nome vazio não é referência.
    pub fn from_parts(id: Option<Uuid>, name: Option<&str>) -> Option<Self> {
        match (id, name.map(str::trim)) {
            (Some(id), _) => Some(ProductReference::Id(id)),
            (None, Some(name)) if !name.is_empty() => Some(ProductReference::Name(name.to_string())),
            _ => None,
        }
    }
}

// ---
// Payloads: Produtos
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Martillo de uña 16oz")]
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "25000.00")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "not_negative"))]
    pub stock: Option<i32>,

    #[validate(range(min = 0, message = "not_negative"))]
    pub stock_minimum: Option<i32>,

    pub unit: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Herramientas")]
    pub category: String,
    pub supplier: Option<String>,
    pub location: Option<String>,
}

/// Atualização parcial. `stock`, se vier, passa pelo ledger como ajuste absoluto.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "not_negative"))]
    pub stock: Option<i32>,

    #[validate(range(min = 0, message = "not_negative"))]
    pub stock_minimum: Option<i32>,

    pub unit: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockChangeKind {
    #[serde(alias = "entrada")]
    Inbound,
    #[serde(alias = "salida")]
    Outbound,
}

/// Entrada/saída direta de estoque (sem registro de movimentação).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockChangePayload {
    #[validate(range(min = 1, message = "must_be_positive"))]
    #[schema(example = 3)]
    pub quantity: i32,
    pub kind: StockChangeKind,
}

impl StockChangePayload {
    pub fn delta(&self) -> i32 {
        match self.kind {
            StockChangeKind::Inbound => self.quantity,
            StockChangeKind::Outbound => self.quantity.saturating_neg(),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub category: Option<String>,
    /// Busca por nome ou código (sem diferenciar maiúsculas)
    pub search: Option<String>,
    /// Só produtos com `stock <= stockMinimum`
    pub low_stock: Option<bool>,
}

// ---
// Payloads: Movimentações
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementPayload {
    pub occurred_at: Option<DateTime<Utc>>,
    pub kind: MovementKind,
    #[schema(example = 5)]
    pub quantity: i32,

    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    pub product_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_string_as_none")]
    pub product_name: Option<String>,

    pub notes: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub reference: Option<String>,
}

/// Campos ausentes mantêm o valor atual da movimentação.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovementPayload {
    pub occurred_at: Option<DateTime<Utc>>,
    pub kind: Option<MovementKind>,
    pub quantity: Option<i32>,

    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    pub product_id: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_string_as_none")]
    pub product_name: Option<String>,

    pub notes: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub reference: Option<String>,
}

/// Linha a gravar em `movements` (insert ou update).
#[derive(Debug, Clone)]
pub struct MovementDraft {
    pub occurred_at: DateTime<Utc>,
    pub kind: MovementKind,
    pub quantity: i32,
    pub product_id: Option<Uuid>,
    pub user_id: Uuid,
    pub notes: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub reference: Option<String>,
    pub previous_stock: Option<i32>,
}

impl MovementDraft {
    pub fn stock_effect(&self) -> Option<(Uuid, StockEffect)> {
        self.product_id
            .map(|product_id| (product_id, self.kind.stock_effect(self.quantity)))
    }

    /// Mescla a edição sobre a movimentação existente.
    /// O produto é resolvido à parte e chega já como ID.
    pub fn merged(existing: &Movement, changes: UpdateMovementPayload, product_id: Option<Uuid>) -> Self {
        Self {
            occurred_at: changes.occurred_at.unwrap_or(existing.occurred_at),
            kind: changes.kind.unwrap_or(existing.kind),
            quantity: changes.quantity.unwrap_or(existing.quantity),
            product_id,
            user_id: existing.user_id,
            notes: changes.notes.or_else(|| existing.notes.clone()),
            origin: changes.origin.or_else(|| existing.origin.clone()),
            destination: changes.destination.or_else(|| existing.destination.clone()),
            reference: changes.reference.or_else(|| existing.reference.clone()),
            previous_stock: None,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MovementFilter {
    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    #[param(value_type = Option<Uuid>)]
    pub product_id: Option<Uuid>,
    pub kind: Option<MovementKind>,
    /// Primeiro dia (inclusive), YYYY-MM-DD
    pub start: Option<NaiveDate>,
    /// Último dia (inclusive), YYYY-MM-DD
    pub end: Option<NaiveDate>,
}

/// Converte um intervalo de dias em [início, fim) no fuso UTC.
pub fn day_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = start.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc());
    let until = end
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc());
    (from, until)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movement(kind: MovementKind, quantity: i32, product_id: Option<Uuid>) -> Movement {
        let now = Utc::now();
        Movement {
            id: Uuid::new_v4(),
            occurred_at: now,
            kind,
            quantity,
            product_id,
            user_id: Uuid::new_v4(),
            notes: None,
            origin: None,
            destination: None,
            reference: None,
            previous_stock: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn inbound_adds_quantity_as_given() {
        assert_eq!(MovementKind::Inbound.stock_effect(7), StockEffect::Delta(7));
    }

    #[test]
    fn outbound_and_transfer_always_subtract() {
        assert_eq!(MovementKind::Outbound.stock_effect(3), StockEffect::Delta(-3));
        assert_eq!(MovementKind::Outbound.stock_effect(-3), StockEffect::Delta(-3));
        assert_eq!(MovementKind::Transfer.stock_effect(4), StockEffect::Delta(-4));
    }

    #[test]
    fn adjustment_is_an_absolute_set() {
        assert_eq!(MovementKind::Adjustment.stock_effect(3), StockEffect::Set(3));
    }

    #[test]
    fn applied_effect_needs_a_product() {
        assert_eq!(movement(MovementKind::Inbound, 5, None).applied_effect(), None);

        let product_id = Uuid::new_v4();
        let mut adj = movement(MovementKind::Adjustment, 3, Some(product_id));
        adj.previous_stock = Some(15);
        assert_eq!(
            adj.applied_effect(),
            Some((product_id, AppliedEffect::Adjustment { previous_stock: Some(15) }))
        );
    }

    #[test]
    fn product_reference_prefers_id_and_ignores_blank_names() {
        let id = Uuid::new_v4();
        assert_eq!(
            ProductReference::from_parts(Some(id), Some("Taladro")),
            Some(ProductReference::Id(id))
        );
        assert_eq!(
            ProductReference::from_parts(None, Some(" Taladro ")),
            Some(ProductReference::Name("Taladro".into()))
        );
        assert_eq!(ProductReference::from_parts(None, Some("   ")), None);
        assert_eq!(ProductReference::from_parts(None, None), None);
    }

    #[test]
    fn edit_keeps_fields_the_payload_omits() {
        let product_id = Uuid::new_v4();
        let mut existing = movement(MovementKind::Outbound, 4, Some(product_id));
        existing.notes = Some("pedido 118".into());

        let changes = UpdateMovementPayload { quantity: Some(6), ..Default::default() };
        let draft = MovementDraft::merged(&existing, changes, existing.product_id);

        assert_eq!(draft.kind, MovementKind::Outbound);
        assert_eq!(draft.quantity, 6);
        assert_eq!(draft.notes.as_deref(), Some("pedido 118"));
        assert_eq!(draft.stock_effect(), Some((product_id, StockEffect::Delta(-6))));
    }

    #[test]
    fn stock_change_payload_signs_the_quantity() {
        let payload = StockChangePayload { quantity: 3, kind: StockChangeKind::Outbound };
        assert_eq!(payload.delta(), -3);
        assert!(StockChangePayload { quantity: 0, kind: StockChangeKind::Inbound }.validate().is_err());
    }

    #[test]
    fn negative_prices_are_rejected() {
        let payload = UpdateProductPayload { price: Some(Decimal::new(-100, 2)), ..Default::default() };
        assert!(payload.validate().is_err());
        let payload = UpdateProductPayload { price: Some(Decimal::ZERO), ..Default::default() };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn day_range_makes_the_end_day_inclusive() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let (from, until) = day_range(Some(day), Some(day));
        assert_eq!(from.unwrap().to_rfc3339(), "2025-03-31T00:00:00+00:00");
        assert_eq!(until.unwrap().to_rfc3339(), "2025-04-01T00:00:00+00:00");
    }

    #[test]
    fn kind_accepts_legacy_spanish_names() {
        let kind: MovementKind = serde_json::from_str("\"salida\"").unwrap();
        assert_eq!(kind, MovementKind::Outbound);
    }
}
