// src/services/movement_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MovementRepository, PgStockStore},
    models::{
        auth::User,
        inventory::{
            CreateMovementPayload, Movement, MovementDraft, MovementFilter, ProductReference,
            UpdateMovementPayload,
        },
    },
    services::{product_service::ProductService, stock_ledger::StockLedger},
};

/// Registro de movimentações. Cada operação roda numa transação do banco:
/// o registro e o estoque são gravados juntos ou nenhum dos dois.
#[derive(Clone)]
pub struct MovementService {
    pool: PgPool,
    movement_repo: MovementRepository,
    product_service: ProductService,
    ledger: StockLedger,
}

impl MovementService {
    pub fn new(
        pool: PgPool,
        movement_repo: MovementRepository,
        product_service: ProductService,
        ledger: StockLedger,
    ) -> Self {
        Self { pool, movement_repo, product_service, ledger }
    }

    pub async fn list_movements(&self, user_id: Uuid, filter: &MovementFilter) -> Result<Vec<Movement>, AppError> {
        self.movement_repo.list(user_id, filter).await
    }

    pub async fn get_movement(&self, id: Uuid) -> Result<Movement, AppError> {
        self.movement_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::MovementNotFound)
    }

    pub async fn create_movement(&self, user: &User, payload: CreateMovementPayload) -> Result<Movement, AppError> {
        let mut tx = self.pool.begin().await?;

        let product_id = match ProductReference::from_parts(payload.product_id, payload.product_name.as_deref()) {
            Some(reference) => Some(
                self.product_service
                    .resolve_reference(&mut *tx, user.id, reference)
                    .await?,
            ),
            None => None,
        };

        let mut draft = MovementDraft {
            occurred_at: payload.occurred_at.unwrap_or_else(Utc::now),
            kind: payload.kind,
            quantity: payload.quantity,
            product_id,
            user_id: user.id,
            notes: payload.notes,
            origin: payload.origin,
            destination: payload.destination,
            reference: payload.reference,
            previous_stock: None,
        };

        // Efeito primeiro: se o ledger recusar, nada é gravado.
        if let Some((product_id, effect)) = draft.stock_effect() {
            let mut store = PgStockStore::new(&mut *tx);
            draft.previous_stock = self.ledger.apply_effect(&mut store, product_id, effect).await?;
        }

        let movement = self.movement_repo.insert(&mut *tx, &draft).await?;
        tx.commit().await?;

        tracing::info!(
            movement_id = %movement.id,
            kind = ?movement.kind,
            quantity = movement.quantity,
            "Movimentação registrada"
        );
        Ok(movement)
    }

    /// Reverte o efeito antigo e aplica o novo. Se o novo falhar, a transação
    /// desfaz a reversão e o estoque fica como estava.
    pub async fn update_movement(
        &self,
        user: &User,
        id: Uuid,
        changes: UpdateMovementPayload,
    ) -> Result<Movement, AppError> {
        if !user.is_owner() {
            return Err(AppError::OwnerRoleRequired);
        }

        let mut tx = self.pool.begin().await?;

        let existing = self
            .movement_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::MovementNotFound)?;

        // Sem referência nova, continua no mesmo produto
        let product_id = match ProductReference::from_parts(changes.product_id, changes.product_name.as_deref()) {
            Some(reference) => Some(
                self.product_service
                    .resolve_reference(&mut *tx, user.id, reference)
                    .await?,
            ),
            None => existing.product_id,
        };

        let mut draft = MovementDraft::merged(&existing, changes, product_id);

        {
            let mut store = PgStockStore::new(&mut *tx);
            draft.previous_stock = self
                .ledger
                .replace(&mut store, existing.applied_effect(), draft.stock_effect())
                .await?;
        }

        let movement = self.movement_repo.update(&mut *tx, id, &draft).await?;
        tx.commit().await?;

        tracing::info!(movement_id = %movement.id, "Movimentação editada");
        Ok(movement)
    }

    pub async fn delete_movement(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        if !user.is_owner() {
            return Err(AppError::OwnerRoleRequired);
        }

        let mut tx = self.pool.begin().await?;

        let movement = self
            .movement_repo
            .delete(&mut *tx, id)
            .await?
            .ok_or(AppError::MovementNotFound)?;

        if let Some((product_id, applied)) = movement.applied_effect() {
            let mut store = PgStockStore::new(&mut *tx);
            self.ledger.revert(&mut store, product_id, applied).await?;
        }

        tx.commit().await?;

        tracing::info!(movement_id = %movement.id, "Movimentação removida");
        Ok(())
    }
}
