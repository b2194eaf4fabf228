// src/handlers/inventory.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{OwnerRole, RequireRole},
    },
    models::inventory::{
        CreateMovementPayload, Movement, MovementFilter, Product, UpdateMovementPayload,
    },
};

// GET /api/inventory/movements
#[utoipa::path(
    get,
    path = "/api/inventory/movements",
    tag = "Inventory",
    params(MovementFilter),
    responses(
        (status = 200, description = "Movimentações do usuário, mais recentes primeiro", body = Vec<Movement>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_movements(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<MovementFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let movements = app_state
        .movement_service
        .list_movements(user.id, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(movements)))
}

// POST /api/inventory/movements
#[utoipa::path(
    post,
    path = "/api/inventory/movements",
    tag = "Inventory",
    request_body = CreateMovementPayload,
    responses(
        (status = 201, description = "Movimentação registrada e estoque atualizado", body = Movement),
        (status = 400, description = "Estoque insuficiente ou quantidade inválida"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let movement = app_state
        .movement_service
        .create_movement(&user, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(movement)))
}

// GET /api/inventory/movements/{id}
#[utoipa::path(
    get,
    path = "/api/inventory/movements/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses(
        (status = 200, body = Movement),
        (status = 404, description = "Movimentação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let movement = app_state
        .movement_service
        .get_movement(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(movement)))
}

// PUT /api/inventory/movements/{id}
#[utoipa::path(
    put,
    path = "/api/inventory/movements/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    request_body = UpdateMovementPayload,
    responses(
        (status = 200, description = "Movimentação editada; efeito antigo revertido e novo aplicado", body = Movement),
        (status = 400, description = "Estoque insuficiente ou quantidade inválida"),
        (status = 403, description = "Apenas o dono pode editar"),
        (status = 404, description = "Movimentação ou produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<OwnerRole>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let movement = app_state
        .movement_service
        .update_movement(&user, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(movement)))
}

// DELETE /api/inventory/movements/{id}
#[utoipa::path(
    delete,
    path = "/api/inventory/movements/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses(
        (status = 204, description = "Movimentação removida e efeito revertido"),
        (status = 403, description = "Apenas o dono pode remover"),
        (status = 404, description = "Movimentação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_movement(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<OwnerRole>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .movement_service
        .delete_movement(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/inventory/alerts/low-stock
#[utoipa::path(
    get,
    path = "/api/inventory/alerts/low-stock",
    tag = "Inventory",
    responses(
        (status = 200, description = "Produtos com estoque no mínimo ou abaixo", body = Vec<Product>)
    ),
    security(("api_jwt" = []))
)]
pub async fn low_stock_alerts(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .product_service
        .low_stock(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(products)))
}
