// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{dashboard::InventoryAlert, finance::Transaction},
};

// GET /api/dashboard/transactions
#[utoipa::path(
    get,
    path = "/api/dashboard/transactions",
    tag = "Dashboard",
    responses(
        (status = 200, description = "As 20 transações mais recentes", body = Vec<Transaction>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn recent_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = app_state
        .dashboard_service
        .recent_transactions(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(transactions)))
}

// GET /api/dashboard/inventory-alerts
#[utoipa::path(
    get,
    path = "/api/dashboard/inventory-alerts",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Produtos abaixo do estoque mínimo", body = Vec<InventoryAlert>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn inventory_alerts(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = app_state
        .dashboard_service
        .inventory_alerts(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(alerts)))
}
