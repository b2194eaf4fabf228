// src/router.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

pub fn build_router(app_state: AppState) -> Router {
    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/categories/list", get(handlers::products::list_categories))
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/{id}/stock", post(handlers::products::change_stock));

    let inventory_routes = Router::new()
        .route(
            "/movements",
            get(handlers::inventory::list_movements).post(handlers::inventory::create_movement),
        )
        .route(
            "/movements/{id}",
            get(handlers::inventory::get_movement)
                .put(handlers::inventory::update_movement)
                .delete(handlers::inventory::delete_movement),
        )
        .route("/alerts/low-stock", get(handlers::inventory::low_stock_alerts));

    let transaction_routes = Router::new()
        .route(
            "/",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/{id}",
            get(handlers::transactions::get_transaction)
                .put(handlers::transactions::update_transaction)
                .delete(handlers::transactions::delete_transaction),
        );

    let dashboard_routes = Router::new()
        .route("/transactions", get(handlers::dashboard::recent_transactions))
        .route("/inventory-alerts", get(handlers::dashboard::inventory_alerts));

    // Tudo aqui exige token
    let protected = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_me))
        .nest("/api/products", product_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/transactions", transaction_routes)
        .nest("/api/dashboard", dashboard_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(health))
        // Rotas de autenticação (públicas)
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
