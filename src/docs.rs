// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::list_categories,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::change_stock,

        // --- Inventory ---
        handlers::inventory::list_movements,
        handlers::inventory::create_movement,
        handlers::inventory::get_movement,
        handlers::inventory::update_movement,
        handlers::inventory::delete_movement,
        handlers::inventory::low_stock_alerts,

        // --- Transactions ---
        handlers::transactions::list_transactions,
        handlers::transactions::get_transaction,
        handlers::transactions::create_transaction,
        handlers::transactions::update_transaction,
        handlers::transactions::delete_transaction,

        // --- Dashboard ---
        handlers::dashboard::recent_transactions,
        handlers::dashboard::inventory_alerts,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Inventory ---
            models::inventory::Product,
            models::inventory::MovementKind,
            models::inventory::Movement,
            models::inventory::CreateProductPayload,
            models::inventory::UpdateProductPayload,
            models::inventory::StockChangeKind,
            models::inventory::StockChangePayload,
            models::inventory::CreateMovementPayload,
            models::inventory::UpdateMovementPayload,

            // --- Finance ---
            models::finance::TransactionKind,
            models::finance::Transaction,
            models::finance::CreateTransactionPayload,
            models::finance::UpdateTransactionPayload,

            // --- Dashboard ---
            models::dashboard::InventoryAlert,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Products", description = "Catálogo de Produtos"),
        (name = "Inventory", description = "Movimentações de Estoque e Alertas"),
        (name = "Transactions", description = "Receitas e Despesas"),
        (name = "Dashboard", description = "Painel: últimas transações e alertas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
