//! Serviços de estoque contra um Postgres real
//!
//! Precisa de `DATABASE_URL` apontando para um banco descartável; sem ela os
//! testes só avisam e retornam. Cada teste cria os próprios usuários, então
//! podem rodar em paralelo sobre o mesmo banco.

use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use stockbook::{
    common::error::AppError,
    config::{AppState, Settings},
    db::{user_repo::NewUser, PgStockStore, UserRepository},
    models::{
        auth::{User, UserRole},
        finance::{CreateTransactionPayload, TransactionKind},
        inventory::{CreateMovementPayload, CreateProductPayload, MovementKind, UpdateMovementPayload},
    },
    services::stock_ledger::StockStore,
};

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL não definida: teste ignorado");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Falha ao conectar no banco de testes");
    sqlx::migrate!().run(&pool).await.expect("Falha ao rodar as migrações");
    Some(pool)
}

fn state(pool: PgPool) -> AppState {
    let settings = Settings {
        database_url: String::new(),
        jwt_secret: "segredo-de-teste".into(),
        port: 0,
        max_connections: 5,
        jwt_ttl_days: 7,
    };
    AppState::from_pool(pool, &settings)
}

async fn create_user(pool: &PgPool, role: UserRole) -> User {
    let email = format!("{}@ferreteria.test", Uuid::new_v4());
    UserRepository::new(pool.clone())
        .create_user(
            pool,
            NewUser {
                name: "Ana Gómez",
                email: &email,
                password_hash: "hash",
                company_name: "Ferretería La 14",
                role,
                phone: None,
            },
        )
        .await
        .expect("Falha ao criar usuário de teste")
}

async fn create_product(state: &AppState, owner_id: Uuid, name: &str, stock: i32) -> Uuid {
    let payload = CreateProductPayload {
        name: name.to_string(),
        description: None,
        code: None,
        price: Decimal::new(25_000, 0),
        stock: Some(stock),
        stock_minimum: None,
        unit: None,
        category: "Herramientas".into(),
        supplier: None,
        location: None,
    };
    state
        .product_service
        .create_product(owner_id, &payload)
        .await
        .expect("Falha ao criar produto de teste")
        .id
}

async fn stock_of(pool: &PgPool, product_id: Uuid) -> i32 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .expect("produto existe")
}

async fn movement_count(pool: &PgPool, product_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM movements WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn movement(kind: MovementKind, quantity: i32, product_id: Uuid) -> CreateMovementPayload {
    CreateMovementPayload {
        occurred_at: None,
        kind,
        quantity,
        product_id: Some(product_id),
        product_name: None,
        notes: None,
        origin: None,
        destination: None,
        reference: None,
    }
}

fn transaction(category: &str, quantity: i32, product_id: Uuid) -> CreateTransactionPayload {
    CreateTransactionPayload {
        occurred_at: None,
        amount: Decimal::new(48_000, 0),
        kind: TransactionKind::Income,
        category: category.to_string(),
        description: None,
        quantity,
        product_id: Some(product_id),
        product_name: None,
    }
}

// ============================================================================
// PgStockStore
// ============================================================================

#[tokio::test]
async fn replace_stock_returns_the_overwritten_value() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Cinta métrica 5m", 15).await;

    let mut conn = pool.acquire().await.unwrap();
    let mut store = PgStockStore::new(&mut *conn);
    assert_eq!(store.replace_stock(product_id, 3).await.unwrap(), Some(15));
    assert_eq!(store.replace_stock(Uuid::new_v4(), 3).await.unwrap(), None);
    drop(conn);

    assert_eq!(stock_of(&pool, product_id).await, 3);
}

#[tokio::test]
async fn increment_past_integer_range_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Tornillo 1/4", i32::MAX).await;

    let result = state
        .movement_service
        .create_movement(&owner, movement(MovementKind::Inbound, 1, product_id))
        .await;

    assert!(matches!(result, Err(AppError::StockOutOfRange)));
    assert_eq!(stock_of(&pool, product_id).await, i32::MAX);
    assert_eq!(movement_count(&pool, product_id).await, 0);
}

// ============================================================================
// Movimentações
// ============================================================================

#[tokio::test]
async fn concurrent_outbounds_cannot_oversell() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Martillo de uña 16oz", 6).await;

    let (first, second) = tokio::join!(
        state
            .movement_service
            .create_movement(&owner, movement(MovementKind::Outbound, 6, product_id)),
        state
            .movement_service
            .create_movement(&owner, movement(MovementKind::Outbound, 6, product_id)),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(AppError::InsufficientStock))));
    assert_eq!(stock_of(&pool, product_id).await, 0);
    assert_eq!(movement_count(&pool, product_id).await, 1);
}

#[tokio::test]
async fn movement_scenario_end_to_end() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Llave inglesa 10", 10).await;
    let movements = &state.movement_service;

    movements
        .create_movement(&owner, movement(MovementKind::Inbound, 5, product_id))
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, product_id).await, 15);

    // Baixa recusada não deixa registro
    let refused = movements
        .create_movement(&owner, movement(MovementKind::Outbound, 20, product_id))
        .await;
    assert!(matches!(refused, Err(AppError::InsufficientStock)));
    assert_eq!(stock_of(&pool, product_id).await, 15);
    assert_eq!(movement_count(&pool, product_id).await, 1);

    let adjustment = movements
        .create_movement(&owner, movement(MovementKind::Adjustment, 3, product_id))
        .await
        .unwrap();
    assert_eq!(adjustment.previous_stock, Some(15));
    assert_eq!(stock_of(&pool, product_id).await, 3);

    movements.delete_movement(&owner, adjustment.id).await.unwrap();
    assert_eq!(stock_of(&pool, product_id).await, 15);
}

#[tokio::test]
async fn failed_edit_keeps_the_original_effect() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Destornillador plano", 10).await;
    let movements = &state.movement_service;

    let outbound = movements
        .create_movement(&owner, movement(MovementKind::Outbound, 4, product_id))
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, product_id).await, 6);

    let changes = UpdateMovementPayload { quantity: Some(50), ..Default::default() };
    let result = movements.update_movement(&owner, outbound.id, changes).await;

    assert!(matches!(result, Err(AppError::InsufficientStock)));
    assert_eq!(stock_of(&pool, product_id).await, 6);
    let stored = movements.get_movement(outbound.id).await.unwrap();
    assert_eq!(stored.quantity, 4);
}

#[tokio::test]
async fn deleting_a_movement_of_a_removed_product_succeeds() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Alicate universal", 10).await;

    let outbound = state
        .movement_service
        .create_movement(&owner, movement(MovementKind::Outbound, 2, product_id))
        .await
        .unwrap();
    state.product_service.delete_product(owner.id, product_id).await.unwrap();

    state.movement_service.delete_movement(&owner, outbound.id).await.unwrap();
    assert!(matches!(
        state.movement_service.get_movement(outbound.id).await,
        Err(AppError::MovementNotFound)
    ));
}

#[tokio::test]
async fn same_product_name_resolves_to_the_same_product() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;

    let by_name = |quantity| CreateMovementPayload {
        product_id: None,
        product_name: Some("Lija al agua 120".into()),
        ..movement(MovementKind::Inbound, quantity, Uuid::nil())
    };
    let first = state.movement_service.create_movement(&owner, by_name(3)).await.unwrap();
    let second = state.movement_service.create_movement(&owner, by_name(2)).await.unwrap();

    let product_id = first.product_id.expect("produto criado pelo nome");
    assert_eq!(second.product_id, Some(product_id));

    let product = state.product_service.get_product(owner.id, product_id).await.unwrap();
    assert_eq!(product.category, "Ferreteria");
    assert_eq!(product.price, Decimal::ZERO);
    assert_eq!(product.stock, 5);
}

#[tokio::test]
async fn employee_cannot_edit_or_delete_movements() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let employee = create_user(&pool, UserRole::Employee).await;
    let product_id = create_product(&state, owner.id, "Brocha 2 pulgadas", 10).await;

    let inbound = state
        .movement_service
        .create_movement(&owner, movement(MovementKind::Inbound, 1, product_id))
        .await
        .unwrap();

    let changes = UpdateMovementPayload { quantity: Some(3), ..Default::default() };
    assert!(matches!(
        state.movement_service.update_movement(&employee, inbound.id, changes).await,
        Err(AppError::OwnerRoleRequired)
    ));
    assert!(matches!(
        state.movement_service.delete_movement(&employee, inbound.id).await,
        Err(AppError::OwnerRoleRequired)
    ));
    assert_eq!(stock_of(&pool, product_id).await, 11);
}

#[tokio::test]
async fn product_of_another_owner_is_not_found() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let stranger = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Pala cuadrada", 10).await;

    let result = state
        .movement_service
        .create_movement(&stranger, movement(MovementKind::Outbound, 4, product_id))
        .await;

    assert!(matches!(result, Err(AppError::ProductNotFound)));
    assert_eq!(stock_of(&pool, product_id).await, 10);

    let sale = state
        .transaction_service
        .create_transaction(stranger.id, transaction("Ventas de productos", 4, product_id))
        .await;
    assert!(matches!(sale, Err(AppError::ProductNotFound)));
    assert_eq!(stock_of(&pool, product_id).await, 10);
}

#[tokio::test]
async fn duplicate_product_name_is_a_conflict() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    create_product(&state, owner.id, "Serrucho 20", 1).await;

    let payload = CreateProductPayload {
        name: "Serrucho 20".into(),
        description: None,
        code: None,
        price: Decimal::ZERO,
        stock: None,
        stock_minimum: None,
        unit: None,
        category: "Herramientas".into(),
        supplier: None,
        location: None,
    };
    let result = state.product_service.create_product(owner.id, &payload).await;
    assert!(matches!(result, Err(AppError::ProductNameAlreadyExists(_))));

    // Outro dono pode usar o mesmo nome
    let other = create_user(&pool, UserRole::Owner).await;
    assert!(state.product_service.create_product(other.id, &payload).await.is_ok());
}

// ============================================================================
// Transações
// ============================================================================

#[tokio::test]
async fn sale_transaction_moves_stock_and_delete_restores_it() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Nivel de burbuja", 10).await;
    let transactions = &state.transaction_service;

    let sale = transactions
        .create_transaction(owner.id, transaction("Ventas de productos", 4, product_id))
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, product_id).await, 6);

    transactions.delete_transaction(owner.id, sale.id).await.unwrap();
    assert_eq!(stock_of(&pool, product_id).await, 10);
}

#[tokio::test]
async fn neutral_transaction_leaves_stock_alone() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Guantes de carnaza", 10).await;

    let expense = state
        .transaction_service
        .create_transaction(owner.id, transaction("Otros gastos", 4, product_id))
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, product_id).await, 10);

    state
        .transaction_service
        .delete_transaction(owner.id, expense.id)
        .await
        .unwrap();
    assert_eq!(stock_of(&pool, product_id).await, 10);
}

#[tokio::test]
async fn oversized_sale_is_rejected_without_a_record() {
    let Some(pool) = test_pool().await else { return };
    let state = state(pool.clone());
    let owner = create_user(&pool, UserRole::Owner).await;
    let product_id = create_product(&state, owner.id, "Candado 40mm", 3).await;

    let result = state
        .transaction_service
        .create_transaction(owner.id, transaction("Ventas de productos", 4, product_id))
        .await;
    assert!(matches!(result, Err(AppError::InsufficientStock)));
    assert_eq!(stock_of(&pool, product_id).await, 3);

    let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(recorded, 0);
}
