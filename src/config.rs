// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{MovementRepository, ProductRepository, TransactionRepository, UserRepository},
    services::{
        auth::AuthService, dashboard_service::DashboardService, movement_service::MovementService,
        product_service::ProductService, stock_ledger::StockLedger,
        transaction_service::TransactionService,
    },
};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_JWT_TTL_DAYS: i64 = 7;

/// Configuração lida do ambiente (e do `.env`, se houver).
#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub max_connections: u32,
    pub jwt_ttl_days: i64,
}

// Variável opcional: ausente usa o padrão, presente precisa ser válida.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválida: '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            port: env_or("PORT", DEFAULT_PORT)?,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            jwt_ttl_days: env_or("JWT_TTL_DAYS", DEFAULT_JWT_TTL_DAYS)?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub product_service: ProductService,
    pub movement_service: MovementService,
    pub transaction_service: TransactionService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar no banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, settings))
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, settings: &Settings) -> Self {
        let ledger = StockLedger::new();

        let auth_service = AuthService::new(
            UserRepository::new(db_pool.clone()),
            settings.jwt_secret.clone(),
            settings.jwt_ttl_days,
        );
        let product_service =
            ProductService::new(db_pool.clone(), ProductRepository::new(db_pool.clone()), ledger);
        let movement_service = MovementService::new(
            db_pool.clone(),
            MovementRepository::new(db_pool.clone()),
            product_service.clone(),
            ledger,
        );
        let transaction_service = TransactionService::new(
            db_pool.clone(),
            TransactionRepository::new(db_pool.clone()),
            product_service.clone(),
            ledger,
        );
        let dashboard_service =
            DashboardService::new(product_service.clone(), transaction_service.clone());

        Self {
            db_pool,
            auth_service,
            product_service,
            movement_service,
            transaction_service,
            dashboard_service,
        }
    }
}
