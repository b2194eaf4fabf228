// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Ação restrita ao dono da empresa")]
    OwnerRoleRequired,

    // --- Catálogo / Estoque ---
    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Já existe um produto chamado '{0}'")]
    ProductNameAlreadyExists(String),

    #[error("Estoque insuficiente")]
    InsufficientStock,

    #[error("Quantidade inválida: {0}")]
    InvalidQuantity(i32),

    #[error("Estoque fora do intervalo suportado")]
    StockOutOfRange,

    #[error("Movimentação não encontrada")]
    MovementNotFound,

    #[error("Transação não encontrada")]
    TransactionNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` captura o contexto de erros inesperados.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// Resposta de erro pronta para o cliente (já traduzida).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InsufficientStock
            | AppError::InvalidQuantity(_)
            | AppError::StockOutOfRange => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists | AppError::ProductNameAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::OwnerRoleRequired => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::ProductNotFound
            | AppError::MovementNotFound
            | AppError::TransactionNotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave da mensagem no catálogo de traduções.
    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::EmailAlreadyExists => "error.email_already_exists",
            AppError::InvalidCredentials => "error.invalid_credentials",
            AppError::InvalidToken => "error.invalid_token",
            AppError::UserNotFound => "error.user_not_found",
            AppError::OwnerRoleRequired => "error.owner_role_required",
            AppError::ProductNotFound => "error.product_not_found",
            AppError::ProductNameAlreadyExists(_) => "error.product_name_already_exists",
            AppError::InsufficientStock => "error.insufficient_stock",
            AppError::InvalidQuantity(_) => "error.invalid_quantity",
            AppError::StockOutOfRange => "error.stock_out_of_range",
            AppError::MovementNotFound => "error.movement_not_found",
            AppError::TransactionNotFound => "error.transaction_not_found",
            _ => "error.internal",
        }
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica no log, nunca na resposta.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or_else(|| e.code.as_ref());
                            Value::String(i18n::translate(&locale.0, key).to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(details))
            }
            _ => None,
        };

        ApiError {
            status,
            error: i18n::translate(&locale.0, self.message_key()).to_string(),
            details,
        }
    }
}

// Usado pelos middlewares, que não têm acesso ao `Locale` do handler.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn ledger_errors_map_to_client_errors() {
        assert_eq!(AppError::InsufficientStock.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidQuantity(-1).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::StockOutOfRange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::ProductNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::OwnerRoleRequired.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let err = AppError::InternalServerError(anyhow::anyhow!("pool exhausted"));
        let api = err.to_api_error(&Locale("en".into()));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("pool"));
    }

    #[test]
    fn messages_follow_the_locale() {
        let es = AppError::InsufficientStock.to_api_error(&Locale("es".into()));
        let en = AppError::InsufficientStock.to_api_error(&Locale("en".into()));
        assert_eq!(es.error, "Stock insuficiente");
        assert_eq!(en.error, "Insufficient stock");
    }

    #[test]
    fn validation_details_are_grouped_by_field() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("not_negative".into());
        errors.add("price", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()));
        assert_eq!(api.status, StatusCode::BAD_REQUEST);

        let details = api.details.expect("details");
        assert_eq!(details["price"][0], "Value cannot be negative.");
    }
}
