// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{user_repo::NewUser, UserRepository},
    models::auth::{AuthResponse, Claims, LoginUserPayload, RegisterUserPayload, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_days: i64,
}

// E-mails são gravados e buscados sempre assim.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Gera um JWT HS256 com `sub` = ID do usuário.
pub fn issue_token(secret: &str, user_id: Uuid, ttl_days: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::days(ttl_days);

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

/// Valida assinatura e expiração. Qualquer falha vira `InvalidToken`.
pub fn decode_claims(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_days: i64) -> Self {
        Self { user_repo, jwt_secret, token_ttl_days }
    }

    pub async fn register_user(&self, payload: RegisterUserPayload) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&payload.email);

        // bcrypt é CPU-bound: fora do executor assíncrono
        let password = payload.password;
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self
            .user_repo
            .create_user(
                self.user_repo.pool(),
                NewUser {
                    name: payload.name.trim(),
                    email: &email,
                    password_hash: &password_hash,
                    company_name: payload.company_name.trim(),
                    role: payload.role.unwrap_or_default(),
                    phone: payload.phone.as_deref(),
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "Usuário registrado");

        let token = issue_token(&self.jwt_secret, user.id, self.token_ttl_days)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn login_user(&self, payload: LoginUserPayload) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&normalize_email(&payload.email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = payload.password;
        let password_hash = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = issue_token(&self.jwt_secret, user.id, self.token_ttl_days)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_carries_the_user_id() {
        let user_id = Uuid::new_v4();
        let token = issue_token("segredo", user_id, 7).unwrap();
        let claims = decode_claims("segredo", &token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token("segredo", Uuid::new_v4(), 7).unwrap();
        assert!(matches!(decode_claims("outro", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token("segredo", Uuid::new_v4(), -1).unwrap();
        assert!(matches!(decode_claims("segredo", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ana@Ferreteria.CO "), "ana@ferreteria.co");
    }
}
