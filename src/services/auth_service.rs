use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};

use crate::{
    auth::{
        blacklist::RevocationRegistry,
        credentials::CredentialStore,
        jwt::{decode_token, parse_algorithm, Keys, TokenKind},
        tokens::{issue_token_pair, IssuedTokens, TOKEN_TYPE},
    },
    config::Config,
    errors::AppError,
    models::jwt::Claims,
    password::SecretHasher,
};

/// A verified bearer token as taken from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct BearerToken {
    pub token: String,
    pub claims: Claims,
}

/// Issues and verifies access/refresh tokens. Holds no mutable state of its
/// own; users and revocations live in the two shared stores.
pub struct TokenService {
    access: Keys,
    refresh: Keys,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    revocation_retention: Duration,
    credentials: Arc<CredentialStore>,
    revocations: Arc<RevocationRegistry>,
}

impl TokenService {
    pub fn from_config(cfg: &Config) -> Result<Self, AppError> {
        let hasher = SecretHasher::new(cfg.password_hash_memory_kib, cfg.password_hash_iterations)?;
        Self::with_stores(
            cfg,
            Arc::new(CredentialStore::new(hasher)),
            Arc::new(RevocationRegistry::new()),
        )
    }

    pub fn with_stores(
        cfg: &Config,
        credentials: Arc<CredentialStore>,
        revocations: Arc<RevocationRegistry>,
    ) -> Result<Self, AppError> {
        cfg.validate()?;
        let algorithm = parse_algorithm(&cfg.jwt_algorithm)?;
        Ok(Self {
            access: Keys::from_secret(cfg.jwt_access_secret.as_bytes(), algorithm),
            refresh: Keys::from_secret(cfg.jwt_refresh_secret.as_bytes(), algorithm),
            access_ttl_seconds: cfg.jwt_access_ttl_seconds,
            refresh_ttl_seconds: cfg.jwt_refresh_ttl_seconds,
            revocation_retention: Duration::seconds(cfg.revocation_retention_seconds),
            credentials,
            revocations,
        })
    }

    pub fn revocations(&self) -> &Arc<RevocationRegistry> {
        &self.revocations
    }

    pub fn register(&self, username: &str, secret: &str) -> Result<(), AppError> {
        if username.trim().is_empty() || secret.is_empty() {
            return Err(AppError::Validation("username/password required".into()));
        }

        self.credentials.add_user(username, secret)?;
        tracing::info!(user = username, "user registered");
        Ok(())
    }

    /// Unknown user and wrong secret are the same error.
    pub fn login(&self, username: &str, secret: &str) -> Result<IssuedTokens, AppError> {
        if !self.credentials.validate_user(username, secret) {
            tracing::info!(user = username, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        self.issue(username)
    }

    /// Mints a fresh pair for the refresh token's subject. The presented refresh
    /// token stays valid until its own expiry.
    pub fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, AppError> {
        let claims = decode_token(refresh_token, &self.refresh, TokenKind::Refresh)?;
        self.issue(&claims.sub)
    }

    /// Revokes a live access token until `now + retention`.
    pub fn logout(&self, access_token: &str) -> Result<(), AppError> {
        let claims = decode_token(access_token, &self.access, TokenKind::Access)?;
        self.revocations
            .add(access_token, Utc::now() + self.revocation_retention);
        tracing::info!(user = %claims.sub, "access token revoked");
        Ok(())
    }

    pub fn validate_request(&self, headers: &HeaderMap) -> Result<BearerToken, AppError> {
        let value = headers.get(AUTHORIZATION).ok_or(AppError::MissingHeader)?;
        let value = value.to_str().map_err(|_| AppError::MalformedHeader)?;
        if value.is_empty() {
            return Err(AppError::MissingHeader);
        }

        let token = parse_bearer(value)?;
        let claims = decode_token(token, &self.access, TokenKind::Access)?;
        Ok(BearerToken {
            token: token.to_string(),
            claims,
        })
    }

    pub fn is_blacklisted(&self, token: &str) -> bool {
        self.revocations.is_blacklisted(token)
    }

    fn issue(&self, subject: &str) -> Result<IssuedTokens, AppError> {
        issue_token_pair(
            subject,
            (&self.access, self.access_ttl_seconds),
            (&self.refresh, self.refresh_ttl_seconds),
        )
    }
}

/// Exactly `Bearer <token>`: two parts split on a single space.
fn parse_bearer(value: &str) -> Result<&str, AppError> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(TOKEN_TYPE), Some(token), None) => Ok(token),
        _ => Err(AppError::MalformedHeader),
    }
}
