use chrono::{Duration, Utc};
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::jwt::{Claims, ACCESS, REFRESH},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS,
            TokenKind::Refresh => REFRESH,
        }
    }
}

/// Signing material for one token kind. The algorithm is fixed per deployment.
#[derive(Clone)]
pub struct Keys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    algorithm: Algorithm,
}

impl Keys {
    pub fn from_secret(secret: &[u8], algorithm: Algorithm) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            algorithm,
        }
    }
}

/// Only the HMAC family is accepted: both token kinds are symmetric-key signed.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AppError> {
    match name {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AppError::Internal(format!(
            "unsupported JWT algorithm {other}; expected HS256, HS384 or HS512"
        ))),
    }
}

pub fn sha256_hex(s: &str) -> String {
    let mut h = Sha256::new();
    h.update(s.as_bytes());
    hex::encode(h.finalize())
}

pub fn new_claims(subject: &str, kind: TokenKind, ttl_seconds: i64) -> Claims {
    let now = Utc::now();
    Claims {
        sub: subject.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::seconds(ttl_seconds)).timestamp() as usize,
        typ: kind.as_str().into(),
        jti: Uuid::new_v4().to_string(),
    }
}

pub fn make_token(claims: &Claims, keys: &Keys) -> Result<String, AppError> {
    encode(&Header::new(keys.algorithm), claims, &keys.encoding).map_err(|e| {
        tracing::error!(error = %e, "failed to sign token");
        AppError::TokenGeneration
    })
}

/// Verifies algorithm, signature, expiry and kind. Every failure is `InvalidToken`.
pub fn decode_token(token: &str, keys: &Keys, expected: TokenKind) -> Result<Claims, AppError> {
    // The declared algorithm is checked before the secret is put to use.
    let header = decode_header(token).map_err(|_| AppError::InvalidToken)?;
    if header.alg != keys.algorithm {
        tracing::debug!(alg = ?header.alg, "rejected token with unexpected signing algorithm");
        return Err(AppError::InvalidToken);
    }

    let mut validation = Validation::new(keys.algorithm);
    validation.leeway = 0;

    let data =
        decode::<Claims>(token, &keys.decoding, &validation).map_err(|_| AppError::InvalidToken)?;

    if data.claims.typ != expected.as_str() {
        return Err(AppError::InvalidToken);
    }
    Ok(data.claims)
}
