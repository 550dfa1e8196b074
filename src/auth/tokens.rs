use serde::Serialize;

use crate::{
    auth::jwt::{make_token, new_claims, Keys, TokenKind},
    errors::AppError,
};

pub const TOKEN_TYPE: &str = "Bearer";

/// Wire shape shared by login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Remaining lifetime of the access token, in seconds.
    pub expires_in: i64,
}

/// Both halves are signed with their own key and timed independently.
pub fn issue_token_pair(
    subject: &str,
    access: (&Keys, i64),
    refresh: (&Keys, i64),
) -> Result<IssuedTokens, AppError> {
    let (access_keys, access_ttl) = access;
    let (refresh_keys, refresh_ttl) = refresh;

    let access_claims = new_claims(subject, TokenKind::Access, access_ttl);
    let refresh_claims = new_claims(subject, TokenKind::Refresh, refresh_ttl);

    let access_token = make_token(&access_claims, access_keys)?;
    let refresh_token = make_token(&refresh_claims, refresh_keys)?;

    Ok(IssuedTokens {
        access_token,
        refresh_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: access_ttl,
    })
}
