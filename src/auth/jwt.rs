//! Session token issuance and verification (HS256 JWT)

use crate::{config::AppConfig, error::AppError, models::auth::SessionUser};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::revocation::RevocationList;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (admin ID)
    pub sub: String,

    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub phone_number: String,

    /// Issued at
    pub iat: i64,

    /// Expiration, absent when tokens are configured not to expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// JWT ID (unique token identifier, used for revocation)
    pub jti: String,
}

impl Claims {
    /// Parse the subject as an admin id
    pub fn subject_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::Malformed)
    }
}

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token malformed")]
    Malformed,
    #[error("token revoked")]
    Revoked,
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::Unauthorized
    }
}

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// `None` means tokens carry no `exp` claim
    token_ttl_secs: Option<u64>,
    revocations: RevocationList,
}

impl JwtService {
    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < 32 {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let ttl = match config.security.token_ttl_secs {
            0 => None,
            secs => Some(secs),
        };

        Ok(Self::new(secret.as_bytes(), ttl))
    }

    pub fn new(secret: &[u8], token_ttl_secs: Option<u64>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if token_ttl_secs.is_none() {
            // 不过期的令牌没有 exp 声明
            validation.required_spec_claims.clear();
        }

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl_secs,
            revocations: RevocationList::new(),
        }
    }

    /// Issue a session token for `user`
    pub fn issue(&self, user: &SessionUser) -> Result<String, AppError> {
        let now = Utc::now();

        let claims = Claims {
            sub: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            gender: user.gender.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            iat: now.timestamp(),
            exp: self
                .token_ttl_secs
                .map(|secs| (now + Duration::seconds(secs as i64)).timestamp()),
            jti: Uuid::new_v4().to_string(),
        };

        self.encode(&claims)
    }

    /// Sign arbitrary claims
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {:?}", e);
            AppError::Internal(format!("Failed to encode session token: {}", e))
        })
    }

    /// Validate and decode token
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenError::BadSignature
                    }
                    _ => TokenError::Malformed,
                };
                tracing::debug!(?reason, "Token validation failed: {:?}", e);
                reason
            })?
            .claims;

        claims.subject_id()?;

        if self.revocations.is_revoked(&claims.jti) {
            tracing::debug!(jti = %claims.jti, "Rejected revoked token");
            return Err(TokenError::Revoked);
        }

        Ok(claims)
    }

    /// Put a token on the deny-list
    pub fn revoke(&self, claims: &Claims) {
        self.revocations.revoke(claims);
    }
}
