//! Identity-provider session tokens
//!
//! The identity provider signs HS256 JWTs carrying the stable user id and the
//! profile fields mirrored into the local `users` table. This module only
//! verifies them; `issue_session` exists so tests and local tooling can mint
//! tokens with the same secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use unstory_core::{Snowflake, UserProfile};

use crate::error::AppError;

/// Claims of an identity-provider session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (decimal user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl IdentityClaims {
    /// Get the user ID as a Snowflake
    ///
    /// # Errors
    /// Returns an error if the subject is not a positive decimal id
    pub fn user_id(&self) -> Result<Snowflake, AppError> {
        Snowflake::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }

    /// Profile fields to mirror locally
    ///
    /// # Errors
    /// Returns an error if the subject is not a valid id
    pub fn profile(&self) -> Result<UserProfile, AppError> {
        Ok(UserProfile {
            id: self.user_id()?,
            email: self.email.clone(),
            username: non_blank(self.username.as_deref()),
            name: non_blank(self.name.as_deref()),
            avatar: non_blank(self.avatar.as_deref()),
        })
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Verifies identity-provider session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: Option<String>,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, issuer: Option<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Decode and validate a session token
    ///
    /// # Errors
    /// Returns an error if the signature, issuer, expiry or subject is invalid
    pub fn verify_session(&self, token: &str) -> Result<IdentityClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let data = decode::<IdentityClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            },
        )?;

        // Reject tokens whose subject cannot be a local user id
        data.claims.user_id()?;
        Ok(data.claims)
    }

    /// Sign a session token for `profile` valid for `ttl_seconds`
    ///
    /// # Errors
    /// Returns an error if token encoding fails
    pub fn issue_session(&self, profile: &UserProfile, ttl_seconds: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: profile.id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iss: self.issuer.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            username: profile.username.clone(),
            avatar: profile.avatar.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode JWT: {e}")))
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
