//! Resolved identity extractor
//!
//! Combines the session token with the `fingerprint` cookie so every request
//! acts as someone. When neither is usable a fingerprint is minted; the
//! handler decides whether to hand it back with [`fingerprint_cookie`].

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use unstory_core::Fingerprint;
use unstory_service::{IdentityResolver, RequestIdentity};

use super::auth::bearer_token;
use crate::response::ApiError;
use crate::state::AppState;

/// Name of the anonymous-visitor cookie
pub const FINGERPRINT_COOKIE: &str = "fingerprint";

/// Lifetime of the fingerprint cookie in seconds (one year)
pub const FINGERPRINT_MAX_AGE_SECS: i64 = 365 * 24 * 60 * 60;

/// `Set-Cookie` value persisting a minted fingerprint
pub fn fingerprint_cookie(fingerprint: &Fingerprint, secure: bool) -> String {
    let mut cookie = format!(
        "{FINGERPRINT_COOKIE}={fingerprint}; Max-Age={FINGERPRINT_MAX_AGE_SECS}; Path=/; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// The identity the request acts as
#[derive(Debug, Clone)]
pub struct ResolvedIdentity(pub RequestIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for ResolvedIdentity
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await;
        let jar = CookieJar::from_headers(&parts.headers);
        let fingerprint = jar.get(FINGERPRINT_COOKIE).map(|c| c.value().to_string());

        let app_state = AppState::from_ref(state);
        let identity = IdentityResolver::new(app_state.service_context())
            .resolve(token.as_deref(), fingerprint.as_deref());

        Ok(Self(identity))
    }
}
