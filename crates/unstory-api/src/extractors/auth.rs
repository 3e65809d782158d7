//! Authentication extractors
//!
//! Read the identity provider's session token from the `Authorization: Bearer`
//! header. A token that fails verification is treated as absent.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use unstory_core::UserProfile;
use unstory_service::{IdentityResolver, RequestIdentity};

use crate::response::ApiError;
use crate::state::AppState;

/// Bearer token of the request, if any
pub(crate) async fn bearer_token<S>(parts: &mut Parts, state: &S) -> Option<String>
where
    S: Send + Sync,
{
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

/// Signed-in user; rejects the request with 401 otherwise
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub profile: UserProfile,
}

impl AuthUser {
    /// The request identity this user acts as
    pub fn identity(&self) -> RequestIdentity {
        RequestIdentity::authenticated(self.profile.clone())
    }
}

async fn resolve_user<S>(parts: &mut Parts, state: &S) -> Option<AuthUser>
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    let token = bearer_token(parts, state).await?;
    let app_state = AppState::from_ref(state);

    IdentityResolver::new(app_state.service_context())
        .resolve_user(Some(&token))
        .and_then(|identity| identity.require_profile().ok().cloned())
        .map(|profile| AuthUser { profile })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await
            .ok_or(ApiError::AuthenticationRequired)
    }
}

/// Signed-in user when a valid session token is present
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_user(parts, state).await))
    }
}
