//! Path parameter extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::Deserialize;
use unstory_core::Snowflake;

use crate::response::ApiError;

/// `{user_id}` path segment parsed as a Snowflake
#[derive(Debug, Clone, Copy)]
pub struct UserIdPath(pub Snowflake);

#[derive(Debug, Deserialize)]
struct RawUserId {
    user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for UserIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawUserId>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        raw.user_id
            .parse::<Snowflake>()
            .map(Self)
            .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}
