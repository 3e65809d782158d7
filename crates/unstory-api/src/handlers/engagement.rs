//! Engagement handlers
//!
//! Likes and view counting on posts.

use axum::{
    extract::{Path, State},
    http::{header::SET_COOKIE, HeaderName},
    response::AppendHeaders,
    Json,
};
use unstory_service::dto::{LikeStatusResponse, LikeToggleResponse, ViewResponse};
use unstory_service::EngagementService;

use crate::extractors::{fingerprint_cookie, AuthUser, ResolvedIdentity};
use crate::response::ApiResult;
use crate::state::AppState;

/// `Set-Cookie` header present only when a fingerprint was minted
type FingerprintCookie = AppendHeaders<Option<(HeaderName, String)>>;

/// Toggle the caller's like
///
/// POST /posts/{slug}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<LikeToggleResponse>> {
    let service = EngagementService::new(state.service_context());
    let response = service.toggle_like(&slug, &auth.identity()).await?;
    Ok(Json(response))
}

/// Like count and whether the caller likes the post
///
/// GET /posts/{slug}/like
pub async fn get_like_status(
    State(state): State<AppState>,
    ResolvedIdentity(identity): ResolvedIdentity,
    Path(slug): Path<String>,
) -> ApiResult<Json<LikeStatusResponse>> {
    let service = EngagementService::new(state.service_context());
    let response = service.get_like_status(&slug, &identity).await?;
    Ok(Json(response))
}

/// Record a view; a newly minted fingerprint is handed back as a cookie
///
/// POST /posts/{slug}/view
pub async fn record_view(
    State(state): State<AppState>,
    ResolvedIdentity(identity): ResolvedIdentity,
    Path(slug): Path<String>,
) -> ApiResult<(FingerprintCookie, Json<ViewResponse>)> {
    let service = EngagementService::new(state.service_context());
    let response = service.record_view(&slug, &identity).await?;

    let cookie = identity
        .minted_fingerprint()
        .map(|fingerprint| (SET_COOKIE, fingerprint_cookie(fingerprint, state.secure_cookies())));

    Ok((AppendHeaders(cookie), Json(response)))
}
