//! User handlers
//!
//! Current user, public profiles, follows and follower stats.

use axum::{
    extract::{Path, State},
    Json,
};
use unstory_service::dto::{
    CurrentUserResponse, FollowStatusResponse, FollowToggleResponse, FollowerStatsResponse,
    PostPageResponse, ProfileResponse, UpdateProfileRequest,
};
use unstory_service::{FollowService, UserService};

use crate::extractors::{AuthUser, Listing, ResolvedIdentity, UserIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /users/@me
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_me(&auth.profile).await?))
}

/// PATCH /users/@me
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_me(&auth.profile, request).await?;
    Ok(Json(response))
}

/// GET /users/by-username/{username}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let service = UserService::new(state.service_context());
    Ok(Json(service.get_profile(&username).await?))
}

/// An author's published posts
///
/// GET /users/by-username/{username}/posts?page=
pub async fn get_profile_posts(
    State(state): State<AppState>,
    Path(username): Path<String>,
    listing: Listing,
) -> ApiResult<Json<PostPageResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.list_author_posts(&username, listing.page).await?;
    Ok(Json(response))
}

/// POST /users/{user_id}/follow
pub async fn toggle_follow(
    State(state): State<AppState>,
    auth: AuthUser,
    UserIdPath(user_id): UserIdPath,
) -> ApiResult<Json<FollowToggleResponse>> {
    let service = FollowService::new(state.service_context());
    let response = service.toggle_follow(user_id, &auth.identity()).await?;
    Ok(Json(response))
}

/// GET /users/{user_id}/follow
pub async fn get_follow_status(
    State(state): State<AppState>,
    ResolvedIdentity(identity): ResolvedIdentity,
    UserIdPath(user_id): UserIdPath,
) -> ApiResult<Json<FollowStatusResponse>> {
    let service = FollowService::new(state.service_context());
    let response = service.get_follow_status(user_id, &identity).await?;
    Ok(Json(response))
}

/// Follower counts, hidden unless the user opted in
///
/// GET /users/{user_id}/stats
pub async fn get_follower_stats(
    State(state): State<AppState>,
    UserIdPath(user_id): UserIdPath,
) -> ApiResult<Json<FollowerStatsResponse>> {
    let service = FollowService::new(state.service_context());
    Ok(Json(service.get_follower_stats(user_id).await?))
}
