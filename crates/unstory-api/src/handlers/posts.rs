//! Post handlers
//!
//! Authoring endpoints plus the public search and featured listings.

use axum::{
    extract::{Path, State},
    Json,
};
use unstory_service::dto::{
    CreatePostRequest, PostDetailResponse, PostPageResponse, PostSummaryResponse,
    UpdatePostRequest,
};
use unstory_service::{FeedService, PostService};

use crate::extractors::{AuthUser, Listing, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Search or browse published posts
///
/// GET /posts?q=&page=&limit=&sort=
pub async fn search_posts(
    State(state): State<AppState>,
    listing: Listing,
) -> ApiResult<Json<PostPageResponse>> {
    let service = FeedService::new(state.service_context());
    let response = service
        .search(&listing.query, listing.page, listing.limit, listing.search_sort())
        .await?;
    Ok(Json(response))
}

/// GET /posts/featured
pub async fn featured_posts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PostSummaryResponse>>> {
    let service = FeedService::new(state.service_context());
    Ok(Json(service.featured().await?))
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePostRequest>,
) -> ApiResult<Created<PostDetailResponse>> {
    let service = PostService::new(state.service_context());
    let response = service.create_post(&auth.profile, request).await?;
    Ok(Created(response))
}

/// Read a post; drafts only for their author
///
/// GET /posts/{slug}
pub async fn get_post(
    State(state): State<AppState>,
    OptionalAuthUser(auth): OptionalAuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<PostDetailResponse>> {
    let viewer = auth.map(|auth| auth.profile.id);
    let service = PostService::new(state.service_context());
    Ok(Json(service.get_post(&slug, viewer).await?))
}

/// PATCH /posts/{slug}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<PostDetailResponse>> {
    let service = PostService::new(state.service_context());
    let response = service.update_post(&slug, &auth.profile, request).await?;
    Ok(Json(response))
}

/// POST /posts/{slug}/publish
pub async fn publish_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<PostDetailResponse>> {
    let service = PostService::new(state.service_context());
    Ok(Json(service.publish_post(&slug, &auth.profile).await?))
}

/// DELETE /posts/{slug}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<NoContent> {
    let service = PostService::new(state.service_context());
    service.delete_post(&slug, &auth.profile).await?;
    Ok(NoContent)
}
