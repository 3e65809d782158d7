//! Tag handlers
//!
//! Tag directory, ranked tag pages and category listings.

use axum::{
    extract::{Path, State},
    Json,
};
use unstory_service::dto::{PostSummaryResponse, TagPageResponse, TagSummaryResponse};
use unstory_service::{FeedService, TagService};

use crate::extractors::Listing;
use crate::response::ApiResult;
use crate::state::AppState;

/// Tags with their published-post counts
///
/// GET /tags?limit=
pub async fn list_tags(
    State(state): State<AppState>,
    listing: Listing,
) -> ApiResult<Json<Vec<TagSummaryResponse>>> {
    let service = TagService::new(state.service_context());
    let tags = service.list_tags(Some(listing.tag_limit())).await?;
    Ok(Json(tags))
}

/// Published posts under a tag, ranked
///
/// GET /tags/{tag}?sort=&page=
pub async fn get_tag_page(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    listing: Listing,
) -> ApiResult<Json<TagPageResponse>> {
    let service = FeedService::new(state.service_context());
    let response = service
        .tag_page(&tag, listing.tag_sort(), listing.page)
        .await?;
    Ok(Json(response))
}

/// GET /categories/{name}
pub async fn get_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<PostSummaryResponse>>> {
    let service = FeedService::new(state.service_context());
    Ok(Json(service.category_posts(&name).await?))
}
