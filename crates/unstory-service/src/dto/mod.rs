//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CreatePostRequest, UpdatePostRequest, UpdateProfileRequest, MAX_TAGS_PER_POST};

pub use responses::{
    AuthorResponse, CurrentUserResponse, FollowStatusResponse, FollowToggleResponse,
    FollowerStatsResponse, HealthChecks, HealthResponse, LikeStatusResponse, LikeToggleResponse,
    PostDetailResponse, PostPageResponse, PostSummaryResponse, ProfileResponse,
    ReadinessResponse, ReconcileResponse, TagPageResponse, TagResponse, TagSummaryResponse,
    ViewResponse,
};
