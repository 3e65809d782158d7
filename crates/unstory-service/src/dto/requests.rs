//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Upper bound on tags attached to one post
pub const MAX_TAGS_PER_POST: usize = 10;

fn validate_tag_names(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS_PER_POST {
        let mut err = ValidationError::new("too_many_tags");
        err.message = Some("A post can carry at most 10 tags".into());
        return Err(err);
    }
    for tag in tags {
        let len = tag.trim().chars().count();
        if !(1..=50).contains(&len) {
            let mut err = ValidationError::new("tag_length");
            err.message = Some("Tags must be 1-50 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

// ============================================================================
// Post Requests
// ============================================================================

/// Create post request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,

    /// Rich-text document, stored as-is
    #[serde(default)]
    pub content: serde_json::Value,

    #[validate(url(message = "Cover image must be a URL"))]
    pub cover_image: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_tag_names"))]
    pub tags: Vec<String>,

    #[serde(default)]
    pub published: bool,
}

/// Update post request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Excerpt must be at most 500 characters"))]
    pub excerpt: Option<String>,

    pub content: Option<serde_json::Value>,

    #[validate(url(message = "Cover image must be a URL"))]
    pub cover_image: Option<String>,

    /// New slug; only honoured while the post is a draft
    #[validate(length(min = 1, max = 200, message = "Slug must be 1-200 characters"))]
    pub slug: Option<String>,

    /// Replaces the whole tag set when present
    #[validate(custom(function = "validate_tag_names"))]
    pub tags: Option<Vec<String>>,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update current user request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    #[validate(url(message = "Website must be a URL"))]
    pub website: Option<String>,

    #[validate(length(max = 50, message = "Twitter handle must be at most 50 characters"))]
    pub twitter: Option<String>,

    #[validate(length(max = 50, message = "GitHub handle must be at most 50 characters"))]
    pub github: Option<String>,

    pub show_followers_count: Option<bool>,
}
