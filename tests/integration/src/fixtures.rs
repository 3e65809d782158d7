//! Test fixtures and wire types
//!
//! Request bodies the tests send and the response shapes they decode.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unstory_core::{Snowflake, SnowflakeGenerator};

/// Worker id reserved for test data, distinct from any server process
const TEST_WORKER_ID: u16 = 1023;

static ID_GENERATOR: LazyLock<SnowflakeGenerator> =
    LazyLock::new(|| SnowflakeGenerator::new(TEST_WORKER_ID));

/// Id unique across test runs sharing one database
pub fn unique_id() -> Snowflake {
    ID_GENERATOR.generate()
}

/// Short suffix for names that must not collide between runs
pub fn unique_suffix() -> String {
    format!("{:x}", unique_id().into_inner())
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: serde_json::Value,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
}

impl CreatePostBody {
    pub fn published(title: &str, tags: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            excerpt: Some(format!("About {title}")),
            content: serde_json::json!({"type": "doc", "content": []}),
            cover_image: None,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            published: true,
        }
    }

    pub fn draft(title: &str) -> Self {
        Self {
            published: false,
            ..Self::published(title, &[])
        }
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_followers_count: Option<bool>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBody {
    pub id: String,
    pub username: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBody {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagSummaryBody {
    pub name: String,
    pub slug: String,
    pub post_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub published: bool,
    pub views: i64,
    pub likes_count: i64,
    pub created_at: DateTime<Utc>,
    pub author: Option<AuthorBody>,
    pub tags: Vec<TagBody>,
    /// Present on detail responses only
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageBody {
    pub posts: Vec<PostBody>,
    pub total_count: i64,
    pub page: u32,
    pub total_pages: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPageBody {
    pub tag: TagBody,
    pub sort: String,
    pub posts: Vec<PostBody>,
    pub total_count: i64,
    pub total_pages: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleBody {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatusBody {
    pub likes_count: i64,
    pub is_liked: bool,
}

#[derive(Debug, Deserialize)]
pub struct ViewBody {
    pub success: bool,
    pub viewed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowToggleBody {
    pub is_following: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatusBody {
    pub is_following: bool,
    pub is_self: bool,
}

#[derive(Debug, Deserialize)]
pub struct FollowerStatsBody {
    pub followers: i64,
    pub following: i64,
    pub hidden: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserBody {
    pub id: String,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub show_followers_count: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    pub id: String,
    pub username: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
