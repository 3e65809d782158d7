//! Post entity - a draft or published story

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::value_objects::Snowflake;

/// A story with its denormalized engagement counters
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Snowflake,
    /// URL key, frozen once the post is published
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    /// Serialized editor document; stored and returned, never interpreted
    pub content: Value,
    pub cover_image: Option<String>,
    pub published: bool,
    pub featured: bool,
    pub staff_pick: bool,
    pub author_id: Snowflake,
    /// Distinct first views (rows in `post_views`)
    pub views: i64,
    /// Cached count of rows in `likes`
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// New unpublished post with zeroed counters and an empty document
    pub fn draft(id: Snowflake, slug: String, title: String, author_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            slug,
            title,
            excerpt: None,
            content: Value::Null,
            cover_image: None,
            published: false,
            featured: false,
            staff_pick: false,
            author_id,
            views: 0,
            likes_count: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }

    /// Drafts are only visible to their author
    pub fn is_visible_to(&self, viewer: Option<Snowflake>) -> bool {
        self.published || viewer.is_some_and(|id| self.is_authored_by(id))
    }

    /// Slugs may be rewritten only before publication
    #[inline]
    pub fn slug_is_mutable(&self) -> bool {
        !self.published
    }
}
