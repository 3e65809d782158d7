//! Tag database models

use sqlx::FromRow;

/// Database model for tags table
#[derive(Debug, Clone, FromRow)]
pub struct TagModel {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A tag joined through `posts_to_tags`
#[derive(Debug, Clone, FromRow)]
pub struct PostTagModel {
    pub post_id: i64,
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// A tag with its published-post count
#[derive(Debug, Clone, FromRow)]
pub struct TagCountModel {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub post_count: i64,
}
