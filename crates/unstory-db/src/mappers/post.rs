//! Post entity <-> model mapper

use unstory_core::entities::Post;
use unstory_core::value_objects::Snowflake;

use crate::models::PostModel;

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: Snowflake::new(model.id),
            slug: model.slug,
            title: model.title,
            excerpt: model.excerpt,
            content: model.content,
            cover_image: model.cover_image,
            published: model.published,
            featured: model.featured,
            staff_pick: model.staff_pick,
            author_id: Snowflake::new(model.author_id),
            views: model.views,
            likes_count: model.likes_count,
            comments_count: model.comments_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Author-editable columns of a post
pub struct PostInsert<'a> {
    pub id: i64,
    pub slug: &'a str,
    pub title: &'a str,
    pub excerpt: Option<&'a str>,
    pub content: &'a serde_json::Value,
    pub cover_image: Option<&'a str>,
    pub published: bool,
    pub author_id: i64,
}

impl<'a> PostInsert<'a> {
    pub fn new(post: &'a Post) -> Self {
        Self {
            id: post.id.into_inner(),
            slug: &post.slug,
            title: &post.title,
            excerpt: post.excerpt.as_deref(),
            content: &post.content,
            cover_image: post.cover_image.as_deref(),
            published: post.published,
            author_id: post.author_id.into_inner(),
        }
    }
}
