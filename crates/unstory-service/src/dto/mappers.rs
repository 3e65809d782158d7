//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use unstory_core::entities::{Post, Tag, TagWithCount, User};

use super::responses::{
    AuthorResponse, CurrentUserResponse, PostDetailResponse, PostSummaryResponse,
    ProfileResponse, TagResponse, TagSummaryResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for AuthorResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            name: user.display_name().to_string(),
            avatar: user.avatar.clone(),
        }
    }
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            name: user.display_name().to_string(),
            avatar: user.avatar.clone(),
            bio: user.bio.clone(),
            website: user.website.clone(),
            twitter: user.twitter.clone(),
            github: user.github.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            bio: user.bio.clone(),
            website: user.website.clone(),
            twitter: user.twitter.clone(),
            github: user.github.clone(),
            show_followers_count: user.show_followers_count,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Tag Mappers
// ============================================================================

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.to_string(),
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        }
    }
}

impl From<&TagWithCount> for TagSummaryResponse {
    fn from(entry: &TagWithCount) -> Self {
        Self {
            tag: TagResponse::from(&entry.tag),
            post_count: entry.post_count,
        }
    }
}

// ============================================================================
// Post Mappers
// ============================================================================

impl PostSummaryResponse {
    /// Assemble a listing entry from a post and its already-loaded relations
    pub fn from_parts(post: &Post, author: Option<&User>, tags: &[Tag]) -> Self {
        Self {
            id: post.id.to_string(),
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            cover_image: post.cover_image.clone(),
            published: post.published,
            featured: post.featured,
            staff_pick: post.staff_pick,
            views: post.views,
            likes_count: post.likes_count,
            comments_count: post.comments_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
            author: author.map(AuthorResponse::from),
            tags: tags.iter().map(TagResponse::from).collect(),
        }
    }
}

impl PostDetailResponse {
    pub fn from_parts(post: &Post, author: Option<&User>, tags: &[Tag]) -> Self {
        Self {
            post: PostSummaryResponse::from_parts(post, author, tags),
            content: post.content.clone(),
        }
    }
}
