//! Post service
//!
//! Authoring: create, edit, publish, delete and read single posts.

use chrono::Utc;
use tracing::{debug, info, instrument};
use validator::Validate;

use unstory_core::entities::{Post, UserProfile};
use unstory_core::{slugify, with_random_suffix, DomainError, Snowflake};

use crate::dto::{CreatePostRequest, PostDetailResponse, UpdatePostRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::feed::FeedService;
use super::tag::TagService;
use super::user::UserService;

/// Slug candidates tried before giving up on a create
const SLUG_ATTEMPTS: usize = 5;

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required_title(title: &str) -> ServiceResult<String> {
    non_blank(title.to_string()).ok_or_else(|| ServiceError::validation("Title must not be blank"))
}

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a post with a slug derived from its title
    #[instrument(skip(self, profile, request), fields(author_id = %profile.id))]
    pub async fn create_post(
        &self,
        profile: &UserProfile,
        request: CreatePostRequest,
    ) -> ServiceResult<PostDetailResponse> {
        request.validate()?;
        let title = required_title(&request.title)?;
        let author = UserService::new(self.ctx).ensure_user(profile).await?;
        let tags = TagService::new(self.ctx).resolve_tags(&request.tags).await?;
        let tag_ids: Vec<Snowflake> = tags.iter().map(|t| t.id).collect();

        let base = slugify(&title);
        let mut post = Post::draft(self.ctx.generate_id(), base.clone(), title, author.id);
        post.excerpt = request.excerpt.and_then(non_blank);
        post.content = request.content;
        post.cover_image = request.cover_image.and_then(non_blank);
        post.published = request.published;
        if post.slug.is_empty() {
            post.slug = with_random_suffix(&base);
        }

        for attempt in 1..=SLUG_ATTEMPTS {
            if self.ctx.post_repo().find_by_slug(&post.slug).await?.is_some() {
                post.slug = with_random_suffix(&base);
                continue;
            }
            match self.ctx.post_repo().create(&post, &tag_ids).await {
                Ok(()) => {
                    info!(
                        post_id = %post.id,
                        slug = %post.slug,
                        published = post.published,
                        "Post created"
                    );
                    return FeedService::new(self.ctx).detail(&post).await;
                }
                Err(DomainError::SlugTaken(slug)) if attempt < SLUG_ATTEMPTS => {
                    debug!(slug = %slug, "Slug claimed concurrently, retrying");
                    post.slug = with_random_suffix(&base);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(DomainError::SlugTaken(base).into())
    }

    /// Edit a post. The slug may change only while the post is a draft.
    #[instrument(skip(self, profile, request), fields(author_id = %profile.id))]
    pub async fn update_post(
        &self,
        slug: &str,
        profile: &UserProfile,
        request: UpdatePostRequest,
    ) -> ServiceResult<PostDetailResponse> {
        request.validate()?;
        let mut post = self.owned_post(slug, profile).await?;

        if let Some(title) = request.title {
            post.title = required_title(&title)?;
        }
        if let Some(requested) = request.slug {
            let new_slug = slugify(&requested);
            if new_slug.is_empty() {
                return Err(ServiceError::validation("Slug must contain letters or digits"));
            }
            if new_slug != post.slug {
                if !post.slug_is_mutable() {
                    return Err(DomainError::SlugImmutable.into());
                }
                post.slug = new_slug;
            }
        }
        if let Some(excerpt) = request.excerpt {
            post.excerpt = non_blank(excerpt);
        }
        if let Some(content) = request.content {
            post.content = content;
        }
        if let Some(cover_image) = request.cover_image {
            post.cover_image = non_blank(cover_image);
        }

        let tag_ids = match request.tags {
            Some(names) => {
                let tags = TagService::new(self.ctx).resolve_tags(&names).await?;
                Some(tags.iter().map(|t| t.id).collect::<Vec<_>>())
            }
            None => None,
        };

        post.updated_at = Utc::now();
        self.ctx.post_repo().update(&post, tag_ids.as_deref()).await?;

        info!(post_id = %post.id, slug = %post.slug, "Post updated");

        FeedService::new(self.ctx).detail(&post).await
    }

    /// Publish a draft. Publishing is one-way; re-publishing is a no-op.
    #[instrument(skip(self, profile), fields(author_id = %profile.id))]
    pub async fn publish_post(
        &self,
        slug: &str,
        profile: &UserProfile,
    ) -> ServiceResult<PostDetailResponse> {
        let mut post = self.owned_post(slug, profile).await?;

        if self.ctx.post_repo().publish(post.id).await? {
            info!(post_id = %post.id, slug = %post.slug, "Post published");
        }
        post.published = true;

        FeedService::new(self.ctx).detail(&post).await
    }

    /// Delete a post along with its likes, views and tag links
    #[instrument(skip(self, profile), fields(author_id = %profile.id))]
    pub async fn delete_post(&self, slug: &str, profile: &UserProfile) -> ServiceResult<()> {
        let post = self.owned_post(slug, profile).await?;

        if !self.ctx.post_repo().delete(post.id).await? {
            return Err(DomainError::PostNotFound(slug.to_string()).into());
        }

        info!(post_id = %post.id, slug = %post.slug, "Post deleted");
        Ok(())
    }

    /// Read one post; drafts are visible only to their author
    #[instrument(skip(self))]
    pub async fn get_post(
        &self,
        slug: &str,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<PostDetailResponse> {
        let post = self
            .ctx
            .post_repo()
            .find_by_slug(slug)
            .await?
            .filter(|post| post.is_visible_to(viewer))
            .ok_or_else(|| DomainError::PostNotFound(slug.to_string()))?;

        FeedService::new(self.ctx).detail(&post).await
    }

    /// Load a post the caller is allowed to modify
    async fn owned_post(&self, slug: &str, profile: &UserProfile) -> ServiceResult<Post> {
        let user = UserService::new(self.ctx).ensure_user(profile).await?;
        let post = self
            .ctx
            .post_repo()
            .find_by_slug(slug)
            .await?
            .filter(|post| post.is_visible_to(Some(user.id)))
            .ok_or_else(|| DomainError::PostNotFound(slug.to_string()))?;

        if !post.is_authored_by(user.id) {
            return Err(DomainError::NotPostAuthor.into());
        }
        Ok(post)
    }
}
