//! Engagement service
//!
//! Like toggles, like status and deduplicated view counting. The fact row
//! and the post counter it feeds always change together inside the store.

use tracing::{info, instrument};

use unstory_core::entities::{Like, Post, PostView};
use unstory_core::{DomainError, Snowflake};

use crate::dto::{LikeStatusResponse, LikeToggleResponse, ViewResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::identity::RequestIdentity;
use super::user::UserService;

/// Engagement service
pub struct EngagementService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EngagementService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Flip the caller's like on a post. Anonymous callers are refused.
    #[instrument(skip(self, identity), fields(user_id = ?identity.user_id()))]
    pub async fn toggle_like(
        &self,
        slug: &str,
        identity: &RequestIdentity,
    ) -> ServiceResult<LikeToggleResponse> {
        let profile = identity.require_profile()?;
        let post = self.visible_post(slug, Some(profile.id)).await?;
        let user = UserService::new(self.ctx).ensure_user(profile).await?;

        let like = Like::new(self.ctx.generate_id(), post.id, user.id);
        let outcome = self.ctx.like_repo().toggle(&like).await?;

        info!(
            post_id = %post.id,
            user_id = %user.id,
            liked = outcome.liked,
            likes_count = outcome.likes_count,
            "Like toggled"
        );

        Ok(LikeToggleResponse {
            liked: outcome.liked,
            likes_count: outcome.likes_count,
        })
    }

    /// Current like count and whether the caller likes the post
    #[instrument(skip(self, identity))]
    pub async fn get_like_status(
        &self,
        slug: &str,
        identity: &RequestIdentity,
    ) -> ServiceResult<LikeStatusResponse> {
        let viewer = identity.user_id();
        let post = self.visible_post(slug, viewer).await?;

        let is_liked = match viewer {
            Some(user_id) => self.ctx.like_repo().exists(post.id, user_id).await?,
            None => false,
        };

        Ok(LikeStatusResponse {
            likes_count: post.likes_count,
            is_liked,
        })
    }

    /// Count a view once per identity; repeats report `viewed: false`
    #[instrument(skip(self, identity), fields(authenticated = identity.is_authenticated()))]
    pub async fn record_view(
        &self,
        slug: &str,
        identity: &RequestIdentity,
    ) -> ServiceResult<ViewResponse> {
        let post = self.visible_post(slug, identity.user_id()).await?;

        // Authenticated views reference the local user row
        if let Ok(profile) = identity.require_profile() {
            UserService::new(self.ctx).ensure_user(profile).await?;
        }

        let view = PostView::new(self.ctx.generate_id(), post.id, identity.view_key());
        let outcome = self.ctx.post_view_repo().record(&view).await?;

        if outcome.recorded {
            info!(post_id = %post.id, views = outcome.views, "View recorded");
        }

        Ok(ViewResponse::new(outcome.recorded))
    }

    async fn visible_post(&self, slug: &str, viewer: Option<Snowflake>) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_slug(slug)
            .await?
            .filter(|post| post.is_visible_to(viewer))
            .ok_or_else(|| DomainError::PostNotFound(slug.to_string()).into())
    }
}
