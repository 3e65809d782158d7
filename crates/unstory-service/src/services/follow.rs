//! Follow service
//!
//! Follow toggles, per-viewer follow status and follower counts. Counts are
//! computed live; there are no denormalized follower counters.

use tracing::{info, instrument};

use unstory_core::entities::Follow;
use unstory_core::{DomainError, Snowflake};

use crate::dto::{FollowStatusResponse, FollowToggleResponse, FollowerStatsResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::identity::RequestIdentity;
use super::user::UserService;

/// Follow service
pub struct FollowService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FollowService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Follow or unfollow `target_id`
    #[instrument(skip(self, identity), fields(follower_id = ?identity.user_id()))]
    pub async fn toggle_follow(
        &self,
        target_id: Snowflake,
        identity: &RequestIdentity,
    ) -> ServiceResult<FollowToggleResponse> {
        let profile = identity.require_profile()?;
        if profile.id == target_id {
            return Err(DomainError::CannotFollowSelf.into());
        }

        let follower = UserService::new(self.ctx).ensure_user(profile).await?;
        if self.ctx.user_repo().find_by_id(target_id).await?.is_none() {
            return Err(DomainError::UserNotFound(target_id.to_string()).into());
        }

        let follow = Follow::new(self.ctx.generate_id(), follower.id, target_id);
        let is_following = self.ctx.follow_repo().toggle(&follow).await?;

        info!(
            follower_id = %follower.id,
            following_id = %target_id,
            is_following,
            "Follow toggled"
        );

        Ok(FollowToggleResponse { is_following })
    }

    /// Whether the caller follows `target_id`; a user never follows themself
    #[instrument(skip(self, identity))]
    pub async fn get_follow_status(
        &self,
        target_id: Snowflake,
        identity: &RequestIdentity,
    ) -> ServiceResult<FollowStatusResponse> {
        let Some(viewer_id) = identity.user_id() else {
            return Ok(FollowStatusResponse::default());
        };
        if viewer_id == target_id {
            return Ok(FollowStatusResponse {
                is_following: false,
                is_self: true,
            });
        }

        let is_following = self.ctx.follow_repo().exists(viewer_id, target_id).await?;
        Ok(FollowStatusResponse {
            is_following,
            is_self: false,
        })
    }

    /// Follower and following counts, unless the user keeps them private.
    ///
    /// Private and unknown users both report hidden zeros without counting.
    #[instrument(skip(self))]
    pub async fn get_follower_stats(&self, user_id: Snowflake) -> ServiceResult<FollowerStatsResponse> {
        let visible = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .is_some_and(|user| user.show_followers_count);
        if !visible {
            return Ok(FollowerStatsResponse::hidden());
        }

        let follows = self.ctx.follow_repo();
        Ok(FollowerStatsResponse {
            followers: follows.count_followers(user_id).await?,
            following: follows.count_following(user_id).await?,
            hidden: false,
        })
    }
}
