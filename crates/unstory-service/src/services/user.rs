//! User service
//!
//! Mirrors identity-provider profiles into local users and serves author pages.

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use unstory_core::entities::{User, UserProfile};
use unstory_core::DomainError;

use crate::dto::{CurrentUserResponse, PostPageResponse, ProfileResponse, UpdateProfileRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::feed::FeedService;

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get-or-create the local mirror of `profile`, refusing banned users.
    ///
    /// Every authenticated write goes through here first.
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    pub async fn ensure_user(&self, profile: &UserProfile) -> ServiceResult<User> {
        let user = self.ctx.user_repo().upsert_from_profile(profile).await?;
        if user.is_banned {
            return Err(DomainError::UserBanned(user.id).into());
        }
        Ok(user)
    }

    /// Current user's full record
    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    pub async fn get_me(&self, profile: &UserProfile) -> ServiceResult<CurrentUserResponse> {
        let user = self.ensure_user(profile).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    /// Update bio, links, display name and the follower-count privacy switch
    #[instrument(skip(self, profile, request), fields(user_id = %profile.id))]
    pub async fn update_me(
        &self,
        profile: &UserProfile,
        request: UpdateProfileRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        request.validate()?;
        let mut user = self.ensure_user(profile).await?;

        if let Some(name) = request.name {
            user.name = non_blank(name);
        }
        if let Some(bio) = request.bio {
            user.bio = non_blank(bio);
        }
        if let Some(website) = request.website {
            user.website = non_blank(website);
        }
        if let Some(twitter) = request.twitter {
            user.twitter = non_blank(twitter);
        }
        if let Some(github) = request.github {
            user.github = non_blank(github);
        }
        if let Some(show) = request.show_followers_count {
            user.show_followers_count = show;
        }
        user.updated_at = Utc::now();

        self.ctx.user_repo().update_profile(&user).await?;

        info!(
            user_id = %user.id,
            show_followers_count = user.show_followers_count,
            "Profile updated"
        );

        Ok(CurrentUserResponse::from(&user))
    }

    /// Public author page by username (case-insensitive)
    #[instrument(skip(self))]
    pub async fn get_profile(&self, username: &str) -> ServiceResult<ProfileResponse> {
        let user = self.find_by_username(username).await?;
        Ok(ProfileResponse::from(&user))
    }

    /// One page of an author's published posts, newest first
    #[instrument(skip(self))]
    pub async fn list_author_posts(&self, username: &str, page: u32) -> ServiceResult<PostPageResponse> {
        let user = self.find_by_username(username).await?;
        FeedService::new(self.ctx).author_posts(user.id, page).await
    }

    async fn find_by_username(&self, username: &str) -> ServiceResult<User> {
        Ok(self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(username.to_string()))?)
    }
}
