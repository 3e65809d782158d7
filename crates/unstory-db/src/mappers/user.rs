//! User entity <-> model mapper

use unstory_core::entities::{User, UserProfile};
use unstory_core::value_objects::Snowflake;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            email: model.email,
            username: model.username,
            name: model.name,
            avatar: model.avatar,
            bio: model.bio,
            website: model.website,
            twitter: model.twitter,
            github: model.github,
            is_banned: model.is_banned,
            show_followers_count: model.show_followers_count,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Values written when mirroring a provider profile
#[derive(Debug, Clone, Copy)]
pub struct UserInsert<'a> {
    pub id: i64,
    pub email: &'a str,
    pub username: Option<&'a str>,
    pub name: Option<&'a str>,
    pub avatar: Option<&'a str>,
}

impl<'a> UserInsert<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self {
            id: profile.id.into_inner(),
            email: &profile.email,
            username: profile.username.as_deref(),
            name: profile.name.as_deref(),
            avatar: profile.avatar.as_deref(),
        }
    }

    /// Same row with the username left for a later backfill
    pub fn without_username(self) -> Self {
        Self {
            username: None,
            ..self
        }
    }
}
