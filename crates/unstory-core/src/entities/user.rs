//! User entity - local mirror of an identity-provider account

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Profile fields supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub id: Snowflake,
    pub email: String,
    pub username: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// A blog author or reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub email: String,
    /// Nullable until backfilled; unique when present
    pub username: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
    pub is_banned: bool,
    /// Privacy switch for follower/following counts, hidden by default
    pub show_followers_count: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Mirror a provider profile into a fresh local user
    pub fn from_profile(profile: &UserProfile) -> Self {
        let now = Utc::now();
        Self {
            id: profile.id,
            email: profile.email.clone(),
            username: profile.username.clone(),
            name: profile.name.clone(),
            avatar: profile.avatar.clone(),
            bio: None,
            website: None,
            twitter: None,
            github: None,
            is_banned: false,
            show_followers_count: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name to show on bylines: display name, then username, then the email local part
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.username.as_deref())
            .unwrap_or_else(|| self.email.split('@').next().unwrap_or(&self.email))
    }
}
