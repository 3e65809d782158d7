//! PostView entity - first view of a post by one identity

use chrono::{DateTime, Utc};

use crate::value_objects::{Fingerprint, Snowflake, ViewerKey};

/// Deduplication record; exactly one of `user_id` / `fingerprint` is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub user_id: Option<Snowflake>,
    pub fingerprint: Option<Fingerprint>,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(id: Snowflake, post_id: Snowflake, viewer: ViewerKey<'_>) -> Self {
        let (user_id, fingerprint) = match viewer {
            ViewerKey::User(user_id) => (Some(user_id), None),
            ViewerKey::Fingerprint(fp) => (None, Some(fp.clone())),
        };
        Self {
            id,
            post_id,
            user_id,
            fingerprint,
            created_at: Utc::now(),
        }
    }

    /// Whether this record deduplicates the given viewer
    pub fn is_for(&self, viewer: ViewerKey<'_>) -> bool {
        match viewer {
            ViewerKey::User(id) => self.user_id == Some(id),
            ViewerKey::Fingerprint(fp) => self.fingerprint.as_ref() == Some(fp),
        }
    }
}
