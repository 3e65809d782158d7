//! Follow entity - directed edge from follower to followee

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    pub id: Snowflake,
    pub follower_id: Snowflake,
    pub following_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(id: Snowflake, follower_id: Snowflake, following_id: Snowflake) -> Self {
        Self {
            id,
            follower_id,
            following_id,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_self_follow(&self) -> bool {
        self.follower_id == self.following_id
    }
}
