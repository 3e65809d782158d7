//! Like entity - user U liked post P

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub id: Snowflake,
    pub post_id: Snowflake,
    pub user_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(id: Snowflake, post_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            id,
            post_id,
            user_id,
            created_at: Utc::now(),
        }
    }
}
