//! PostgreSQL implementation of FollowRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use unstory_core::entities::Follow;
use unstory_core::error::DomainError;
use unstory_core::traits::{FollowRepository, RepoResult};
use unstory_core::value_objects::Snowflake;

use super::error::{map_db_error, user_not_found, violated_constraint};

/// PostgreSQL implementation of FollowRepository
#[derive(Clone)]
pub struct PgFollowRepository {
    pool: PgPool,
}

impl PgFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PgFollowRepository {
    #[instrument(skip(self, follow), fields(follower_id = %follow.follower_id, following_id = %follow.following_id))]
    async fn toggle(&self, follow: &Follow) -> RepoResult<bool> {
        let follower_id = follow.follower_id.into_inner();
        let following_id = follow.following_id.into_inner();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query_scalar::<_, i64>(
            "DELETE FROM follows WHERE follower_id = $1 AND following_id = $2 RETURNING id",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if removed.is_none() {
            sqlx::query(
                r#"
                INSERT INTO follows (id, follower_id, following_id, created_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (follower_id, following_id) DO NOTHING
                "#,
            )
            .bind(follow.id.into_inner())
            .bind(follower_id)
            .bind(following_id)
            .bind(follow.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                let constraint = violated_constraint(&e).map(str::to_owned);
                match constraint.as_deref() {
                    Some("follows_no_self") => DomainError::CannotFollowSelf,
                    Some(c) if c.contains("follower_id") => user_not_found(follow.follower_id),
                    Some(c) if c.contains("following_id") => user_not_found(follow.following_id),
                    _ => map_db_error(e),
                }
            })?;
        }

        tx.commit().await.map_err(map_db_error)?;

        let following = removed.is_none();
        info!(following, "Follow toggled");
        Ok(following)
    }

    #[instrument(skip(self))]
    async fn exists(&self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
        )
        .bind(follower_id.into_inner())
        .bind(following_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_followers(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = $1")
            .bind(user_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn count_following(&self, user_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id.into_inner())
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }
}
