//! PostgreSQL implementation of LikeRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use unstory_core::entities::Like;
use unstory_core::traits::{LikeRepository, LikeToggle, RepoResult};
use unstory_core::value_objects::Snowflake;

use super::error::{
    map_db_error, map_missing_reference, post_not_found, user_not_found, violated_constraint,
};

/// PostgreSQL implementation of LikeRepository
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    #[instrument(skip(self, like), fields(post_id = %like.post_id, user_id = %like.user_id))]
    async fn toggle(&self, like: &Like) -> RepoResult<LikeToggle> {
        let post_id = like.post_id.into_inner();
        let user_id = like.user_id.into_inner();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query_scalar::<_, i64>(
            "DELETE FROM likes WHERE post_id = $1 AND user_id = $2 RETURNING id",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let (liked, delta) = if removed.is_some() {
            (false, -1_i64)
        } else {
            // A concurrent toggle may have inserted first; then we are already liked
            let inserted = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO likes (id, post_id, user_id, created_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (post_id, user_id) DO NOTHING
                RETURNING id
                "#,
            )
            .bind(like.id.into_inner())
            .bind(post_id)
            .bind(user_id)
            .bind(like.created_at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                if violated_constraint(&e).is_some_and(|c| c.contains("user_id")) {
                    map_missing_reference(e, || user_not_found(like.user_id))
                } else {
                    map_missing_reference(e, || post_not_found(like.post_id))
                }
            })?;

            (true, i64::from(inserted.is_some()))
        };

        let likes_count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts SET likes_count = likes_count + $2
            WHERE id = $1
            RETURNING likes_count
            "#,
        )
        .bind(post_id)
        .bind(delta)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| post_not_found(like.post_id))?;

        tx.commit().await.map_err(map_db_error)?;

        info!(liked, likes_count, "Like toggled");
        Ok(LikeToggle { liked, likes_count })
    }

    #[instrument(skip(self))]
    async fn exists(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
