//! PostgreSQL implementation of PostViewRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use unstory_core::entities::PostView;
use unstory_core::traits::{PostViewRepository, RepoResult, ViewRecord};
use unstory_core::value_objects::Snowflake;

use super::error::{map_db_error, map_missing_reference, post_not_found};

/// PostgreSQL implementation of PostViewRepository
#[derive(Clone)]
pub struct PgPostViewRepository {
    pool: PgPool,
}

impl PgPostViewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostViewRepository for PgPostViewRepository {
    #[instrument(skip(self, view), fields(post_id = %view.post_id))]
    async fn record(&self, view: &PostView) -> RepoResult<ViewRecord> {
        let post_id = view.post_id.into_inner();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Partial unique indexes turn a repeat view into a no-op insert
        let inserted = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO post_views (id, post_id, user_id, fingerprint, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            RETURNING id
            "#,
        )
        .bind(view.id.into_inner())
        .bind(post_id)
        .bind(view.user_id.map(Snowflake::into_inner))
        .bind(view.fingerprint.as_ref().map(|fp| fp.as_str()))
        .bind(view.created_at)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_missing_reference(e, || post_not_found(view.post_id)))?;

        let recorded = inserted.is_some();
        let views = if recorded {
            sqlx::query_scalar::<_, i64>(
                "UPDATE posts SET views = views + 1 WHERE id = $1 RETURNING views",
            )
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await
        } else {
            sqlx::query_scalar::<_, i64>("SELECT views FROM posts WHERE id = $1")
                .bind(post_id)
                .fetch_optional(&mut *tx)
                .await
        }
        .map_err(map_db_error)?
        .ok_or_else(|| post_not_found(view.post_id))?;

        tx.commit().await.map_err(map_db_error)?;

        debug!(recorded, views, "View recorded");
        Ok(ViewRecord { recorded, views })
    }
}
