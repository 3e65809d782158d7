//! PostgreSQL implementation of PostRepository
//!
//! Listings share one parameterised WHERE clause; the ORDER BY clause is
//! assembled from the fixed `SortKey` fragments and always ends in `p.id DESC`.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};

use unstory_core::entities::Post;
use unstory_core::error::DomainError;
use unstory_core::traits::{PostFilter, PostRepository, RepoResult};
use unstory_core::value_objects::{PageRequest, Snowflake, SortKey};

use crate::mappers::PostInsert;
use crate::models::PostModel;

use super::error::{
    like_pattern, map_db_error, map_missing_reference, map_unique_violation, post_not_found,
    user_not_found,
};

const POST_COLUMNS: &str = "p.id, p.slug, p.title, p.excerpt, p.content, p.cover_image, \
                            p.published, p.featured, p.staff_pick, p.author_id, p.views, \
                            p.likes_count, p.comments_count, p.created_at, p.updated_at";

/// Filter predicate over `posts p`; binds $1..$5 in `FilterParams` order
const FILTER_CLAUSE: &str = r#"
    ($1 = FALSE OR p.published)
    AND ($2 = FALSE OR p.featured)
    AND ($3::BIGINT IS NULL OR EXISTS (
        SELECT 1 FROM posts_to_tags pt WHERE pt.post_id = p.id AND pt.tag_id = $3
    ))
    AND ($4::BIGINT IS NULL OR p.author_id = $4)
    AND ($5::TEXT IS NULL OR p.title ILIKE $5 ESCAPE '\' OR p.excerpt ILIKE $5 ESCAPE '\')
"#;

/// Bind values for `FILTER_CLAUSE`
struct FilterParams {
    published_only: bool,
    featured_only: bool,
    tag_id: Option<i64>,
    author_id: Option<i64>,
    pattern: Option<String>,
}

impl From<&PostFilter> for FilterParams {
    fn from(filter: &PostFilter) -> Self {
        Self {
            published_only: filter.published_only,
            featured_only: filter.featured_only,
            tag_id: filter.tag_id.map(Snowflake::into_inner),
            author_id: filter.author_id.map(Snowflake::into_inner),
            pattern: filter.text.as_deref().map(like_pattern),
        }
    }
}

fn sort_column(key: SortKey) -> &'static str {
    match key {
        SortKey::StaffPick => "p.staff_pick DESC",
        SortKey::Views => "p.views DESC",
        SortKey::Likes => "p.likes_count DESC",
        SortKey::CreatedAt => "p.created_at DESC",
        SortKey::Random => "RANDOM()",
    }
}

/// `ORDER BY` body for a key list, ending in the id tie-break
fn order_by_clause(keys: &[SortKey]) -> String {
    keys.iter()
        .copied()
        .map(sort_column)
        .chain(std::iter::once("p.id DESC"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn link_tags(
        tx: &mut Transaction<'_, Postgres>,
        post_id: i64,
        tag_ids: &[Snowflake],
    ) -> RepoResult<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let tag_ids: Vec<i64> = tag_ids.iter().map(|id| id.into_inner()).collect();

        sqlx::query(
            r#"
            INSERT INTO posts_to_tags (post_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(&tag_ids)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            map_missing_reference(e, || DomainError::TagNotFound(format!("{tag_ids:?}")))
        })?;

        Ok(())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Post>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE p.id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_ranked_ids(
        &self,
        filter: &PostFilter,
        keys: &[SortKey],
        page: PageRequest,
    ) -> RepoResult<Vec<Snowflake>> {
        let params = FilterParams::from(filter);
        let sql = format!(
            "SELECT p.id FROM posts p WHERE {FILTER_CLAUSE} ORDER BY {} LIMIT $6 OFFSET $7",
            order_by_clause(keys)
        );

        let ids = sqlx::query_scalar::<_, i64>(&sql)
            .bind(params.published_only)
            .bind(params.featured_only)
            .bind(params.tag_id)
            .bind(params.author_id)
            .bind(params.pattern)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self))]
    async fn find_all(&self, filter: &PostFilter, keys: &[SortKey]) -> RepoResult<Vec<Post>> {
        let params = FilterParams::from(filter);
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p WHERE {FILTER_CLAUSE} ORDER BY {}",
            order_by_clause(keys)
        );

        let results = sqlx::query_as::<_, PostModel>(&sql)
            .bind(params.published_only)
            .bind(params.featured_only)
            .bind(params.tag_id)
            .bind(params.author_id)
            .bind(params.pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &PostFilter) -> RepoResult<i64> {
        let params = FilterParams::from(filter);
        let sql = format!("SELECT COUNT(*) FROM posts p WHERE {FILTER_CLAUSE}");

        sqlx::query_scalar::<_, i64>(&sql)
            .bind(params.published_only)
            .bind(params.featured_only)
            .bind(params.tag_id)
            .bind(params.author_id)
            .bind(params.pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, post), fields(post_id = %post.id, slug = %post.slug))]
    async fn create(&self, post: &Post, tag_ids: &[Snowflake]) -> RepoResult<()> {
        let row = PostInsert::new(post);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO posts (id, slug, title, excerpt, content, cover_image, published,
                               author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            "#,
        )
        .bind(row.id)
        .bind(row.slug)
        .bind(row.title)
        .bind(row.excerpt)
        .bind(row.content)
        .bind(row.cover_image)
        .bind(row.published)
        .bind(row.author_id)
        .bind(post.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let missing_author = e
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation());
            if missing_author {
                user_not_found(post.author_id)
            } else {
                map_unique_violation(e, || DomainError::SlugTaken(post.slug.clone()))
            }
        })?;

        Self::link_tags(&mut tx, row.id, tag_ids).await?;

        tx.commit().await.map_err(map_db_error)?;
        info!("Post created");
        Ok(())
    }

    #[instrument(skip(self, post, tag_ids), fields(post_id = %post.id))]
    async fn update(&self, post: &Post, tag_ids: Option<&[Snowflake]>) -> RepoResult<()> {
        let row = PostInsert::new(post);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // A published post keeps its slug even if it was published after the caller read it
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET slug = $2, title = $3, excerpt = $4, content = $5, cover_image = $6,
                updated_at = NOW()
            WHERE id = $1 AND (published = FALSE OR slug = $2)
            "#,
        )
        .bind(row.id)
        .bind(row.slug)
        .bind(row.title)
        .bind(row.excerpt)
        .bind(row.content)
        .bind(row.cover_image)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::SlugTaken(post.slug.clone())))?;

        if result.rows_affected() == 0 {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
                .bind(row.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?;

            return Err(if exists {
                DomainError::SlugImmutable
            } else {
                post_not_found(post.id)
            });
        }

        if let Some(tag_ids) = tag_ids {
            sqlx::query("DELETE FROM posts_to_tags WHERE post_id = $1")
                .bind(row.id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

            Self::link_tags(&mut tx, row.id, tag_ids).await?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn publish(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET published = TRUE, updated_at = NOW()
            WHERE id = $1 AND published = FALSE
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn reconcile_counters(&self) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            WITH actual AS (
                SELECT p.id,
                       (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes,
                       (SELECT COUNT(*) FROM post_views v WHERE v.post_id = p.id) AS views
                FROM posts p
            )
            UPDATE posts p
            SET likes_count = actual.likes, views = actual.views
            FROM actual
            WHERE p.id = actual.id
              AND (p.likes_count <> actual.likes OR p.views <> actual.views)
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
