//! PostgreSQL implementation of TagRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use unstory_core::entities::{Tag, TagWithCount};
use unstory_core::error::DomainError;
use unstory_core::traits::{RepoResult, TagRepository};
use unstory_core::value_objects::{with_random_suffix, Snowflake};

use crate::models::{PostTagModel, TagCountModel, TagModel};

use super::error::map_db_error;

/// Slug candidates tried before giving up on a new tag
const TAG_INSERT_ATTEMPTS: usize = 5;

/// PostgreSQL implementation of TagRepository
#[derive(Clone)]
pub struct PgTagRepository {
    pool: PgPool,
}

impl PgTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Tag>> {
        let result = sqlx::query_as::<_, TagModel>(
            "SELECT id, name, slug FROM tags WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Tag::from))
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    #[instrument(skip(self))]
    async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<Tag>> {
        // Slug matches win over name matches
        let result = sqlx::query_as::<_, TagModel>(
            r#"
            SELECT id, name, slug
            FROM tags
            WHERE LOWER(slug) = LOWER($1) OR LOWER(name) = LOWER($1)
            ORDER BY (LOWER(slug) = LOWER($1)) DESC, id
            LIMIT 1
            "#,
        )
        .bind(identifier.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Tag::from))
    }

    #[instrument(skip(self, candidate), fields(name = %candidate.name))]
    async fn get_or_create(&self, candidate: &Tag) -> RepoResult<Tag> {
        let mut slug = candidate.slug.clone();

        for _ in 0..TAG_INSERT_ATTEMPTS {
            if let Some(existing) = self.find_by_name(&candidate.name).await? {
                return Ok(existing);
            }

            let inserted = sqlx::query_as::<_, TagModel>(
                r#"
                INSERT INTO tags (id, name, slug)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                RETURNING id, name, slug
                "#,
            )
            .bind(candidate.id.into_inner())
            .bind(&candidate.name)
            .bind(&slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            if let Some(tag) = inserted {
                return Ok(Tag::from(tag));
            }

            // Either the name was inserted concurrently (found on the next
            // pass) or the slug belongs to a differently named tag
            debug!(slug = %slug, "Tag slug taken, retrying");
            slug = with_random_suffix(&candidate.slug);
        }

        self.find_by_name(&candidate.name)
            .await?
            .ok_or_else(|| DomainError::SlugTaken(candidate.slug.clone()))
    }

    #[instrument(skip(self, post_ids), fields(count = post_ids.len()))]
    async fn find_by_post_ids(&self, post_ids: &[Snowflake]) -> RepoResult<Vec<(Snowflake, Tag)>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let post_ids: Vec<i64> = post_ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, PostTagModel>(
            r#"
            SELECT pt.post_id, t.id, t.name, t.slug
            FROM posts_to_tags pt
            JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(&post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_with_counts(&self, limit: i64) -> RepoResult<Vec<TagWithCount>> {
        let results = sqlx::query_as::<_, TagCountModel>(
            r#"
            SELECT t.id, t.name, t.slug, COUNT(p.id) AS post_count
            FROM tags t
            JOIN posts_to_tags pt ON pt.tag_id = t.id
            JOIN posts p ON p.id = pt.post_id AND p.published
            GROUP BY t.id, t.name, t.slug
            ORDER BY post_count DESC, t.name
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(TagWithCount::from).collect())
    }
}
