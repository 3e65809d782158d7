//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use unstory_core::entities::{User, UserProfile};
use unstory_core::error::DomainError;
use unstory_core::traits::{RepoResult, UserRepository};
use unstory_core::value_objects::Snowflake;

use crate::mappers::UserInsert;
use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_not_found};

const USER_COLUMNS: &str = "id, email, username, name, avatar, bio, website, twitter, github, \
                            is_banned, show_followers_count, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert unless any unique key is taken; returns the row only if inserted
    async fn try_insert(&self, row: UserInsert<'_>) -> RepoResult<Option<User>> {
        let inserted = sqlx::query_as::<_, UserModel>(&format!(
            r#"
            INSERT INTO users (id, email, username, name, avatar)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(row.id)
        .bind(row.email)
        .bind(row.username)
        .bind(row.name)
        .bind(row.avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(inserted.map(User::from))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = ids.iter().map(|id| id.into_inner()).collect();

        let results = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(username) = LOWER($1)"
        ))
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self, profile), fields(user_id = %profile.id))]
    async fn upsert_from_profile(&self, profile: &UserProfile) -> RepoResult<User> {
        let row = UserInsert::new(profile);

        if let Some(user) = self.try_insert(row).await? {
            return Ok(user);
        }
        if let Some(user) = self.find_by_id(profile.id).await? {
            return Ok(user);
        }

        // Blocked by another account's username or email
        if row.username.is_some() {
            debug!("Username taken, mirroring without it");
            if let Some(user) = self.try_insert(row.without_username()).await? {
                return Ok(user);
            }
            if let Some(user) = self.find_by_id(profile.id).await? {
                return Ok(user);
            }
        }

        Err(DomainError::EmailTaken(profile.email.clone()))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update_profile(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, name = $3, avatar = $4, bio = $5, website = $6,
                twitter = $7, github = $8, show_followers_count = $9, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(&user.bio)
        .bind(&user.website)
        .bind(&user.twitter)
        .bind(&user.github)
        .bind(user.show_followers_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::UsernameTaken(user.username.clone().unwrap_or_default())
            })
        })?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user.id));
        }

        Ok(())
    }
}
