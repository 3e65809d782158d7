//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs from the persistent store; the
//! infrastructure layer provides the implementation. Operations documented
//! as atomic must run as a single store transaction so that the fact row and
//! the post counter it feeds can never be observed out of step.

use async_trait::async_trait;

use crate::entities::{Follow, Like, Post, PostView, Tag, TagWithCount, User, UserProfile};
use crate::error::DomainError;
use crate::value_objects::{PageRequest, SortKey, Snowflake};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find users by id; missing ids are skipped, order is unspecified
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<User>>;

    /// Case-insensitive username lookup
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Get-or-create the local mirror of a provider profile.
    ///
    /// Concurrent first visits must converge on a single row. A username
    /// already held by another account is dropped rather than failing.
    async fn upsert_from_profile(&self, profile: &UserProfile) -> RepoResult<User>;

    /// Persist editable profile fields and the privacy switch
    async fn update_profile(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Filter over posts shared by feed, tag, author and search listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub published_only: bool,
    pub featured_only: bool,
    pub tag_id: Option<Snowflake>,
    pub author_id: Option<Snowflake>,
    /// Case-insensitive substring over title OR excerpt
    pub text: Option<String>,
}

impl PostFilter {
    /// Every published post
    pub fn published() -> Self {
        Self {
            published_only: true,
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag_id: Snowflake) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    pub fn by_author(mut self, author_id: Snowflake) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured_only = true;
        self
    }

    /// Add a text filter; a blank query adds nothing (browse-all)
    pub fn matching(mut self, query: &str) -> Self {
        let query = query.trim();
        self.text = (!query.is_empty()).then(|| query.to_string());
        self
    }

    /// Evaluate every criterion except tag membership against a post
    pub fn accepts(&self, post: &Post) -> bool {
        if self.published_only && !post.published {
            return false;
        }
        if self.featured_only && !post.featured {
            return false;
        }
        if self.author_id.is_some_and(|id| id != post.author_id) {
            return false;
        }
        match &self.text {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post
                        .excerpt
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            }
        }
    }
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Post>>;

    /// Hydrate posts by id. The store may return them in any order.
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Post>>;

    /// Ids of one page of posts matching `filter`, ordered by `keys` then `id DESC`
    async fn find_ranked_ids(
        &self,
        filter: &PostFilter,
        keys: &[SortKey],
        page: PageRequest,
    ) -> RepoResult<Vec<Snowflake>>;

    /// Every post matching `filter`, ordered by `keys` then `id DESC`
    async fn find_all(&self, filter: &PostFilter, keys: &[SortKey]) -> RepoResult<Vec<Post>>;

    /// Number of posts matching `filter`, independent of any page window
    async fn count(&self, filter: &PostFilter) -> RepoResult<i64>;

    /// Insert a post together with its tag links (atomic)
    async fn create(&self, post: &Post, tag_ids: &[Snowflake]) -> RepoResult<()>;

    /// Update author-editable fields; `tag_ids` replaces the tag set when given (atomic)
    async fn update(&self, post: &Post, tag_ids: Option<&[Snowflake]>) -> RepoResult<()>;

    /// Flip `published` to true. Returns false when already published.
    async fn publish(&self, id: Snowflake) -> RepoResult<bool>;

    /// Hard delete; likes, views and tag links go with it. Returns false if absent.
    async fn delete(&self, id: Snowflake) -> RepoResult<bool>;

    /// Recompute `likes_count` and `views` from their fact tables.
    /// Returns the number of posts whose counters had drifted.
    async fn reconcile_counters(&self) -> RepoResult<u64>;
}

// ============================================================================
// Tag Repository
// ============================================================================

#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Case-insensitive match on slug OR name
    async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<Tag>>;

    /// Return the tag named like `candidate` (ignoring case), inserting
    /// `candidate` if none. A slug held by a differently named tag gets a
    /// random suffix. Concurrent first writers converge on one row.
    async fn get_or_create(&self, candidate: &Tag) -> RepoResult<Tag>;

    /// Tags attached to each of the given posts, as (post_id, tag) pairs
    async fn find_by_post_ids(&self, post_ids: &[Snowflake]) -> RepoResult<Vec<(Snowflake, Tag)>>;

    /// Tags by number of published posts, most used first
    async fn list_with_counts(&self, limit: i64) -> RepoResult<Vec<TagWithCount>>;
}

// ============================================================================
// Engagement Repositories
// ============================================================================

/// Outcome of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: i64,
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Flip the like for `(like.post_id, like.user_id)` (atomic).
    ///
    /// Removes an existing row and decrements `likes_count`, or inserts
    /// `like` and increments it. A concurrent duplicate insert resolves to
    /// "liked" without touching the counter.
    async fn toggle(&self, like: &Like) -> RepoResult<LikeToggle>;

    async fn exists(&self, post_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;
}

/// Outcome of recording a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRecord {
    /// True when this was the identity's first view of the post
    pub recorded: bool,
    pub views: i64,
}

#[async_trait]
pub trait PostViewRepository: Send + Sync {
    /// Insert `view` unless its identity already viewed the post, bumping
    /// `views` only on insert (atomic). Duplicates are not errors.
    async fn record(&self, view: &PostView) -> RepoResult<ViewRecord>;
}

// ============================================================================
// Follow Repository
// ============================================================================

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Flip the edge `follow.follower_id -> follow.following_id` (atomic).
    /// Returns whether the follower now follows the target.
    async fn toggle(&self, follow: &Follow) -> RepoResult<bool>;

    async fn exists(&self, follower_id: Snowflake, following_id: Snowflake) -> RepoResult<bool>;

    async fn count_followers(&self, user_id: Snowflake) -> RepoResult<i64>;

    async fn count_following(&self, user_id: Snowflake) -> RepoResult<i64>;
}
