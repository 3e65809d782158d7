//! # unstory-core
//!
//! Domain layer of the Unstory blogging backend: entities, value objects,
//! repository traits and domain errors. This crate has zero dependencies on
//! infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Follow, Like, Post, PostView, Tag, TagWithCount, User, UserProfile};
pub use error::DomainError;
pub use traits::{
    FollowRepository, LikeRepository, LikeToggle, PostFilter, PostRepository,
    PostViewRepository, RepoResult, TagRepository, UserRepository, ViewRecord,
};
pub use value_objects::{
    compare_posts, slugify, total_pages, with_random_suffix, Fingerprint, Identity, PageRequest,
    SearchSort, SnowflakeGenerator, Snowflake, SnowflakeParseError, SortKey, TagSort, ViewerKey,
    MAX_SEARCH_LIMIT, PAGE_SIZE,
};
