//! Value objects - immutable types that represent domain concepts

mod identity;
mod page;
mod ranking;
mod slug;
mod snowflake;

pub use identity::{Fingerprint, Identity, ViewerKey};
pub use page::{total_pages, PageRequest, MAX_SEARCH_LIMIT, PAGE_SIZE};
pub use ranking::{compare_posts, SearchSort, SortKey, TagSort};
pub use slug::{slugify, with_random_suffix};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
