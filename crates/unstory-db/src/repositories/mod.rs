//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in unstory-core.
//! Toggle and record operations run inside a single transaction each.

mod error;
mod follow;
mod like;
mod post;
mod post_view;
mod tag;
mod user;

pub use follow::PgFollowRepository;
pub use like::PgLikeRepository;
pub use post::PgPostRepository;
pub use post_view::PgPostViewRepository;
pub use tag::PgTagRepository;
pub use user::PgUserRepository;
