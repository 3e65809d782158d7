//! Database models - SQLx-compatible structs for PostgreSQL tables

mod post;
mod tag;
mod user;

pub use post::PostModel;
pub use tag::{PostTagModel, TagCountModel, TagModel};
pub use user::UserModel;
