//! Domain entities - core business objects

mod follow;
mod like;
mod post;
mod post_view;
mod tag;
mod user;

pub use follow::Follow;
pub use like::Like;
pub use post::Post;
pub use post_view::PostView;
pub use tag::{Tag, TagWithCount};
pub use user::{User, UserProfile};
