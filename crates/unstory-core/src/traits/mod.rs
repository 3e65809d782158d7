//! Ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    FollowRepository, LikeRepository, LikeToggle, PostFilter, PostRepository,
    PostViewRepository, RepoResult, TagRepository, UserRepository, ViewRecord,
};
