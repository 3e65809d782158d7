//! Business logic services
//!
//! Each service borrows the `ServiceContext` for one call and orchestrates
//! repository operations for a single area of the application.

pub mod context;
pub mod engagement;
pub mod error;
pub mod feed;
pub mod follow;
pub mod identity;
pub mod maintenance;
pub mod post;
pub mod tag;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use engagement::EngagementService;
pub use error::{ServiceError, ServiceResult};
pub use feed::{restore_order, FeedService, FEATURED_LIMIT};
pub use follow::FollowService;
pub use identity::{IdentityResolver, RequestIdentity};
pub use maintenance::MaintenanceService;
pub use post::PostService;
pub use tag::{TagService, DEFAULT_TAG_LIMIT};
pub use user::UserService;
