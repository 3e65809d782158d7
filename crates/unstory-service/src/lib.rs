//! # unstory-service
//!
//! Application layer: identity resolution, ranked feeds, engagement
//! counters, follows and post authoring, plus the DTOs they speak.

pub mod dto;
pub mod services;

pub use services::{
    EngagementService, FeedService, FollowService, IdentityResolver, MaintenanceService,
    PostService, RequestIdentity, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, TagService, UserService,
};
