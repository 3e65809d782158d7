//! # unstory-db
//!
//! Database layer implementing the unstory-core repository traits with PostgreSQL via SQLx.
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity <-> model mappers
//! - Repository implementations
//!
//! ```rust,ignore
//! use unstory_db::{create_pool, run_migrations, PgPostRepository, PoolConfig};
//!
//! let pool = create_pool(&PoolConfig::new(database_url)).await?;
//! run_migrations(&pool).await?;
//! let posts = PgPostRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ping, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgFollowRepository, PgLikeRepository, PgPostRepository, PgPostViewRepository,
    PgTagRepository, PgUserRepository,
};
