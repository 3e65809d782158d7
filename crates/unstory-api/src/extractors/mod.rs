//! Axum extractors for request handling
//!
//! Session users, resolved identities, listing queries, path ids and
//! validated bodies.

mod auth;
mod identity;
mod pagination;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser};
pub use identity::{fingerprint_cookie, ResolvedIdentity, FINGERPRINT_COOKIE, FINGERPRINT_MAX_AGE_SECS};
pub use pagination::{Listing, ListingParams};
pub use path::UserIdPath;
pub use validated::ValidatedJson;
