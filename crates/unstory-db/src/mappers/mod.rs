//! Entity to model mappers
//!
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database writes

mod post;
mod tag;
mod user;

pub use post::PostInsert;
pub use user::UserInsert;
