//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod engagement;
pub mod health;
pub mod posts;
pub mod tags;
pub mod users;
