//! # unstory-api
//!
//! HTTP boundary of the Unstory blogging backend, built on Axum.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, create_service_context, run};
pub use state::AppState;
