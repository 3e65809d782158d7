//! Integration test utilities for the Unstory API
//!
//! Helpers for spawning the HTTP server against a real database, minting
//! identity-provider session tokens and decoding responses.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
