//! Identity-provider session tokens

mod jwt;

pub use jwt::{IdentityClaims, JwtService};
