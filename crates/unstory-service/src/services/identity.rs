//! Identity resolver
//!
//! Turns the credentials a request carries into the identity it acts as.
//! Resolution never fails: a missing, expired or malformed session token
//! degrades to an anonymous visitor.

use tracing::debug;

use unstory_core::entities::UserProfile;
use unstory_core::{DomainError, Fingerprint, Identity, Snowflake, ViewerKey};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// The resolved identity of one request, plus the provider profile when signed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    identity: Identity,
    profile: Option<UserProfile>,
}

impl RequestIdentity {
    pub fn authenticated(profile: UserProfile) -> Self {
        Self {
            identity: Identity::authenticated(profile.id),
            profile: Some(profile),
        }
    }

    pub fn anonymous(identity: Identity) -> Self {
        debug_assert!(!identity.is_authenticated());
        Self {
            identity,
            profile: None,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> Option<Snowflake> {
        self.identity.user_id()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_authenticated()
    }

    /// Profile of the signed-in user, or `AuthenticationRequired`
    pub fn require_profile(&self) -> ServiceResult<&UserProfile> {
        self.profile
            .as_ref()
            .ok_or_else(|| DomainError::AuthenticationRequired.into())
    }

    pub fn view_key(&self) -> ViewerKey<'_> {
        self.identity.view_key()
    }

    /// Fingerprint minted for this request that the client still has to store
    pub fn minted_fingerprint(&self) -> Option<&Fingerprint> {
        self.identity.minted_fingerprint()
    }
}

/// Identity resolver
pub struct IdentityResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve from an optional bearer token and an optional fingerprint cookie value
    pub fn resolve(&self, bearer: Option<&str>, fingerprint: Option<&str>) -> RequestIdentity {
        if let Some(profile) = bearer.and_then(|token| self.verify(token)) {
            return RequestIdentity::authenticated(profile);
        }

        let identity = match fingerprint.and_then(Fingerprint::parse) {
            Some(existing) => Identity::returning_visitor(existing),
            None => Identity::new_visitor(),
        };
        RequestIdentity::anonymous(identity)
    }

    /// Resolve only a signed-in user; no fingerprint is minted
    pub fn resolve_user(&self, bearer: Option<&str>) -> Option<RequestIdentity> {
        bearer
            .and_then(|token| self.verify(token))
            .map(RequestIdentity::authenticated)
    }

    fn verify(&self, token: &str) -> Option<UserProfile> {
        let result = self
            .ctx
            .jwt_service()
            .verify_session(token)
            .and_then(|claims| claims.profile());

        match result {
            Ok(profile) => Some(profile),
            Err(e) => {
                debug!(error = %e, "Session token rejected, continuing anonymously");
                None
            }
        }
    }
}
