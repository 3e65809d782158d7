//! Acting identity - who is performing a request
//!
//! Either a user vouched for by the identity provider, or an anonymous
//! visitor known only by a fingerprint token kept in a client cookie.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use std::fmt;

use super::Snowflake;

/// Number of random bytes behind a fingerprint (32 base64url characters)
const FINGERPRINT_BYTES: usize = 24;

/// Opaque anonymous-visitor token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Mint a fresh random fingerprint
    pub fn generate() -> Self {
        let mut bytes = [0u8; FINGERPRINT_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Accept a fingerprint presented by a client.
    ///
    /// Values that could not have been minted here (empty, oversized, or with
    /// characters outside the base64url alphabet) are refused so they never
    /// reach the store.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= 128
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity a request acts as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Authenticated {
        user_id: Snowflake,
    },
    Anonymous {
        fingerprint: Fingerprint,
        /// True when the fingerprint was minted for this request and the
        /// client has not stored it yet
        minted: bool,
    },
}

impl Identity {
    pub fn authenticated(user_id: Snowflake) -> Self {
        Self::Authenticated { user_id }
    }

    /// Anonymous identity from an existing cookie value
    pub fn returning_visitor(fingerprint: Fingerprint) -> Self {
        Self::Anonymous {
            fingerprint,
            minted: false,
        }
    }

    /// Anonymous identity with a freshly minted fingerprint
    pub fn new_visitor() -> Self {
        Self::Anonymous {
            fingerprint: Fingerprint::generate(),
            minted: true,
        }
    }

    pub fn user_id(&self) -> Option<Snowflake> {
        match self {
            Self::Authenticated { user_id } => Some(*user_id),
            Self::Anonymous { .. } => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Fingerprint the caller must persist on the client, if any
    pub fn minted_fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            Self::Anonymous {
                fingerprint,
                minted: true,
            } => Some(fingerprint),
            _ => None,
        }
    }

    /// Key used to deduplicate post views
    pub fn view_key(&self) -> ViewerKey<'_> {
        match self {
            Self::Authenticated { user_id } => ViewerKey::User(*user_id),
            Self::Anonymous { fingerprint, .. } => ViewerKey::Fingerprint(fingerprint),
        }
    }
}

/// Deduplication key for post views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey<'a> {
    User(Snowflake),
    Fingerprint(&'a Fingerprint),
}
