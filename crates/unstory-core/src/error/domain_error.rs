//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Cannot follow yourself")]
    CannotFollowSelf,

    #[error("Slug cannot change after publication")]
    SlugImmutable,

    // =========================================================================
    // Authentication / Authorization Errors
    // =========================================================================
    #[error("Sign in required")]
    AuthenticationRequired,

    #[error("User is banned: {0}")]
    UserBanned(Snowflake),

    #[error("Not the author of this post")]
    NotPostAuthor,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("Username already in use: {0}")]
    UsernameTaken(String),

    #[error("Email already belongs to another account: {0}")]
    EmailTaken(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::TagNotFound(_) => "UNKNOWN_TAG",

            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::CannotFollowSelf => "CANNOT_FOLLOW_SELF",
            Self::SlugImmutable => "SLUG_IMMUTABLE",

            Self::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            Self::UserBanned(_) => "USER_BANNED",
            Self::NotPostAuthor => "NOT_POST_AUTHOR",

            Self::SlugTaken(_) => "SLUG_TAKEN",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",
            Self::EmailTaken(_) => "EMAIL_TAKEN",

            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::PostNotFound(_) | Self::TagNotFound(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::CannotFollowSelf | Self::SlugImmutable
        )
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::AuthenticationRequired)
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::UserBanned(_) | Self::NotPostAuthor)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SlugTaken(_) | Self::UsernameTaken(_) | Self::EmailTaken(_)
        )
    }

    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_authentication() {
            401
        } else if self.is_authorization() {
            403
        } else if self.is_validation() {
            400
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}
