//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use unstory_core::error::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Map a foreign-key violation (a referenced row is gone) to a not-found error
pub fn map_missing_reference<F>(e: SqlxError, on_missing: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_foreign_key_violation() {
            return on_missing();
        }
    }
    map_db_error(e)
}

/// Name of the constraint a database error tripped, if any
pub fn violated_constraint(e: &SqlxError) -> Option<&str> {
    e.as_database_error().and_then(|db| db.constraint())
}

/// Escape `%`, `_` and `\` so user text matches literally inside a LIKE pattern
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

pub fn post_not_found(id: impl ToString) -> DomainError {
    DomainError::PostNotFound(id.to_string())
}

pub fn user_not_found(id: impl ToString) -> DomainError {
    DomainError::UserNotFound(id.to_string())
}
