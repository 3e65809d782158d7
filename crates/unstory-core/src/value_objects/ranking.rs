//! Ranking policies for post listings
//!
//! Each policy is an ordered list of descending sort keys. Every listing
//! ends with `id DESC` so equal rows still come back in a fixed order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::entities::Post;

/// One descending sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    StaffPick,
    Views,
    Likes,
    CreatedAt,
    /// Store-level random order, re-rolled on every query
    Random,
}

impl SortKey {
    /// Compare two posts by this key, larger first.
    ///
    /// `Random` has no in-memory meaning and always compares equal.
    pub fn compare(self, a: &Post, b: &Post) -> Ordering {
        match self {
            Self::StaffPick => b.staff_pick.cmp(&a.staff_pick),
            Self::Views => b.views.cmp(&a.views),
            Self::Likes => b.likes_count.cmp(&a.likes_count),
            Self::CreatedAt => b.created_at.cmp(&a.created_at),
            Self::Random => Ordering::Equal,
        }
    }
}

/// Orders offered on tag pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSort {
    Latest,
    Popular,
    #[default]
    Recommended,
}

impl TagSort {
    pub fn keys(self) -> &'static [SortKey] {
        match self {
            Self::Latest => &[SortKey::CreatedAt],
            Self::Popular => &[SortKey::Views, SortKey::Likes],
            Self::Recommended => &[SortKey::StaffPick, SortKey::Views, SortKey::Likes],
        }
    }

    /// Lenient parse of a query-string value; unknown values fall back to the default
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
            Some("latest") => Self::Latest,
            Some("popular") => Self::Popular,
            _ => Self::Recommended,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Popular => "popular",
            Self::Recommended => "recommended",
        }
    }
}

/// Orders offered by search and the public feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    #[default]
    Latest,
    Popular,
    Random,
}

impl SearchSort {
    pub fn keys(self) -> &'static [SortKey] {
        match self {
            Self::Latest => &[SortKey::CreatedAt],
            Self::Popular => &[SortKey::Likes, SortKey::CreatedAt],
            Self::Random => &[SortKey::Random],
        }
    }

    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
            Some("popular") => Self::Popular,
            Some("random") => Self::Random,
            _ => Self::Latest,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Popular => "popular",
            Self::Random => "random",
        }
    }
}

/// Compare two posts under a key list, breaking remaining ties on id (newest first)
pub fn compare_posts(keys: &[SortKey], a: &Post, b: &Post) -> Ordering {
    keys.iter()
        .map(|key| key.compare(a, b))
        .find(|ord| ord.is_ne())
        .unwrap_or_else(|| b.id.cmp(&a.id))
}
