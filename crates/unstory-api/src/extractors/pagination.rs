//! Listing query extractor
//!
//! Page-number pagination, search text and sort order from the query string.
//! Parsing is lenient: a missing or unparsable value falls back to its
//! default instead of failing the request.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use unstory_core::{SearchSort, TagSort, MAX_SEARCH_LIMIT, PAGE_SIZE};
use unstory_service::services::DEFAULT_TAG_LIMIT;

use crate::response::ApiError;

/// Upper bound for the tag directory size
const MAX_TAG_LIMIT: i64 = 200;

/// Raw listing query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// Normalized listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub query: String,
    pub page: u32,
    pub limit: u32,
    raw_limit: Option<i64>,
    sort: Option<String>,
}

impl Default for Listing {
    fn default() -> Self {
        Self::from(ListingParams::default())
    }
}

impl Listing {
    pub fn search_sort(&self) -> SearchSort {
        SearchSort::from_param(self.sort.as_deref())
    }

    pub fn tag_sort(&self) -> TagSort {
        TagSort::from_param(self.sort.as_deref())
    }

    /// Size of the tag directory
    pub fn tag_limit(&self) -> i64 {
        self.raw_limit
            .map_or(DEFAULT_TAG_LIMIT, |limit| limit.clamp(1, MAX_TAG_LIMIT))
    }
}

impl From<ListingParams> for Listing {
    fn from(params: ListingParams) -> Self {
        let page = parse_number(params.page.as_deref())
            .map_or(1, |page| page.clamp(1, i64::from(u32::MAX)));
        let raw_limit = parse_number(params.limit.as_deref());
        let limit = raw_limit.map_or(i64::from(PAGE_SIZE), |limit| {
            limit.clamp(1, i64::from(MAX_SEARCH_LIMIT))
        });

        Self {
            query: params.q.map(|q| q.trim().to_string()).unwrap_or_default(),
            page: u32::try_from(page).unwrap_or(1),
            limit: u32::try_from(limit).unwrap_or(PAGE_SIZE),
            raw_limit,
            sort: params.sort,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Listing
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListingParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(Listing::from(params))
    }
}
