//! Page-number pagination

use serde::Serialize;

/// Fixed page size of tag pages and author listings
pub const PAGE_SIZE: u32 = 12;

/// Upper bound for caller-chosen search limits
pub const MAX_SEARCH_LIMIT: u32 = 50;

/// A 1-based page window over a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Build a window; page 0 is treated as page 1 and `per_page` is kept in 1..=MAX_SEARCH_LIMIT
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_SEARCH_LIMIT),
        }
    }

    /// Window with the fixed listing page size
    pub fn fixed(page: u32) -> Self {
        Self::new(page, PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn total_pages(&self, total_count: i64) -> i64 {
        total_pages(total_count, self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::fixed(1)
    }
}

/// `ceil(total_count / page_size)`, zero for an empty listing
pub fn total_pages(total_count: i64, page_size: u32) -> i64 {
    if total_count <= 0 {
        return 0;
    }
    let size = i64::from(page_size.max(1));
    (total_count + size - 1) / size
}
