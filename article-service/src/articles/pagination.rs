//! Skip/limit bounds and page metadata
//!
//! # Example
//!
//! ```rust
//! use article_service::articles::{Pagination, PaginationInfo};
//!
//! let bounds = Pagination::page(3, 10);
//! assert_eq!(bounds.offset, 20);
//! assert_eq!(bounds.limit, 10);
//!
//! let info = PaginationInfo::new(3, 10, 25);
//! assert_eq!(info.total_pages, 3);
//! assert!(!info.has_next_page);
//! assert!(info.has_prev_page);
//! ```

use serde::{Deserialize, Serialize};

/// Pagination parameters for store queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    /// Create new pagination parameters
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Pagination for a 1-indexed page number
    ///
    /// Page 0 is treated as page 1.
    #[must_use]
    pub const fn page(page_number: u32, page_size: u32) -> Self {
        let offset = (page_number.saturating_sub(1) as u64) * (page_size as u64);
        Self {
            offset,
            limit: page_size as u64,
        }
    }
}

/// Pagination metadata returned alongside a page of articles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_articles: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationInfo {
    /// Build metadata for `page` given the page size and total match count
    #[must_use]
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let total_pages = calculate_total_pages(total, page_size);
        Self {
            current_page: page,
            total_pages,
            total_articles: total,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// Ceiling division of `total` by `page_size`; 0 when there is nothing to page
fn calculate_total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = total.saturating_add(page_size).saturating_sub(1) / page_size;
    u32::try_from(pages).unwrap_or(u32::MAX)
}
