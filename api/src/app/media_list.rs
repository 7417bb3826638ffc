//! Paginated media lists
//!
//! Shows, podcasts and search results are presented twenty to a page.

use serde::Serialize;

pub const PAGE_SIZE: u64 = 20;

/// A resolved page position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based page number; 0 when there is nothing to show
    pub page: u64,
    pub pages: u64,
}

impl Page {
    /// Clamp the requested page into the available range
    pub fn new(requested: i64, count: u64) -> Self {
        let pages = count.div_ceil(PAGE_SIZE);
        let page = requested.max(1) as u64;

        Self {
            page: page.min(pages),
            pages,
        }
    }

    /// Offset of the first item on the page
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * PAGE_SIZE
    }

    /// Number of items to fetch; nothing at all on page 0
    pub fn limit(&self) -> u64 {
        if self.page == 0 {
            0
        } else {
            PAGE_SIZE
        }
    }
}

/// One page of annotated items
#[derive(Debug, Clone, Serialize)]
pub struct MediaList<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub pages: u64,
    pub count: u64,
}

impl<T> MediaList<T> {
    pub fn new(items: Vec<T>, page: Page, count: u64) -> Self {
        Self {
            items,
            page: page.page,
            pages: page.pages,
            count,
        }
    }
}
