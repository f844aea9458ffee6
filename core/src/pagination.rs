//! Page window calculation for search results.
//!
//! GitHub reports the full match count but only serves the first
//! [`MAX_RESULTS`] results, so the page count is clamped to what is actually
//! reachable. At most [`MAX_VISIBLE_PAGES`] entries are shown; longer ranges
//! collapse into ellipses around the current page.

use serde::Serialize;

/// Search results GitHub will serve, regardless of `total_count`.
pub const MAX_RESULTS: u32 = 1000;

/// Above this many pages the window starts eliding.
pub const MAX_VISIBLE_PAGES: u32 = 7;

/// One entry of the rendered page list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Number of pages a user can navigate to.
pub fn total_pages(total_count: u64, per_page: u32, max_results: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let per_page = u64::from(per_page);
    let by_count = total_count.div_ceil(per_page);
    let by_cap = u64::from(max_results).div_ceil(per_page);
    // by_cap fits in u32 because max_results does.
    by_count.min(by_cap) as u32
}

/// Last page GitHub will serve for this page size.
pub fn max_page(per_page: u32) -> u32 {
    total_pages(u64::from(MAX_RESULTS), per_page, MAX_RESULTS)
}

pub fn page_window(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= MAX_VISIBLE_PAGES {
        return (1..=total_pages).map(Page).collect();
    }

    let mut items = Vec::with_capacity(MAX_VISIBLE_PAGES as usize);
    if current_page <= 4 {
        items.extend((1..=5).map(Page));
        items.push(Ellipsis);
        items.push(Page(total_pages));
    } else if current_page >= total_pages - 3 {
        items.push(Page(1));
        items.push(Ellipsis);
        items.extend((total_pages - 4..=total_pages).map(Page));
    } else {
        items.push(Page(1));
        items.push(Ellipsis);
        items.extend((current_page - 1..=current_page + 1).map(Page));
        items.push(Ellipsis);
        items.push(Page(total_pages));
    }
    items
}

/// The pagination control under a result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub items: Vec<PageItem>,
}

impl Pagination {
    /// `None` when everything fits on one page and no control is shown.
    pub fn new(current_page: u32, total_count: u64, per_page: u32) -> Option<Self> {
        let total_pages = total_pages(total_count, per_page, MAX_RESULTS);
        if total_pages <= 1 {
            return None;
        }
        Some(Self {
            current_page,
            total_pages,
            items: page_window(current_page, total_pages),
        })
    }

    /// Page before the current one. Past the last page this is the last page.
    pub fn previous(&self) -> Option<u32> {
        (self.current_page > 1).then(|| (self.current_page - 1).min(self.total_pages))
    }

    pub fn next(&self) -> Option<u32> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }

    pub fn is_current(&self, page: u32) -> bool {
        page == self.current_page
    }
}
