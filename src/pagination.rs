//! Paging primitives shared by the JSON API and the dashboard.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;
pub const MAX_ITEMS_PER_PAGE: usize = 100;

/// `page` / `per_page` as they arrive in a query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageParams {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    /// One-based page number; `0` and missing both mean the first page.
    pub fn page(&self) -> usize {
        self.page.filter(|page| *page > 0).unwrap_or(1)
    }

    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .clamp(1, MAX_ITEMS_PER_PAGE)
    }

    /// Rows to skip; saturates instead of overflowing for absurd pages.
    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

/// Paging block of an API list response.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub has_more: bool,
}

impl PageInfo {
    pub fn new(params: PageParams, returned: usize, total: usize) -> Self {
        Self {
            page: params.page(),
            per_page: params.per_page(),
            total,
            has_more: params.offset().saturating_add(returned) < total,
        }
    }
}

/// `{ items, pagination }` body returned by every paginated endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Listing<T> {
    pub fn new(items: Vec<T>, params: PageParams, total: usize) -> Self {
        let pagination = PageInfo::new(params, items.len(), total);
        Self { items, pagination }
    }

    pub fn map<U, F>(self, f: F) -> Listing<U>
    where
        F: FnMut(T) -> U,
    {
        Listing {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Page number links around the current page; `None` renders as an ellipsis.
fn page_links(total_pages: usize, current: usize) -> Vec<Option<usize>> {
    const EDGE: usize = 2;
    const BEFORE: usize = 2;
    const AFTER: usize = 4;

    if total_pages == 0 {
        return vec![];
    }
    let current = current.min(total_pages);

    let mut links = Vec::new();

    let head_end = (1 + EDGE).min(total_pages + 1);
    links.extend((1..head_end).map(Some));

    let window_start = head_end.max(current.saturating_sub(BEFORE));
    let window_end = current.saturating_add(AFTER + 1).min(total_pages + 1);
    if window_start > head_end {
        links.push(None);
    }
    links.extend((window_start..window_end).map(Some));

    let tail_start = window_end.max(total_pages.saturating_sub(EDGE) + 1);
    if tail_start > window_end {
        links.push(None);
    }
    links.extend((tail_start..=total_pages).map(Some));

    links
}

/// A page of items with the links the dashboard pager renders.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, params: PageParams, total: usize) -> Self {
        let page = params.page();
        let total_pages = total.div_ceil(params.per_page());
        Self {
            items,
            pages: page_links(total_pages, page),
            page,
            total,
        }
    }
}

impl<T> From<Listing<T>> for Paginated<T> {
    fn from(listing: Listing<T>) -> Self {
        let params = PageParams::new(listing.pagination.page, listing.pagination.per_page);
        Self::new(listing.items, params, listing.pagination.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_and_clamp() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_ITEMS_PER_PAGE);

        let params = PageParams::new(0, 1000);
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), MAX_ITEMS_PER_PAGE);

        let params = PageParams::new(3, 0);
        assert_eq!(params.per_page(), 1);
        assert_eq!(params.offset(), 2);
    }

    #[test]
    fn has_more_at_page_boundaries() {
        // 40 rows, 20 per page.
        let first = PageInfo::new(PageParams::new(1, 20), 20, 40);
        let last = PageInfo::new(PageParams::new(2, 20), 20, 40);
        let partial = PageInfo::new(PageParams::new(2, 20), 5, 25);
        let past_end = PageInfo::new(PageParams::new(5, 20), 0, 25);

        assert!(first.has_more);
        assert!(!last.has_more);
        assert!(!partial.has_more);
        assert!(!past_end.has_more);
    }

    #[test]
    fn page_info_serializes_camel_case() {
        let info = PageInfo::new(PageParams::new(1, 10), 10, 11);
        let json = serde_json::to_value(info).unwrap();

        assert_eq!(json["perPage"], 10);
        assert_eq!(json["hasMore"], true);
    }

    #[test]
    fn huge_page_saturates() {
        let params = PageParams::new(usize::MAX, 20);
        assert_eq!(params.offset(), usize::MAX);

        let info = PageInfo::new(params, 0, 25);
        assert_eq!(info.page, usize::MAX);
        assert!(!info.has_more);

        let paginated = Paginated::new(Vec::<i32>::new(), params, 25);
        assert_eq!(paginated.pages, vec![Some(1), Some(2)]);
    }

    #[test]
    fn page_links_collapse_long_ranges() {
        assert!(page_links(0, 1).is_empty());
        assert_eq!(page_links(3, 1), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(
            page_links(20, 10),
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(19),
                Some(20),
            ]
        );
    }
}
