//! Pagination parameters and the paginated wire envelope.

use serde::{Deserialize, Serialize};

use crate::config;

/// Raw ?page=&limit= query parameters as they arrive.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Clamp against the configured page-size bounds.
    pub fn resolve(self) -> PageParams {
        let api = &config::config().api;
        clamp(self.page, self.limit, api.default_page_size, api.max_page_size)
    }
}

fn clamp(page: Option<i64>, limit: Option<i64>, default_limit: i64, max_limit: i64) -> PageParams {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(default_limit).clamp(1, max_limit);
    PageParams { page, limit }
}

/// Validated pagination window (1-based page).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    pub fn offset(self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(total: i64, params: PageParams) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + params.limit - 1) / params.limit
        };
        Self {
            total,
            current_page: params.page,
            total_pages,
            has_more: params.page < total_pages,
        }
    }
}

/// List payload shape: { data: [...], pagination: {...} }
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Wrap a page of rows fetched with LIMIT/OFFSET plus the total count.
    pub fn new(data: Vec<T>, total: i64, params: PageParams) -> Self {
        Self {
            data,
            pagination: Pagination::new(total, params),
        }
    }

    /// Paginate an in-memory collection (used where filtering happens
    /// in-process over small sets).
    pub fn slice(items: Vec<T>, params: PageParams) -> Self {
        let total = items.len() as i64;
        let data = items
            .into_iter()
            .skip(params.offset() as usize)
            .take(params.limit as usize)
            .collect();
        Self::new(data, total, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page_and_limit() {
        assert_eq!(clamp(None, None, 10, 100), PageParams { page: 1, limit: 10 });
        assert_eq!(clamp(Some(0), Some(0), 10, 100), PageParams { page: 1, limit: 1 });
        assert_eq!(
            clamp(Some(-3), Some(500), 10, 100),
            PageParams { page: 1, limit: 100 }
        );
        assert_eq!(
            clamp(Some(4), Some(25), 10, 100),
            PageParams { page: 4, limit: 25 }
        );
    }

    #[test]
    fn pagination_math() {
        let p = Pagination::new(0, PageParams { page: 1, limit: 10 });
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_more);

        let p = Pagination::new(25, PageParams { page: 1, limit: 10 });
        assert_eq!(p.total_pages, 3);
        assert!(p.has_more);

        let p = Pagination::new(25, PageParams { page: 3, limit: 10 });
        assert!(!p.has_more);

        let p = Pagination::new(30, PageParams { page: 3, limit: 10 });
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_more);
    }

    #[test]
    fn slice_paginates_in_memory() {
        let items: Vec<i32> = (1..=25).collect();
        let page = Paginated::slice(items, PageParams { page: 3, limit: 10 });
        assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.pagination.total, 25);
        assert_eq!(page.pagination.current_page, 3);
        assert!(!page.pagination.has_more);

        let past_end = Paginated::slice(vec![1, 2, 3], PageParams { page: 5, limit: 10 });
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.pagination.total, 3);
    }
}
