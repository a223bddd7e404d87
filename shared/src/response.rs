//! API response envelopes
//!
//! List endpoints answer with a paginated envelope:
//! ```json
//! { "count": 42, "next": "...", "previous": null, "results": [ ... ] }
//! ```
//! A few endpoints (tables, table orders) answer with a bare JSON array.
//! [`ListResponse`] accepts both and normalizes into [`Page`].

use serde::{Deserialize, Serialize};

/// Paginated `{results, count}` envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Total number of items across all pages
    #[serde(default)]
    pub count: u64,
    /// Link to the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Link to the previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// Wrap a complete, unpaginated list
    pub fn from_vec(results: Vec<T>) -> Self {
        Self {
            count: results.len() as u64,
            results,
            next: None,
            previous: None,
        }
    }

    /// Whether there is a next page
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Whether there is a previous page
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    /// Pagination metadata for a given page request
    pub fn pagination(&self, request: PageRequest) -> Pagination {
        Pagination::new(request.page, request.limit, self.count)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

/// Either a paginated envelope or a bare array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    /// `{results, count, ...}`
    Paged(Page<T>),
    /// `[ ... ]`
    Plain(Vec<T>),
}

impl<T> From<ListResponse<T>> for Page<T> {
    fn from(value: ListResponse<T>) -> Self {
        match value {
            ListResponse::Paged(page) => page,
            ListResponse::Plain(items) => Page::from_vec(items),
        }
    }
}

impl<T> ListResponse<T> {
    /// Flatten into a plain list
    pub fn into_vec(self) -> Vec<T> {
        Page::from(self).results
    }
}

/// Page request (1-based page number, page size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Request for the following page
    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    /// Request for the preceding page (stays on page 1)
    pub fn previous(self) -> Self {
        Self {
            page: self.page.saturating_sub(1).max(1),
            ..self
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl Pagination {
    /// Create a new pagination
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page as u64) as u32
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Whether `page` is the last page
    pub fn is_last(&self) -> bool {
        self.page >= self.total_pages
    }
}
