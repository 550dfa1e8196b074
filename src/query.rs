//! List query parameters for `GET /books`.

use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Author,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: usize,
    pub page_size: usize,
    pub sort: SortField,
    pub order: SortOrder,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: SortField::Title,
            order: SortOrder::Asc,
            title: None,
            author: None,
        }
    }
}

impl ListParams {
    /// Saturates, so a page far past the end yields an empty slice.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Raw query string. Every field is kept as text so a bad number falls back
/// to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
}

impl From<ListQuery> for ListParams {
    fn from(q: ListQuery) -> Self {
        let page = q
            .page
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let page_size = q
            .page_size
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|s| (1..=MAX_PAGE_SIZE).contains(s))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        // unknown columns sort by title
        let sort = match q.sort.as_deref() {
            Some("id") => SortField::Id,
            Some("author") => SortField::Author,
            _ => SortField::Title,
        };

        let order = match q.order.as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };

        Self {
            page,
            page_size,
            sort,
            order,
            title: q.title.filter(|t| !t.is_empty()),
            author: q.author.filter(|a| !a.is_empty()),
        }
    }
}
