//! Paging, search and sort state for the dossier listing.

#[cfg(test)]
#[path = "listing_test.rs"]
mod listing_test;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SORT_COLUMN: &str = "createdAt";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Query for `GET /api/dossiers`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub sort_by: String,
    pub order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort_by: DEFAULT_SORT_COLUMN.to_owned(),
            order: SortOrder::Desc,
        }
    }
}

impl ListQuery {
    /// Pairs in wire order; the search term is omitted when blank.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("pageSize", self.page_size.to_string())];
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_owned()));
        }
        pairs.push(("sortBy", self.sort_by.clone()));
        pairs.push(("order", self.order.as_str().to_owned()));
        pairs
    }

    /// Percent-encoded query string, without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={}", encode_component(&v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// New search term; always returns to the first page.
    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_owned();
        self.page = 1;
    }

    /// Sort by `column`, flipping direction when it is already the sort column.
    pub fn toggle_sort(&mut self, column: &str) {
        if self.sort_by == column {
            self.order = self.order.flipped();
        } else {
            self.sort_by = column.to_owned();
            self.order = SortOrder::Asc;
        }
        self.page = 1;
    }

    pub fn next_page(&mut self, total_pages: u32) {
        self.page = (self.page + 1).min(total_pages.max(1));
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
