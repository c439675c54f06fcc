//! Query and response values shared by every paginated list screen.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PER_PAGE: usize = 20;
pub const PER_PAGE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Parameters of one list fetch.
///
/// The value is immutable: every builder returns a new query. Changing the
/// page size, the search term or any filter moves back to the first page so
/// the user never lands on a page that no longer exists.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash)]
pub struct ListQuery {
    page: usize,
    per_page: usize,
    search: Option<String>,
    filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl ListQuery {
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: if per_page == 0 { DEFAULT_PER_PAGE } else { per_page },
            search: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// True when a search term or any filter narrows the result set.
    pub fn is_narrowed(&self) -> bool {
        self.search.is_some() || !self.filters.is_empty()
    }

    #[must_use]
    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_per_page(&self, per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: if per_page == 0 { self.per_page } else { per_page },
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_search(&self, search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            page: 1,
            search,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_filters(&self, filters: BTreeMap<String, String>) -> Self {
        Self {
            page: 1,
            filters,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_filter(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut filters = self.filters.clone();
        filters.insert(key.into(), value.into());
        self.with_filters(filters)
    }

    #[must_use]
    pub fn without_filter(&self, key: &str) -> Self {
        let mut filters = self.filters.clone();
        filters.remove(key);
        self.with_filters(filters)
    }

    /// Deterministic serialization used as the cache key.
    pub fn cache_key(&self) -> String {
        let mut key = format!("page={}&per_page={}", self.page, self.per_page);
        if let Some(search) = &self.search {
            key.push_str("&search=");
            key.push_str(&escape_key_part(search));
        }
        for (name, value) in &self.filters {
            key.push('&');
            key.push_str(&escape_key_part(name));
            key.push('=');
            key.push_str(&escape_key_part(value));
        }
        key
    }

    /// Query string pairs understood by the LMS REST API.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.clone()));
        }
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }
}

/// One page of a remote list, normalized from whatever envelope the
/// backend used.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl<T> ListResponse<T> {
    /// Builds a response deriving `total_pages` from the item count.
    pub fn new(items: Vec<T>, total_items: usize, current_page: usize, per_page: usize) -> Self {
        Self {
            items,
            total_items,
            total_pages: total_pages(total_items, per_page),
            current_page: current_page.max(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResponse<U> {
        ListResponse {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}

impl ListResponse<Value> {
    /// Converts loosely typed items into domain entities.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<ListResponse<T>, serde_json::Error> {
        let items = self
            .items
            .iter()
            .cloned()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        Ok(ListResponse {
            items,
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page,
        })
    }
}

fn escape_key_part(part: &str) -> String {
    part.replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}

/// `ceil(total_items / per_page)`, zero when there is nothing to show.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total_items.div_ceil(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_changes_reset_page() {
        let query = ListQuery::new(20).with_page(4);
        assert_eq!(query.page(), 4);

        assert_eq!(query.with_per_page(50).page(), 1);
        assert_eq!(query.with_search(Some("ada")).page(), 1);
        assert_eq!(query.with_filter("role", "learner").page(), 1);
        assert_eq!(
            query.with_filter("role", "learner").with_page(3).without_filter("role").page(),
            1
        );
    }

    #[test]
    fn blank_search_means_no_filter() {
        let query = ListQuery::default().with_search(Some("   "));
        assert_eq!(query.search(), None);
        assert!(!query.is_narrowed());
    }

    #[test]
    fn cache_key_ignores_filter_insertion_order() {
        let a = ListQuery::default()
            .with_filter("status", "active")
            .with_filter("role", "manager");
        let b = ListQuery::default()
            .with_filter("role", "manager")
            .with_filter("status", "active");
        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(
            a.cache_key(),
            "page=1&per_page=20&role=manager&status=active"
        );
    }

    #[test]
    fn cache_key_escapes_separators() {
        let tricky = ListQuery::default().with_search(Some("a&role=admin"));
        let plain = ListQuery::default()
            .with_search(Some("a"))
            .with_filter("role", "admin");
        assert_ne!(tricky.cache_key(), plain.cache_key());
    }

    #[test]
    fn total_pages_is_derived_when_missing() {
        let response: ListResponse<u8> = ListResponse::new(vec![1, 2], 41, 1, 20);
        assert_eq!(response.total_pages, 3);
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(40, 20), 2);
    }

    #[test]
    fn zero_page_is_clamped() {
        assert_eq!(ListQuery::default().with_page(0).page(), 1);
        assert_eq!(ListQuery::new(0).per_page(), DEFAULT_PER_PAGE);
    }
}
