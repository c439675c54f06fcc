//! Query-string parameters of the list pages.

use crate::domain::list::{ListQuery, PER_PAGE_OPTIONS};
use crate::list::filters::{FilterSpec, FilterState};

const RESERVED: [&str; 3] = ["page", "per_page", "search"];

/// Parsed `?page=&per_page=&search=&<filter>=` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub query: ListQuery,
    pub filters: FilterState,
}

impl ListParams {
    /// Parses a raw query string. Malformed or out-of-range values fall back
    /// to defaults instead of failing the page.
    pub fn parse(raw: &str, specs: &'static [FilterSpec], default_per_page: usize) -> Self {
        let pairs = serde_html_form::from_str::<Vec<(String, String)>>(raw).unwrap_or_else(|err| {
            log::warn!("Ignoring malformed list parameters {raw:?}: {err}");
            Vec::new()
        });

        let value = |name: &str| {
            pairs
                .iter()
                .rev()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        };

        let page = value("page")
            .and_then(|page| page.trim().parse::<usize>().ok())
            .unwrap_or(1);
        let per_page = value("per_page")
            .and_then(|n| n.trim().parse::<usize>().ok())
            .filter(|n| PER_PAGE_OPTIONS.contains(n))
            .unwrap_or(default_per_page);

        let filters = FilterState::from_pairs(
            specs,
            pairs
                .iter()
                .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
                .map(|(key, value)| (key.as_str(), value.as_str())),
        );

        let query = ListQuery::new(per_page)
            .with_search(value("search"))
            .with_filters(filters.to_query())
            .with_page(page);

        Self { query, filters }
    }
}

/// Query string pointing at `page` of the same list.
pub fn page_href(query: &ListQuery, page: usize) -> String {
    let pairs = query.with_page(page).to_pairs();
    match serde_html_form::to_string(&pairs) {
        Ok(encoded) => format!("?{encoded}"),
        Err(err) => {
            log::warn!("Failed to encode list parameters: {err}");
            format!("?page={page}")
        }
    }
}
