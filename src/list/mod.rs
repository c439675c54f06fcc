//! The reusable remote-backed paginated list.
//!
//! Every screen is a [`crate::screens::Screen`] plugged into the same pieces:
//! a search [`debounce::Debouncer`], [`filters::FilterState`], the shared
//! [`crate::query::QueryCache`], the [`view::ListView`] renderer, the pager
//! and the [`actions::RowActionDispatcher`].

use std::time::Duration;

use serde::Deserialize;

use crate::domain::list::DEFAULT_PER_PAGE;

pub mod actions;
pub mod controller;
pub mod debounce;
pub mod filters;
pub mod view;

/// Tunables shared by every list screen.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListSettings {
    pub default_per_page: usize,
    pub debounce_ms: u64,
    pub cache_ttl_secs: u64,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            debounce_ms: debounce::DEFAULT_DEBOUNCE.as_millis() as u64,
            cache_ttl_secs: crate::query::cache::DEFAULT_TTL.as_secs(),
        }
    }
}

impl ListSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
