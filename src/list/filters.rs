use std::collections::BTreeMap;

use serde::Serialize;

/// Value meaning "do not filter". Never sent to the backend.
pub const ANY: &str = "all";

/// One dropdown offered by a list screen.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct FilterSpec {
    pub key: &'static str,
    pub label: &'static str,
    /// `(value, label)` pairs, not including the "all" sentinel. Empty for
    /// free-text filters such as region.
    pub options: &'static [(&'static str, &'static str)],
}

impl FilterSpec {
    pub fn accepts(&self, value: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|(option, _)| *option == value)
    }

    pub fn is_free_text(&self) -> bool {
        self.options.is_empty()
    }
}

/// Selected value of every filter on a screen.
///
/// Unknown keys and values outside a filter's options are ignored so a
/// hand-edited URL cannot smuggle arbitrary parameters to the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    specs: &'static [FilterSpec],
    selected: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new(specs: &'static [FilterSpec]) -> Self {
        Self {
            specs,
            selected: BTreeMap::new(),
        }
    }

    pub fn specs(&self) -> &'static [FilterSpec] {
        self.specs
    }

    /// Selects `value` for `key`. Returns whether the outgoing filters changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let Some(spec) = self.specs.iter().find(|spec| spec.key == key) else {
            return false;
        };

        let value = value.trim();
        if value.is_empty() || value == ANY || !spec.accepts(value) {
            return self.selected.remove(key).is_some();
        }

        match self.selected.insert(key.to_string(), value.to_string()) {
            Some(previous) => previous != value,
            None => true,
        }
    }

    pub fn reset(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Selected value, or the "all" sentinel.
    pub fn selected(&self, key: &str) -> &str {
        self.selected.get(key).map(String::as_str).unwrap_or(ANY)
    }

    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Filters to send; every entry must match (logical AND).
    pub fn to_query(&self) -> BTreeMap<String, String> {
        self.selected.clone()
    }

    /// Applies every `(key, value)` pair that names a known filter.
    pub fn from_pairs<'a>(
        specs: &'static [FilterSpec],
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let mut state = Self::new(specs);
        for (key, value) in pairs {
            state.set(key, value);
        }
        state
    }
}
