//! Remote query layer: an injectable, deduplicating cache of list fetches.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::entity::EntityKind;
use crate::domain::list::{ListQuery, ListResponse};
use crate::gateway::errors::ApiError;

pub mod cache;

pub use cache::QueryCache;

/// Identity of one cached list: the entity plus the serialized query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub kind: EntityKind,
    pub query: String,
}

impl CacheKey {
    pub fn new(kind: EntityKind, query: &ListQuery) -> Self {
        Self {
            kind,
            query: query.cache_key(),
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}?{}", self.kind, self.query)
    }
}

/// Notifications published to cache subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fetch for the key finished (successfully or not).
    Updated(CacheKey),
    /// Every entry of the entity was marked stale after a mutation.
    Invalidated(EntityKind),
}

/// What a screen knows about one list query at a given moment.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<Arc<ListResponse<T>>>,
    /// First fetch for the key is in flight and there is nothing to show yet.
    pub is_loading: bool,
    /// Any fetch for the key is in flight, including background refetches.
    pub is_fetching: bool,
    pub error: Option<ApiError>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_fetching: false,
            error: None,
        }
    }
}

impl<T> QueryState<T> {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl QueryState<Value> {
    /// Decodes cached JSON items into the screen's entity type. A decode
    /// failure is reported through the error flag like any other failure.
    pub fn decode<T: DeserializeOwned>(&self) -> QueryState<T> {
        let (data, error) = match self.data.as_ref().map(|data| data.decode::<T>()) {
            Some(Ok(decoded)) => (Some(Arc::new(decoded)), self.error.clone()),
            Some(Err(err)) => (None, Some(ApiError::from(err))),
            None => (None, self.error.clone()),
        };

        QueryState {
            data,
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
            error,
        }
    }
}
