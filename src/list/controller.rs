//! One screen's list state: query, filters, search and the rows on display.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;

use crate::domain::list::ListQuery;
use crate::gateway::SharedGateway;
use crate::list::ListSettings;
use crate::list::debounce::Debouncer;
use crate::list::filters::FilterState;
use crate::list::view::ListView;
use crate::pagination::Pager;
use crate::query::cache::FetchResult;
use crate::query::{CacheKey, QueryCache, QueryState};
use crate::screens::Screen;

/// Handle for one issued fetch. Only the most recently issued ticket may
/// update the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: ListQuery,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn key<S: Screen>(&self) -> CacheKey {
        CacheKey::new(S::KIND, &self.query)
    }
}

/// Composes debounced search, filters, the query cache and the page view for
/// a single screen.
///
/// Overlapping fetches are allowed. Each [`ListController::begin_load`]
/// issues a new sequence number and [`ListController::complete`] drops any
/// result that does not belong to the latest one, so a slow response for an
/// old query can never overwrite a newer page. Rows of the previous query
/// stay on display (dimmed) until the new page arrives.
pub struct ListController<S: Screen> {
    gateway: SharedGateway,
    cache: QueryCache,
    query: ListQuery,
    filters: FilterState,
    debouncer: Debouncer,
    issued: u64,
    state: QueryState<S::Item>,
    disposed: bool,
    _screen: PhantomData<S>,
}

impl<S: Screen> ListController<S> {
    pub fn new(gateway: SharedGateway, cache: QueryCache, settings: &ListSettings) -> Self {
        Self {
            gateway,
            cache,
            query: ListQuery::new(settings.default_per_page),
            filters: FilterState::new(S::FILTERS),
            debouncer: Debouncer::new(settings.debounce(), ""),
            issued: 0,
            state: QueryState::default(),
            disposed: false,
            _screen: PhantomData,
        }
    }

    /// Starts from a query restored from a URL instead of the defaults.
    pub fn restore(&mut self, query: ListQuery, filters: FilterState) {
        self.debouncer = Debouncer::new(self.debouncer.window(), query.search().unwrap_or_default());
        self.query = query;
        self.filters = filters;
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn state(&self) -> &QueryState<S::Item> {
        &self.state
    }

    pub fn set_page(&mut self, page: usize) -> bool {
        self.replace_query(self.query.with_page(page))
    }

    pub fn set_per_page(&mut self, per_page: usize) -> bool {
        self.replace_query(self.query.with_per_page(per_page))
    }

    pub fn set_filter(&mut self, key: &str, value: &str) -> bool {
        if !self.filters.set(key, value) {
            return false;
        }
        self.replace_query(self.query.with_filters(self.filters.to_query()))
    }

    pub fn reset_filters(&mut self) -> bool {
        if !self.filters.reset() {
            return false;
        }
        self.replace_query(self.query.with_filters(self.filters.to_query()))
    }

    /// Feeds a keystroke to the search debouncer.
    pub fn input_search(&mut self, text: &str) {
        if !self.disposed {
            self.debouncer.input(text);
        }
    }

    /// Applies a search term committed by the debouncer since the last poll.
    pub fn poll_search(&mut self) -> bool {
        match self.debouncer.take_committed() {
            Some(term) => self.commit_search(&term),
            None => false,
        }
    }

    /// Waits until the debouncer commits a term and applies it.
    pub async fn next_search(&mut self) -> bool {
        match self.debouncer.changed().await {
            Some(term) => self.commit_search(&term),
            None => false,
        }
    }

    /// Applies `term` immediately. Any change returns to the first page.
    pub fn commit_search(&mut self, term: &str) -> bool {
        let next = self.query.with_search(Some(term));
        if next.search() == self.query.search() {
            return false;
        }
        self.replace_query(next)
    }

    fn replace_query(&mut self, next: ListQuery) -> bool {
        if next == self.query {
            return false;
        }
        debug!("{} query changed to {}", S::KIND, next.cache_key());
        self.query = next;
        true
    }

    /// Issues a ticket for the current query and marks the view as fetching.
    pub fn begin_load(&mut self) -> FetchTicket {
        self.issued += 1;
        self.state.is_fetching = true;
        self.state.is_loading = self.state.data.is_none();
        FetchTicket {
            seq: self.issued,
            query: self.query.clone(),
        }
    }

    /// Future fetching the ticket's page through the cache. It borrows
    /// nothing from the controller, so several may be in flight at once.
    pub fn fetch(&self, ticket: &FetchTicket) -> impl Future<Output = FetchResult> + Send + use<S> {
        let cache = self.cache.clone();
        let gateway = Arc::clone(&self.gateway);
        let query = ticket.query.clone();
        async move {
            cache
                .fetch(S::KIND, &query, {
                    let query = query.clone();
                    move || async move { gateway.list(S::KIND, &query).await }
                })
                .await
        }
    }

    /// Applies a finished fetch. Returns `false` when the result was
    /// discarded because a newer ticket exists or the controller was disposed.
    pub fn complete(&mut self, ticket: FetchTicket, result: FetchResult) -> bool {
        if self.disposed {
            debug!("Ignoring {} fetch #{} after dispose", S::KIND, ticket.seq);
            return false;
        }
        if ticket.seq != self.issued {
            debug!(
                "Discarding stale {} fetch #{} (latest is #{})",
                S::KIND,
                ticket.seq,
                self.issued
            );
            return false;
        }

        self.state.is_loading = false;
        self.state.is_fetching = false;
        match result.map(|data| data.decode::<S::Item>()) {
            Ok(Ok(data)) => {
                self.state.data = Some(Arc::new(data));
                self.state.error = None;
            }
            Ok(Err(err)) => self.state.error = Some(err.into()),
            Err(err) => self.state.error = Some(err),
        }
        true
    }

    /// Loads the current query and applies the result.
    pub async fn reload(&mut self) -> bool {
        let ticket = self.begin_load();
        let result = self.fetch(&ticket).await;
        self.complete(ticket, result)
    }

    /// Moves to the last page when the loaded page lies past it, which
    /// happens once rows are deleted from the end of a list. Returns `true`
    /// when the query changed and needs another load.
    pub fn clamp_to_last_page(&mut self) -> bool {
        let last = match &self.state.data {
            Some(data) if data.items.is_empty() && data.total_pages > 0 => data.total_pages,
            _ => return false,
        };
        if self.query.page() <= last {
            return false;
        }
        debug!("{} page {} is past the last page {last}", S::KIND, self.query.page());
        self.replace_query(self.query.with_page(last))
    }

    /// Current view and pager.
    pub fn view(&self) -> (ListView<S::Item>, Pager) {
        let view = ListView::derive(&self.state, self.query.is_narrowed(), S::COLUMNS.len());
        let pager = match &self.state.data {
            Some(data) => Pager::new(data.current_page, data.total_pages),
            None => Pager::new(self.query.page(), 0),
        };
        (view, pager)
    }

    /// Stops the search timer. Later completions become no-ops. Dropping the
    /// controller has the same effect on the timer.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.debouncer.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
