//! Loading list pages and exporting whole lists.

use serde::Serialize;

use crate::domain::entity::EntityKind;
use crate::domain::list::ListQuery;
use crate::forms::list::{ListParams, page_href};
use crate::gateway::SharedGateway;
use crate::list::ListSettings;
use crate::list::controller::ListController;
use crate::list::filters::{FilterSpec, FilterState};
use crate::list::view::ListView;
use crate::pagination::{PageItem, Pager};
use crate::query::QueryCache;
use crate::screens::{Row, Screen};
use crate::services::{ServiceError, ServiceResult};

/// Byte order mark written at the start of every CSV export so spreadsheet
/// tools detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const EXPORT_PER_PAGE: usize = 100;
/// Upper bound on pages read for one export.
const EXPORT_MAX_PAGES: usize = 500;

/// One selectable filter as rendered in the toolbar.
#[derive(Debug, Serialize)]
pub struct FilterView {
    pub spec: FilterSpec,
    pub selected: String,
}

/// Page link with its query string.
#[derive(Debug, Serialize)]
pub struct PageLink {
    pub item: PageItem,
    pub href: Option<String>,
    pub current: bool,
}

/// Everything the list template and the JSON endpoint render.
#[derive(Debug, Serialize)]
pub struct ListPageData {
    pub kind: EntityKind,
    pub slug: &'static str,
    pub title: &'static str,
    pub editable: bool,
    pub columns: &'static [&'static str],
    pub view: ListView<Row>,
    /// Copy for the empty state, set only when the view is empty.
    pub empty_message: Option<String>,
    pub pager: Pager,
    pub links: Vec<PageLink>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub search: Option<String>,
    pub per_page: usize,
    pub filters: Vec<FilterView>,
    /// Query string of the page actually shown, without the leading `?`.
    pub query_string: String,
}

fn filter_views(filters: &FilterState) -> Vec<FilterView> {
    filters
        .specs()
        .iter()
        .map(|spec| FilterView {
            spec: *spec,
            selected: filters.selected(spec.key).to_string(),
        })
        .collect()
}

fn page_links(query: &ListQuery, pager: &Pager) -> Vec<PageLink> {
    pager
        .pages
        .iter()
        .map(|item| match item {
            PageItem::Page(page) => PageLink {
                item: *item,
                href: Some(page_href(query, *page)),
                current: *page == pager.page,
            },
            PageItem::Ellipsis => PageLink {
                item: *item,
                href: None,
                current: false,
            },
        })
        .collect()
}

/// Loads one list page through the cache.
pub async fn load_list_page<S: Screen>(
    gateway: SharedGateway,
    cache: QueryCache,
    settings: &ListSettings,
    raw_query: &str,
) -> ServiceResult<ListPageData> {
    let params = ListParams::parse(raw_query, S::FILTERS, settings.default_per_page);

    let mut controller = ListController::<S>::new(gateway, cache, settings);
    controller.restore(params.query, params.filters);
    controller.reload().await;
    if controller.clamp_to_last_page() {
        controller.reload().await;
    }

    let (view, pager) = controller.view();
    if let ListView::Error { message } = &view {
        log::error!("Failed to load {}: {message}", S::KIND);
    }

    let view = view.map(|item| S::row(&item));
    let empty_message = match &view {
        ListView::Empty { reason } => Some(reason.message(S::KIND.plural())),
        _ => None,
    };
    let query = controller.query();

    Ok(ListPageData {
        kind: S::KIND,
        slug: S::KIND.slug(),
        title: S::KIND.title(),
        editable: S::KIND.is_mutable(),
        columns: S::COLUMNS,
        view,
        empty_message,
        links: page_links(query, &pager),
        prev_href: pager.prev_page().map(|page| page_href(query, page)),
        next_href: pager.next_page().map(|page| page_href(query, page)),
        pager,
        search: query.search().map(str::to_string),
        per_page: query.per_page(),
        filters: filter_views(controller.filters()),
        query_string: page_href(query, query.page())
            .trim_start_matches('?')
            .to_string(),
    })
}

/// Serializes every row matching the search and filters of `raw_query` as
/// CSV, starting with a UTF-8 byte order mark.
pub async fn export_csv<S: Screen>(
    gateway: SharedGateway,
    cache: QueryCache,
    raw_query: &str,
) -> ServiceResult<Vec<u8>> {
    let params = ListParams::parse(raw_query, S::FILTERS, EXPORT_PER_PAGE);
    let base = params.query.with_per_page(EXPORT_PER_PAGE);

    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(S::COLUMNS).map_err(|err| {
        log::error!("Failed to write CSV header: {err}");
        ServiceError::Internal
    })?;

    let mut page = 1;
    loop {
        let query = base.with_page(page);
        let response = cache
            .fetch(S::KIND, &query, {
                let gateway = gateway.clone();
                let query = query.clone();
                move || async move { gateway.list(S::KIND, &query).await }
            })
            .await
            .map_err(|err| {
                log::error!("Failed to export {} page {page}: {err}", S::KIND);
                ServiceError::from(err)
            })?;
        let items = response.decode::<S::Item>().map_err(|err| {
            log::error!("Failed to decode {} for export: {err}", S::KIND);
            ServiceError::Internal
        })?;

        for item in &items.items {
            writer.write_record(S::row_cells(item)).map_err(|err| {
                log::error!("Failed to write CSV row: {err}");
                ServiceError::Internal
            })?;
        }

        if items.items.is_empty() || page >= items.total_pages || page >= EXPORT_MAX_PAGES {
            break;
        }
        page += 1;
    }

    writer.into_inner().map_err(|err| {
        log::error!("Failed to flush CSV export: {err}");
        ServiceError::Internal
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::{Value, json};

    use super::*;
    use crate::domain::list::ListResponse;
    use crate::gateway::errors::ApiError;
    use crate::gateway::mock::MockGateway;
    use crate::list::view::EmptyReason;
    use crate::screens::courses::CoursesScreen;
    use crate::screens::users::UsersScreen;

    fn user(id: i64, name: &str) -> Value {
        json!({"id": id, "name": name, "email": format!("{id}@example.com"), "role": "subscriber"})
    }

    #[tokio::test]
    async fn list_page_carries_rows_and_links() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list()
            .withf(|kind, query| {
                *kind == EntityKind::Users && query.page() == 2 && query.search() == Some("ad")
            })
            .times(1)
            .returning(|_, _| Ok(ListResponse::new(vec![user(21, "Ada")], 100, 2, 20)));

        let data = load_list_page::<UsersScreen>(
            Arc::new(gateway),
            QueryCache::default(),
            &ListSettings::default(),
            "page=2&search=ad",
        )
        .await
        .unwrap();

        assert_eq!(data.view.items()[0].id, 21);
        assert_eq!(data.pager.total_pages, 5);
        assert_eq!(data.prev_href.as_deref(), Some("?page=1&per_page=20&search=ad"));
        assert!(data.links.iter().any(|link| link.current && link.item == PageItem::Page(2)));
        assert_eq!(data.search.as_deref(), Some("ad"));
    }

    #[tokio::test]
    async fn empty_copy_depends_on_search() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list()
            .returning(|_, _| Ok(ListResponse::new(Vec::new(), 0, 1, 20)));
        let gateway: SharedGateway = Arc::new(gateway);
        let cache = QueryCache::default();
        let settings = ListSettings::default();

        let searched =
            load_list_page::<CoursesScreen>(gateway.clone(), cache.clone(), &settings, "search=zzz")
                .await
                .unwrap();
        assert_eq!(
            searched.view,
            ListView::Empty {
                reason: EmptyReason::NoMatches
            }
        );
        assert_eq!(
            searched.empty_message.as_deref(),
            Some("No courses match the current search or filters.")
        );

        let plain = load_list_page::<CoursesScreen>(gateway, cache, &settings, "")
            .await
            .unwrap();
        assert_eq!(plain.empty_message.as_deref(), Some("No courses exist yet."));
    }

    #[tokio::test]
    async fn backend_failures_render_the_error_state() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list()
            .returning(|_, _| Err(ApiError::Transport("connection refused".to_string())));

        let data = load_list_page::<UsersScreen>(
            Arc::new(gateway),
            QueryCache::default(),
            &ListSettings::default(),
            "",
        )
        .await
        .unwrap();

        assert!(matches!(data.view, ListView::Error { .. }));
        assert!(data.view.items().is_empty());
    }

    #[tokio::test]
    async fn a_page_past_the_end_shows_the_last_page() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_list()
            .withf(|_, query| query.page() == 2)
            .times(1)
            .returning(|_, _| Ok(ListResponse::new(Vec::new(), 20, 2, 20)));
        gateway
            .expect_list()
            .withf(|_, query| query.page() == 1)
            .times(1)
            .returning(|_, _| Ok(ListResponse::new(vec![user(1, "Ada")], 20, 1, 20)));

        let data = load_list_page::<UsersScreen>(
            Arc::new(gateway),
            QueryCache::default(),
            &ListSettings::default(),
            "page=2",
        )
        .await
        .unwrap();

        assert_eq!(data.view.items().len(), 1);
        assert_eq!(data.pager.page, 1);
        assert!(!data.pager.has_prev);
        assert_eq!(data.query_string, "page=1&per_page=20");
    }

    #[tokio::test]
    async fn unknown_statuses_still_render_the_page() {
        let mut gateway = MockGateway::new();
        gateway.expect_list().returning(|_, _| {
            Ok(ListResponse::new(
                vec![json!({
                    "id": 1,
                    "name": "Ada",
                    "email": "ada@example.com",
                    "status": "suspended"
                })],
                1,
                1,
                20,
            ))
        });

        let data = load_list_page::<UsersScreen>(
            Arc::new(gateway),
            QueryCache::default(),
            &ListSettings::default(),
            "",
        )
        .await
        .unwrap();

        assert!(matches!(data.view, ListView::Populated { .. }));
        assert!(data.view.items()[0].cells.contains(&"suspended".to_string()));
    }

    #[tokio::test]
    async fn export_reads_every_page_and_starts_with_a_bom() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut gateway = MockGateway::new();
        gateway.expect_list().returning({
            let calls = Arc::clone(&calls);
            move |_, query| {
                calls.fetch_add(1, Ordering::SeqCst);
                let id = query.page() as i64;
                Ok(ListResponse::new(
                    vec![user(id, &format!("User {id}"))],
                    150,
                    query.page(),
                    query.per_page(),
                ))
            }
        });

        let bytes = export_csv::<UsersScreen>(Arc::new(gateway), QueryCache::default(), "page=4")
            .await
            .unwrap();

        assert!(bytes.starts_with(UTF8_BOM));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Name,Email,Role,Status,Team,Region"));
        assert_eq!(
            lines.next(),
            Some("User 1,1@example.com,Learner,Active,-,-")
        );
        assert_eq!(lines.count(), 1);
    }
}
