//! Totals shown on the dashboard.

use futures::future::join_all;
use serde::Serialize;

use crate::domain::entity::EntityKind;
use crate::domain::list::ListQuery;
use crate::gateway::SharedGateway;
use crate::query::QueryCache;

/// One dashboard tile.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Tile {
    pub kind: EntityKind,
    pub slug: &'static str,
    pub title: &'static str,
    pub total: Option<usize>,
    /// Set when the total could not be loaded.
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub tiles: Vec<Tile>,
}

/// Reads the first one-row page of every screen, concurrently and through
/// the cache, and reports the total item counts.
pub async fn load_dashboard(gateway: SharedGateway, cache: QueryCache) -> DashboardData {
    let query = ListQuery::new(1);

    let tiles = EntityKind::ALL.into_iter().map(|kind| {
        let gateway = gateway.clone();
        let cache = cache.clone();
        let query = query.clone();
        async move {
            let result = cache
                .fetch(kind, &query, {
                    let query = query.clone();
                    move || async move { gateway.list(kind, &query).await }
                })
                .await;
            match result {
                Ok(response) => Tile {
                    kind,
                    slug: kind.slug(),
                    title: kind.title(),
                    total: Some(response.total_items),
                    error: None,
                },
                Err(err) => {
                    log::error!("Failed to load the {kind} total: {err}");
                    Tile {
                        kind,
                        slug: kind.slug(),
                        title: kind.title(),
                        total: None,
                        error: Some(err.user_message()),
                    }
                }
            }
        }
    });

    DashboardData {
        tiles: join_all(tiles).await,
    }
}
