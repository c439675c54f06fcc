//! What a list screen renders for a given query state.

use serde::Serialize;

use crate::query::QueryState;

/// Number of placeholder rows rendered while the first page loads.
pub const SKELETON_ROWS: usize = 5;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// A search or filter is active and nothing matched it.
    NoMatches,
    /// The entity has no records at all.
    NothingYet,
}

impl EmptyReason {
    pub fn message(self, noun_plural: &str) -> String {
        match self {
            EmptyReason::NoMatches => {
                format!("No {noun_plural} match the current search or filters.")
            }
            EmptyReason::NothingYet => format!("No {noun_plural} exist yet."),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ListView<T> {
    Loading { skeleton_rows: usize, columns: usize },
    Error { message: String },
    Empty { reason: EmptyReason },
    /// `dimmed` is set while a newer page is being fetched over stale rows.
    Populated { items: Vec<T>, dimmed: bool },
}

impl<T: Clone> ListView<T> {
    /// Derives the view for `state`. `narrowed` tells whether a search or
    /// filter is active, which selects the empty-state copy.
    pub fn derive(state: &QueryState<T>, narrowed: bool, columns: usize) -> Self {
        if state.is_loading {
            return ListView::Loading {
                skeleton_rows: SKELETON_ROWS,
                columns,
            };
        }

        match (&state.data, &state.error) {
            (_, Some(error)) => ListView::Error {
                message: error.user_message(),
            },
            (Some(data), None) if data.total_items > 0 || !data.items.is_empty() => {
                ListView::Populated {
                    items: data.items.clone(),
                    dimmed: state.is_fetching,
                }
            }
            (Some(_), None) => ListView::Empty {
                reason: if narrowed {
                    EmptyReason::NoMatches
                } else {
                    EmptyReason::NothingYet
                },
            },
            (None, None) => ListView::Loading {
                skeleton_rows: SKELETON_ROWS,
                columns,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListView<U> {
        match self {
            ListView::Loading {
                skeleton_rows,
                columns,
            } => ListView::Loading {
                skeleton_rows,
                columns,
            },
            ListView::Error { message } => ListView::Error { message },
            ListView::Empty { reason } => ListView::Empty { reason },
            ListView::Populated { items, dimmed } => ListView::Populated {
                items: items.into_iter().map(f).collect(),
                dimmed,
            },
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListView::Populated { items, .. } => items,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::list::ListResponse;
    use crate::gateway::errors::ApiError;

    fn state(items: Vec<u32>) -> QueryState<u32> {
        let total = items.len();
        QueryState {
            data: Some(Arc::new(ListResponse::new(items, total, 1, 10))),
            ..QueryState::default()
        }
    }

    #[test]
    fn first_load_shows_skeleton_rows() {
        let loading = QueryState::<u32> {
            is_loading: true,
            is_fetching: true,
            ..QueryState::default()
        };
        assert_eq!(
            ListView::derive(&loading, false, 4),
            ListView::Loading {
                skeleton_rows: SKELETON_ROWS,
                columns: 4
            }
        );
    }

    #[test]
    fn refetch_dims_existing_rows() {
        let mut refetching = state(vec![1, 2]);
        refetching.is_fetching = true;
        assert_eq!(
            ListView::derive(&refetching, false, 2),
            ListView::Populated {
                items: vec![1, 2],
                dimmed: true
            }
        );
    }

    #[test]
    fn empty_copy_depends_on_narrowing() {
        let empty = state(vec![]);
        assert_eq!(
            ListView::derive(&empty, true, 3),
            ListView::Empty {
                reason: EmptyReason::NoMatches
            }
        );
        assert_eq!(
            ListView::derive(&empty, false, 3),
            ListView::Empty {
                reason: EmptyReason::NothingYet
            }
        );
        assert_eq!(
            EmptyReason::NoMatches.message("users"),
            "No users match the current search or filters."
        );
    }

    #[test]
    fn errors_never_show_rows() {
        let failed = QueryState::<u32> {
            error: Some(ApiError::Transport("timeout".to_string())),
            ..QueryState::default()
        };
        assert_eq!(
            ListView::derive(&failed, false, 3),
            ListView::Error {
                message: "The LMS could not be reached. Please try again.".to_string()
            }
        );

        let mut failed_refetch = state(vec![7]);
        failed_refetch.error = Some(ApiError::NotFound);
        let view = ListView::derive(&failed_refetch, false, 3);
        assert!(matches!(view, ListView::Error { .. }));
        assert!(view.items().is_empty());
    }
}
