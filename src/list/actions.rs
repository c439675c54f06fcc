//! Create/edit/delete/view dialogs opened from a list row or toolbar.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::domain::entity::EntityKind;
use crate::gateway::errors::{ApiError, ApiResult};
use crate::query::QueryCache;

/// The dialog a screen is showing. At most one is open at a time.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum RowAction {
    Create,
    Edit(i64),
    Delete(i64),
    View(i64),
}

impl RowAction {
    /// Parses the `{action}[/{id}]` pair used by modal routes.
    pub fn parse(action: &str, id: Option<i64>) -> Option<Self> {
        match (action, id) {
            ("create", None) => Some(RowAction::Create),
            ("edit", Some(id)) => Some(RowAction::Edit(id)),
            ("delete", Some(id)) => Some(RowAction::Delete(id)),
            ("view", Some(id)) => Some(RowAction::View(id)),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            RowAction::Create => "create",
            RowAction::Edit(_) => "edit",
            RowAction::Delete(_) => "delete",
            RowAction::View(_) => "view",
        }
    }

    pub const fn id(self) -> Option<i64> {
        match self {
            RowAction::Create => None,
            RowAction::Edit(id) | RowAction::Delete(id) | RowAction::View(id) => Some(id),
        }
    }

    /// View dialogs are read-only and have nothing to submit.
    pub const fn is_submittable(self) -> bool {
        !matches!(self, RowAction::View(_))
    }

    fn past_tense(self) -> &'static str {
        match self {
            RowAction::Create => "created",
            RowAction::Edit(_) => "updated",
            RowAction::Delete(_) => "deleted",
            RowAction::View(_) => "viewed",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient notification raised by a finished action.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// State of the open dialog.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Dialog {
    pub action: RowAction,
    pub busy: bool,
    /// Message of the last failed submission.
    pub error: Option<String>,
    pub field_errors: BTreeMap<String, String>,
}

impl Dialog {
    fn new(action: RowAction) -> Self {
        Self {
            action,
            busy: false,
            error: None,
            field_errors: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no dialog is open")]
    NoDialog,

    #[error("a submission is already in progress")]
    Busy,

    #[error("{0} dialogs cannot be submitted")]
    NotSubmittable(&'static str),
}

/// Drives the dialogs of one list screen.
///
/// A successful mutation closes the dialog and invalidates every cached list
/// of the entity so the next render re-fetches. A failed one leaves the
/// dialog open with the backend's message and the cache untouched.
#[derive(Debug)]
pub struct RowActionDispatcher {
    kind: EntityKind,
    dialog: Option<Dialog>,
}

impl RowActionDispatcher {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind, dialog: None }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn open(&mut self, action: RowAction) {
        if let Some(previous) = self.dialog.replace(Dialog::new(action)) {
            debug!(
                "Replacing {} dialog with {} on {}",
                previous.action.name(),
                action.name(),
                self.kind
            );
        }
    }

    pub fn open_create(&mut self) {
        self.open(RowAction::Create);
    }

    pub fn open_edit(&mut self, id: i64) {
        self.open(RowAction::Edit(id));
    }

    /// Deletion always goes through this confirmation dialog.
    pub fn open_delete(&mut self, id: i64) {
        self.open(RowAction::Delete(id));
    }

    pub fn open_view(&mut self, id: i64) {
        self.open(RowAction::View(id));
    }

    /// Closes the dialog without side effects.
    pub fn close(&mut self) {
        self.dialog = None;
    }

    /// Marks the open dialog busy. Rejected while a submission is pending.
    pub fn begin_submit(&mut self) -> Result<RowAction, DispatchError> {
        let dialog = self.dialog.as_mut().ok_or(DispatchError::NoDialog)?;
        if !dialog.action.is_submittable() {
            return Err(DispatchError::NotSubmittable(dialog.action.name()));
        }
        if dialog.busy {
            return Err(DispatchError::Busy);
        }
        dialog.busy = true;
        dialog.error = None;
        dialog.field_errors.clear();
        Ok(dialog.action)
    }

    /// Applies the outcome of the submitted mutation.
    pub fn finish<T>(&mut self, cache: &QueryCache, result: ApiResult<T>) -> Result<Notice, ApiError> {
        let action = self
            .dialog
            .as_ref()
            .map(|dialog| dialog.action)
            .unwrap_or(RowAction::Create);

        match result {
            Ok(_) => {
                self.dialog = None;
                cache.invalidate(self.kind);
                Ok(Notice::success(format!(
                    "{} {}.",
                    self.kind.noun(),
                    action.past_tense()
                )))
            }
            Err(err) => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.busy = false;
                    dialog.error = Some(err.user_message());
                    dialog.field_errors = err.field_errors();
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::domain::list::{ListQuery, ListResponse};

    async fn warm(cache: &QueryCache, kind: EntityKind) {
        cache
            .fetch(kind, &ListQuery::default(), || async {
                Ok(ListResponse::new(vec![json!({"id": 1})], 1, 1, 20))
            })
            .await
            .unwrap();
    }

    #[test]
    fn opening_a_dialog_replaces_the_previous_one() {
        let mut dispatcher = RowActionDispatcher::new(EntityKind::Users);
        dispatcher.open_edit(3);
        dispatcher.open_delete(4);

        assert_eq!(dispatcher.dialog().unwrap().action, RowAction::Delete(4));
        dispatcher.close();
        assert!(dispatcher.dialog().is_none());
    }

    #[test]
    fn duplicate_submissions_are_rejected() {
        let mut dispatcher = RowActionDispatcher::new(EntityKind::Teams);
        assert_eq!(dispatcher.begin_submit(), Err(DispatchError::NoDialog));

        dispatcher.open_create();
        assert_eq!(dispatcher.begin_submit(), Ok(RowAction::Create));
        assert_eq!(dispatcher.begin_submit(), Err(DispatchError::Busy));

        dispatcher.open_view(1);
        assert_eq!(
            dispatcher.begin_submit(),
            Err(DispatchError::NotSubmittable("view"))
        );
    }

    #[tokio::test]
    async fn success_closes_and_invalidates() {
        let cache = QueryCache::default();
        warm(&cache, EntityKind::Users).await;
        warm(&cache, EntityKind::Teams).await;

        let mut dispatcher = RowActionDispatcher::new(EntityKind::Users);
        dispatcher.open_delete(1);
        dispatcher.begin_submit().unwrap();
        let notice = dispatcher.finish(&cache, Ok(())).unwrap();

        assert_eq!(notice, Notice::success("User deleted."));
        assert!(dispatcher.dialog().is_none());
        assert!(cache.is_stale(EntityKind::Users, &ListQuery::default()).await);
        assert!(!cache.is_stale(EntityKind::Teams, &ListQuery::default()).await);
    }

    #[tokio::test]
    async fn failure_keeps_the_dialog_and_the_cache() {
        let cache = QueryCache::default();
        warm(&cache, EntityKind::Courses).await;

        let mut dispatcher = RowActionDispatcher::new(EntityKind::Courses);
        dispatcher.open_create();
        dispatcher.begin_submit().unwrap();
        let error = ApiError::Validation {
            message: "Invalid course".to_string(),
            fields: BTreeMap::from([("title".to_string(), "Required".to_string())]),
        };
        let result = dispatcher.finish::<Arc<()>>(&cache, Err(error.clone()));

        assert_eq!(result, Err(error));
        let dialog = dispatcher.dialog().unwrap();
        assert!(!dialog.busy);
        assert_eq!(dialog.error.as_deref(), Some("Invalid course"));
        assert_eq!(dialog.field_errors["title"], "Required");
        assert!(!cache.is_stale(EntityKind::Courses, &ListQuery::default()).await);

        // The user may correct the input and submit again.
        assert_eq!(dispatcher.begin_submit(), Ok(RowAction::Create));
        assert!(dispatcher.dialog().unwrap().error.is_none());
    }

    #[test]
    fn modal_paths_parse_into_actions() {
        assert_eq!(RowAction::parse("create", None), Some(RowAction::Create));
        assert_eq!(RowAction::parse("edit", Some(2)), Some(RowAction::Edit(2)));
        assert_eq!(RowAction::parse("edit", None), None);
        assert_eq!(RowAction::parse("archive", Some(2)), None);
        assert_eq!(RowAction::View(9).id(), Some(9));
    }
}
