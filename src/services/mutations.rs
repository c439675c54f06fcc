//! Create, edit, view and delete dialogs of the list screens.

use serde::Serialize;

use crate::gateway::SharedGateway;
use crate::gateway::errors::ApiResult;
use crate::list::actions::{Dialog, Notice, RowAction, RowActionDispatcher};
use crate::query::QueryCache;
use crate::screens::{EditableScreen, Screen};
use crate::services::{ServiceError, ServiceResult};

/// Label and value of one field in the view and delete dialogs.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

/// Data required to render a modal body.
#[derive(Debug, Serialize)]
pub struct ModalData<F> {
    pub dialog: Dialog,
    pub slug: &'static str,
    pub noun: &'static str,
    /// Present for create and edit dialogs.
    pub form: Option<F>,
    /// Present for view and delete dialogs.
    pub details: Vec<DetailField>,
}

async fn load_item<S: Screen>(gateway: &SharedGateway, id: i64) -> ServiceResult<S::Item> {
    let value = gateway.get(S::KIND, id).await.map_err(|err| {
        log::error!("Failed to load {} #{id}: {err}", S::KIND);
        ServiceError::from(err)
    })?;
    serde_json::from_value(value).map_err(|err| {
        log::error!("Failed to decode {} #{id}: {err}", S::KIND);
        ServiceError::Internal
    })
}

fn details<S: Screen>(item: &S::Item) -> Vec<DetailField> {
    S::COLUMNS
        .iter()
        .zip(S::row_cells(item))
        .map(|(label, value)| DetailField {
            label: *label,
            value,
        })
        .collect()
}

fn modal<S: Screen, F>(
    dispatcher: &RowActionDispatcher,
    form: Option<F>,
    details: Vec<DetailField>,
) -> ServiceResult<ModalData<F>> {
    let dialog = dispatcher.dialog().cloned().ok_or(ServiceError::Internal)?;
    Ok(ModalData {
        dialog,
        slug: S::KIND.slug(),
        noun: S::KIND.noun(),
        form,
        details,
    })
}

/// Loads the read-only view dialog. Available on every screen.
pub async fn load_view<S: Screen>(gateway: &SharedGateway, id: i64) -> ServiceResult<ModalData<()>> {
    let item = load_item::<S>(gateway, id).await?;
    let mut dispatcher = RowActionDispatcher::new(S::KIND);
    dispatcher.open_view(id);
    modal::<S, ()>(&dispatcher, None, details::<S>(&item))
}

/// Loads any dialog of an editable screen.
pub async fn load_modal<S: EditableScreen>(
    gateway: &SharedGateway,
    action: RowAction,
) -> ServiceResult<ModalData<S::Form>> {
    let mut dispatcher = RowActionDispatcher::new(S::KIND);
    dispatcher.open(action);

    match action {
        RowAction::Create => modal::<S, _>(&dispatcher, Some(S::Form::default()), Vec::new()),
        RowAction::Edit(id) => {
            let item = load_item::<S>(gateway, id).await?;
            modal::<S, _>(&dispatcher, Some(S::form_for(&item)), Vec::new())
        }
        RowAction::Delete(id) | RowAction::View(id) => {
            let item = load_item::<S>(gateway, id).await?;
            modal::<S, _>(&dispatcher, None, details::<S>(&item))
        }
    }
}

/// Dialog re-rendered after a failed submission, keeping the user's input.
pub fn failed_form_modal<S: EditableScreen>(
    action: RowAction,
    form: S::Form,
    error: &ServiceError,
) -> ModalData<S::Form> {
    let dialog = Dialog {
        action,
        busy: false,
        error: Some(error.user_message()),
        field_errors: error.field_errors(),
    };
    ModalData {
        dialog,
        slug: S::KIND.slug(),
        noun: S::KIND.noun(),
        form: Some(form),
        details: Vec::new(),
    }
}

/// Runs one mutation through a dispatcher: a failure leaves the cache alone,
/// a success invalidates every cached list of the entity.
///
/// The dispatcher lives for a single request, so its busy state cannot reject
/// a second submission arriving as another request. Browsers are kept from
/// sending one by the `data-busy-guard` form attribute in `console.js`.
async fn submit<S: Screen, T>(
    cache: &QueryCache,
    action: RowAction,
    mutation: impl Future<Output = ApiResult<T>>,
) -> ServiceResult<Notice> {
    let mut dispatcher = RowActionDispatcher::new(S::KIND);
    dispatcher.open(action);
    dispatcher.begin_submit()?;

    let result = mutation.await;
    dispatcher.finish(cache, result).map_err(|err| {
        log::error!("Failed to {} {}: {err}", action.name(), S::KIND);
        ServiceError::from(err)
    })
}

pub async fn create<S: EditableScreen>(
    gateway: &SharedGateway,
    cache: &QueryCache,
    form: S::Form,
) -> ServiceResult<Notice> {
    let payload = S::payload(form)?;
    submit::<S, _>(cache, RowAction::Create, gateway.create(S::KIND, &payload)).await
}

pub async fn update<S: EditableScreen>(
    gateway: &SharedGateway,
    cache: &QueryCache,
    id: i64,
    form: S::Form,
) -> ServiceResult<Notice> {
    let payload = S::payload(form)?;
    submit::<S, _>(cache, RowAction::Edit(id), gateway.update(S::KIND, id, &payload)).await
}

/// Deletes a row. Requires the confirmation dialog to have been accepted.
pub async fn delete<S: EditableScreen>(
    gateway: &SharedGateway,
    cache: &QueryCache,
    id: i64,
    confirmed: bool,
) -> ServiceResult<Notice> {
    if !confirmed {
        return Err(ServiceError::Form {
            message: "Deletion was not confirmed.".to_string(),
            fields: Default::default(),
        });
    }
    submit::<S, _>(cache, RowAction::Delete(id), gateway.delete(S::KIND, id)).await
}
