use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::gateway::EntityGateway;
use crate::gateway::errors::ApiError;
use crate::list::actions::RowAction;
use crate::query::QueryCache;
use crate::routes::{base_context, flash, list_location, redirect, render_template};
use crate::screens::{EditableScreen, Screen};
use crate::services::mutations::{
    ModalData, create, delete, failed_form_modal, load_modal, load_view, update,
};
use crate::services::{ServiceError, ServiceResult};

#[derive(Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    confirm: Option<String>,
}

fn form_template<S: Screen>() -> String {
    format!("{}/form.html", S::KIND.slug())
}

fn template_for<S: Screen>(action: RowAction) -> String {
    match action {
        RowAction::Create | RowAction::Edit(_) => form_template::<S>(),
        RowAction::Delete(_) => "modal/delete.html".to_string(),
        RowAction::View(_) => "modal/view.html".to_string(),
    }
}

fn render_modal<S: Screen, F: Serialize>(
    tera: &Tera,
    action: RowAction,
    result: ServiceResult<ModalData<F>>,
) -> HttpResponse {
    match result {
        Ok(modal) => {
            let mut context = Context::new();
            context.insert("modal", &modal);
            render_template(tera, &template_for::<S>(action), &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load {} {} dialog: {err}", S::KIND, action.name());
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Body of the read-only row dialog.
pub async fn view_modal<S: Screen>(
    id: web::Path<i64>,
    gateway: web::Data<dyn EntityGateway>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = id.into_inner();
    let result = load_view::<S>(&gateway.into_inner(), id).await;
    render_modal::<S, _>(&tera, RowAction::View(id), result)
}

pub async fn create_modal<S: EditableScreen>(
    gateway: web::Data<dyn EntityGateway>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result = load_modal::<S>(&gateway.into_inner(), RowAction::Create).await;
    render_modal::<S, _>(&tera, RowAction::Create, result)
}

/// Body of the edit, delete or view dialog of one row.
pub async fn row_modal<S: EditableScreen>(
    path: web::Path<(String, i64)>,
    gateway: web::Data<dyn EntityGateway>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (action, id) = path.into_inner();
    let Some(action) = RowAction::parse(&action, Some(id)) else {
        return HttpResponse::NotFound().finish();
    };
    let result = load_modal::<S>(&gateway.into_inner(), action).await;
    render_modal::<S, _>(&tera, action, result)
}

fn failure_status(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Form { .. }
        | ServiceError::TypeConstraint(_)
        | ServiceError::Api(ApiError::Validation { .. } | ApiError::Business(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Re-renders a rejected form as a full page so the dialog keeps the input,
/// the error and the field messages.
fn render_failed<S: EditableScreen>(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    action: RowAction,
    form: S::Form,
    err: ServiceError,
) -> HttpResponse {
    let status = failure_status(&err);
    let modal = failed_form_modal::<S>(action, form, &err);

    let mut context = Context::new();
    context.insert("modal", &modal);
    let body = match tera.render(&form_template::<S>(), &context) {
        Ok(body) => body,
        Err(err) => {
            log::error!("Failed to render {} form: {err}", S::KIND);
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = base_context(flash_messages, S::KIND.slug());
    context.insert("modal", &modal);
    context.insert("body", &body);
    match tera.render("modal/page.html", &context) {
        Ok(page) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(page),
        Err(err) => {
            log::error!("Failed to render {} form page: {err}", S::KIND);
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn create_item<S: EditableScreen>(
    gateway: web::Data<dyn EntityGateway>,
    cache: web::Data<QueryCache>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<S::Form>,
) -> impl Responder {
    match create::<S>(&gateway.into_inner(), &cache, form.clone()).await {
        Ok(notice) => {
            flash(notice);
            redirect(&list_location(&session, S::KIND.slug()))
        }
        Err(err) => render_failed::<S>(&tera, &flash_messages, RowAction::Create, form, err),
    }
}

pub async fn update_item<S: EditableScreen>(
    id: web::Path<i64>,
    gateway: web::Data<dyn EntityGateway>,
    cache: web::Data<QueryCache>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<S::Form>,
) -> impl Responder {
    let id = id.into_inner();
    match update::<S>(&gateway.into_inner(), &cache, id, form.clone()).await {
        Ok(notice) => {
            flash(notice);
            redirect(&list_location(&session, S::KIND.slug()))
        }
        Err(err) => render_failed::<S>(&tera, &flash_messages, RowAction::Edit(id), form, err),
    }
}

/// Deletes after the confirmation dialog posted `confirm=yes`.
pub async fn delete_item<S: EditableScreen>(
    id: web::Path<i64>,
    gateway: web::Data<dyn EntityGateway>,
    cache: web::Data<QueryCache>,
    session: Session,
    web::Form(form): web::Form<DeleteForm>,
) -> impl Responder {
    let confirmed = form.confirm.as_deref() == Some("yes");
    match delete::<S>(&gateway.into_inner(), &cache, id.into_inner(), confirmed).await {
        Ok(notice) => flash(notice),
        Err(ServiceError::Form { message, .. }) => FlashMessage::error(message).send(),
        Err(err) => {
            FlashMessage::error(format!(
                "Failed to delete the {}: {}",
                S::KIND.noun().to_lowercase(),
                err.user_message()
            ))
            .send();
        }
    }
    redirect(&list_location(&session, S::KIND.slug()))
}
