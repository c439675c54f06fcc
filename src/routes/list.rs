use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::list::PER_PAGE_OPTIONS;
use crate::gateway::EntityGateway;
use crate::list::ListSettings;
use crate::list::view::ListView;
use crate::query::QueryCache;
use crate::routes::{
    attachment, base_context, list_location, redirect, remember_list_query, render_template,
};
use crate::screens::Screen;
use crate::services::list::{export_csv as export_rows, load_list_page};

pub async fn list_page<S: Screen>(
    req: HttpRequest,
    session: Session,
    gateway: web::Data<dyn EntityGateway>,
    cache: web::Data<QueryCache>,
    settings: web::Data<ListSettings>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_list_page::<S>(
        gateway.into_inner(),
        cache.get_ref().clone(),
        &settings,
        req.query_string(),
    )
    .await
    {
        Ok(data) => {
            remember_list_query(&session, data.slug, &data.query_string);
            let mut context = base_context(&flash_messages, data.slug);
            context.insert("page", &data);
            context.insert("query_string", &data.query_string);
            context.insert("per_page_options", &PER_PAGE_OPTIONS);
            context.insert("debounce_ms", &settings.debounce_ms);
            render_template(&tera, "list/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render {} list: {err}", S::KIND);
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// The same page data as JSON, for scripts refreshing the table in place.
pub async fn list_json<S: Screen>(
    req: HttpRequest,
    gateway: web::Data<dyn EntityGateway>,
    cache: web::Data<QueryCache>,
    settings: web::Data<ListSettings>,
) -> impl Responder {
    match load_list_page::<S>(
        gateway.into_inner(),
        cache.get_ref().clone(),
        &settings,
        req.query_string(),
    )
    .await
    {
        Ok(data) if matches!(data.view, ListView::Error { .. }) => {
            HttpResponse::BadGateway().json(data)
        }
        Ok(data) => HttpResponse::Ok().json(data),
        Err(err) => {
            log::error!("Failed to load {} list: {err}", S::KIND);
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub async fn export_csv<S: Screen>(
    req: HttpRequest,
    session: Session,
    gateway: web::Data<dyn EntityGateway>,
    cache: web::Data<QueryCache>,
) -> impl Responder {
    let slug = S::KIND.slug();
    match export_rows::<S>(gateway.into_inner(), cache.get_ref().clone(), req.query_string()).await
    {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(attachment(&format!("{slug}.csv")))
            .body(bytes),
        Err(err) => {
            FlashMessage::error(format!("Export failed: {}", err.user_message())).send();
            redirect(&list_location(&session, slug))
        }
    }
}
