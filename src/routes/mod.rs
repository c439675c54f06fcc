//! HTTP handlers of the console.
//!
//! List handlers are generic over [`Screen`] and registered once per screen by
//! [`configure`], so every list shares the same URLs:
//!
//! | Method | Path                              | Handler                     |
//! |--------|-----------------------------------|-----------------------------|
//! | GET    | `/{slug}`                         | [`list::list_page`]         |
//! | GET    | `/api/v1/{slug}`                  | [`list::list_json`]         |
//! | GET    | `/{slug}/export.csv`              | [`list::export_csv`]        |
//! | GET    | `/{slug}/modal/view/{id}`         | [`modals::view_modal`]      |
//! | GET    | `/{slug}/modal/create`            | [`modals::create_modal`]    |
//! | GET    | `/{slug}/modal/{action}/{id}`     | [`modals::row_modal`]       |
//! | POST   | `/{slug}/create`                  | [`modals::create_item`]     |
//! | POST   | `/{slug}/{id}/update`             | [`modals::update_item`]     |
//! | POST   | `/{slug}/{id}/delete`             | [`modals::delete_item`]     |

use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::entity::EntityKind;
use crate::list::actions::{Notice, NoticeLevel};
use crate::screens::audit_logs::AuditLogsScreen;
use crate::screens::courses::CoursesScreen;
use crate::screens::facilitators::FacilitatorsScreen;
use crate::screens::learners::LearnersScreen;
use crate::screens::pricing_rules::PricingRulesScreen;
use crate::screens::reports::ReportsScreen;
use crate::screens::teams::TeamsScreen;
use crate::screens::users::UsersScreen;
use crate::screens::{EditableScreen, Screen};

pub mod list;
pub mod main;
pub mod modals;
pub mod reports;
pub mod users;

/// Maps flash message levels to the CSS classes used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

#[derive(Serialize)]
struct NavItem {
    slug: &'static str,
    title: &'static str,
}

/// Context shared by every full page: alerts and the navigation.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let nav = EntityKind::ALL
        .iter()
        .map(|kind| NavItem {
            slug: kind.slug(),
            title: kind.title(),
        })
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("nav", &nav);
    context.insert("current_page", current_page);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn list_query_key(slug: &str) -> String {
    format!("list_query:{slug}")
}

/// Remembers the query string of the list page last shown for `slug`.
pub fn remember_list_query(session: &Session, slug: &str, query: &str) {
    if let Err(err) = session.insert(list_query_key(slug), query) {
        log::warn!("Failed to store the {slug} list query: {err}");
    }
}

/// The list page of `slug` as the user last saw it.
pub fn list_location(session: &Session, slug: &str) -> String {
    match session.get::<String>(&list_query_key(slug)) {
        Ok(Some(query)) if !query.is_empty() => format!("/{slug}?{query}"),
        _ => format!("/{slug}"),
    }
}

/// Queues a notice for the next rendered page.
pub fn flash(notice: Notice) {
    match notice.level {
        NoticeLevel::Success => FlashMessage::success(notice.message).send(),
        NoticeLevel::Error => FlashMessage::error(notice.message).send(),
    }
}

fn attachment(file_name: &str) -> (header::HeaderName, String) {
    (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{file_name}\""),
    )
}

/// Routes shared by every screen.
fn read_only<S: Screen>(cfg: &mut web::ServiceConfig) {
    let slug = S::KIND.slug();
    cfg.route(&format!("/{slug}"), web::get().to(list::list_page::<S>))
        .route(&format!("/api/v1/{slug}"), web::get().to(list::list_json::<S>))
        .route(&format!("/{slug}/export.csv"), web::get().to(list::export_csv::<S>))
        .route(
            &format!("/{slug}/modal/view/{{id}}"),
            web::get().to(modals::view_modal::<S>),
        );
}

/// Routes of screens whose rows can be created, edited and deleted.
fn editable<S: EditableScreen>(cfg: &mut web::ServiceConfig) {
    read_only::<S>(cfg);
    let slug = S::KIND.slug();
    cfg.route(
        &format!("/{slug}/modal/create"),
        web::get().to(modals::create_modal::<S>),
    )
    .route(
        &format!("/{slug}/modal/{{action}}/{{id}}"),
        web::get().to(modals::row_modal::<S>),
    )
    .route(&format!("/{slug}/create"), web::post().to(modals::create_item::<S>))
    .route(
        &format!("/{slug}/{{id}}/update"),
        web::post().to(modals::update_item::<S>),
    )
    .route(
        &format!("/{slug}/{{id}}/delete"),
        web::post().to(modals::delete_item::<S>),
    );
}

/// Registers every console route. Expects `web::Data` for the gateway
/// (`dyn EntityGateway`), the query cache, the list settings and Tera.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::index)
        .service(users::import_users)
        .service(reports::export_pdf);

    editable::<UsersScreen>(cfg);
    editable::<TeamsScreen>(cfg);
    editable::<PricingRulesScreen>(cfg);
    editable::<CoursesScreen>(cfg);
    read_only::<LearnersScreen>(cfg);
    read_only::<FacilitatorsScreen>(cfg);
    read_only::<AuditLogsScreen>(cfg);
    read_only::<ReportsScreen>(cfg);
}
