use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::gateway::EntityGateway;
use crate::query::QueryCache;
use crate::routes::{base_context, render_template};
use crate::services::dashboard::load_dashboard;

#[get("/")]
pub async fn index(
    gateway: web::Data<dyn EntityGateway>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = load_dashboard(gateway.into_inner(), cache.get_ref().clone()).await;

    let mut context = base_context(&flash_messages, "index");
    context.insert("tiles", &data.tiles);
    render_template(&tera, "main/index.html", &context)
}
