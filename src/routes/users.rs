use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::domain::entity::EntityKind;
use crate::forms::import::UploadUsersForm;
use crate::gateway::EntityGateway;
use crate::query::QueryCache;
use crate::routes::{flash, list_location, redirect};
use crate::services::ServiceError;
use crate::services::import::import_users as import_users_service;

#[post("/users/import")]
pub async fn import_users(
    gateway: web::Data<dyn EntityGateway>,
    cache: web::Data<QueryCache>,
    session: Session,
    MultipartForm(form): MultipartForm<UploadUsersForm>,
) -> impl Responder {
    match import_users_service(&gateway.into_inner(), &cache, &form).await {
        Ok(notice) => flash(notice),
        Err(ServiceError::Form { message, .. }) => {
            FlashMessage::error(format!("Import failed: {message}")).send();
        }
        Err(err) => {
            FlashMessage::error(format!("Import failed: {}", err.user_message())).send();
        }
    }
    redirect(&list_location(&session, EntityKind::Users.slug()))
}
