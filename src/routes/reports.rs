use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::FlashMessage;

use crate::gateway::EntityGateway;
use crate::routes::{attachment, redirect};
use crate::services::reports::export_pdf as export_report;

/// Streams the PDF rendered by the backend for the selected report.
#[get("/reports/export.pdf")]
pub async fn export_pdf(req: HttpRequest, gateway: web::Data<dyn EntityGateway>) -> impl Responder {
    match export_report(&gateway.into_inner(), req.query_string()).await {
        Ok(file) => {
            let file_name = file.file_name.unwrap_or_else(|| "report.pdf".to_string());
            HttpResponse::Ok()
                .content_type(file.content_type)
                .insert_header(attachment(&file_name))
                .body(file.bytes)
        }
        Err(err) => {
            FlashMessage::error(format!("Export failed: {}", err.user_message())).send();
            redirect(&format!("/reports?{}", req.query_string()))
        }
    }
}
