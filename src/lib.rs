//! Administration console for a WordPress-hosted learning management system.
//!
//! Every screen is a paginated list backed by the LMS REST API. The list
//! machinery ([`list`], [`query`], [`pagination`]) is shared by all screens and
//! does not depend on the web server; build with `--no-default-features
//! --features data` to use it on its own.

pub mod domain;
pub mod error_conversions;
pub mod forms;
pub mod gateway;
pub mod list;
pub mod pagination;
pub mod query;
pub mod screens;
pub mod services;

#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod routes;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::gateway::http::LmsGateway;
    use crate::gateway::{EntityGateway, SharedGateway};
    use crate::models::config::ServerConfig;
    use crate::query::QueryCache;
    use crate::routes;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        server_config
            .validate()
            .map_err(|e| std::io::Error::other(format!("Invalid configuration: {e}")))?;

        let gateway = LmsGateway::new(&server_config.api)
            .map_err(|e| std::io::Error::other(format!("Failed to build the LMS client: {e}")))?;
        let gateway: SharedGateway = Arc::new(gateway);
        let gateway: web::Data<dyn EntityGateway> = web::Data::from(gateway);

        // One cache for the whole process so invalidation reaches every worker.
        let cache = web::Data::new(QueryCache::new(server_config.list.cache_ttl()));
        let list_settings = web::Data::new(server_config.list.clone());

        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;
        let tera = web::Data::new(tera);

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving the LMS console on {}:{} for {}",
            bind_address.0,
            bind_address.1,
            server_config.api.base_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .configure(routes::configure)
                .app_data(gateway.clone())
                .app_data(cache.clone())
                .app_data(list_settings.clone())
                .app_data(tera.clone())
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
