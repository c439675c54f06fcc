use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use lms_console::gateway::http::{GatewaySettings, LmsGateway};
use lms_console::gateway::{EntityGateway, SharedGateway};
use lms_console::list::ListSettings;
use lms_console::query::QueryCache;
use lms_console::routes::{self, alert_level_to_str};
use serde_json::{Value, json};
use tera::Tera;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/wp-json/lms/v1";

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

macro_rules! console {
    ($server:expr) => {{
        let gateway = LmsGateway::new(&GatewaySettings {
            base_url: format!("{}{API}", $server.uri()),
            username: None,
            app_password: None,
            timeout_secs: 5,
        })
        .unwrap();
        let gateway: SharedGateway = Arc::new(gateway);
        let gateway: web::Data<dyn EntityGateway> = web::Data::from(gateway);
        let tera = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap();
        let key = Key::generate();
        let message_store = CookieMessageStore::builder(key.clone()).build();

        test::init_service(
            App::new()
                .wrap(FlashMessagesFramework::builder(message_store).build())
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
                .configure(routes::configure)
                .app_data(gateway)
                .app_data(web::Data::new(QueryCache::default()))
                .app_data(web::Data::new(ListSettings::default()))
                .app_data(web::Data::new(tera)),
        )
        .await
    }};
}

fn users() -> Value {
    json!([
        {"id": 1, "name": "Ada Lovelace", "email": "ada@example.com", "role": "subscriber"},
        {"id": 2, "name": "Grace Hopper", "email": "grace@example.com", "role": "group_leader"}
    ])
}

async fn mount_users(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("{API}/users")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "2")
                .set_body_json(users()),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[actix_web::test]
async fn list_page_renders_rows() {
    let server = MockServer::start().await;
    mount_users(&server, 1).await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/users?search=a").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Ada Lovelace"));
    assert!(body.contains("Manager"));
    assert!(body.contains("/users/modal/edit/2"));
}

#[actix_web::test]
async fn list_json_serves_the_page_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/teams")))
        .and(query_param("region", "North"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 3, "name": "Platform", "members": 7, "region": "North"}],
            "total": 1
        })))
        .mount(&server)
        .await;
    let app = console!(server);

    let req = test::TestRequest::get()
        .uri("/api/v1/teams?region=North")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["view"]["state"], "populated");
    assert_eq!(body["view"]["items"][0]["cells"], json!(["Platform", "-", "7", "North"]));
    assert_eq!(body["pager"]["total_pages"], 1);
}

#[actix_web::test]
async fn backend_failures_are_reported_as_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/api/v1/courses").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["view"]["state"], "error");
}

#[actix_web::test]
async fn csv_export_is_an_attachment() {
    let server = MockServer::start().await;
    mount_users(&server, 1).await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/users/export.csv").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"users.csv\""
    );

    let body = test::read_body(resp).await;
    assert!(body.starts_with(b"\xEF\xBB\xBFName,Email,Role"));
}

#[actix_web::test]
async fn confirmed_delete_redirects_to_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{API}/users/2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    let app = console!(server);

    let req = test::TestRequest::post()
        .uri("/users/2/delete")
        .set_form([("confirm", "yes")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/users");
}

#[actix_web::test]
async fn invalid_forms_are_shown_again() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let app = console!(server);

    let req = test::TestRequest::post()
        .uri("/users/create")
        .set_form([("name", "Ada"), ("email", "not-an-email"), ("role", "subscriber")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Enter a valid email address"));
    assert!(body.contains("value=\"not-an-email\""));
}

#[actix_web::test]
async fn edit_dialog_is_prefilled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/users/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "role": "administrator"
        })))
        .mount(&server)
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/users/modal/edit/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("value=\"ada@example.com\""));
    assert!(body.contains("action=\"/users/1/update\""));
}

#[actix_web::test]
async fn unknown_dialogs_are_not_found() {
    let server = MockServer::start().await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/users/modal/archive/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Read-only screens have no create dialog.
    let req = test::TestRequest::get().uri("/learners/modal/create").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn dashboard_lists_every_screen() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("per_page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "12")
                .set_body_json(json!([])),
        )
        .expect(8)
        .mount(&server)
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Pricing rules"));
    assert!(body.contains("/audit-logs"));
}
