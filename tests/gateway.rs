use lms_console::domain::entity::EntityKind;
use lms_console::domain::list::ListQuery;
use lms_console::gateway::errors::ApiError;
use lms_console::gateway::http::{GatewaySettings, LmsGateway};
use lms_console::gateway::{EntityReader, EntityWriter};
use serde_json::json;
use wiremock::matchers::{
    basic_auth, body_string_contains, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API: &str = "/wp-json/lms/v1";

fn gateway(server: &MockServer) -> LmsGateway {
    LmsGateway::new(&GatewaySettings {
        base_url: format!("{}{API}", server.uri()),
        username: Some("admin".to_string()),
        app_password: Some("abcd efgh".to_string()),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn bare_arrays_take_totals_from_wordpress_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/users")))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "20"))
        .and(query_param("search", "ada"))
        .and(query_param("role", "subscriber"))
        .and(basic_auth("admin", "abcd efgh"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-Total", "42")
                .insert_header("X-WP-TotalPages", "3")
                .set_body_json(json!([
                    {"id": 21, "name": "Ada", "email": "ada@example.com"},
                    {"id": 22, "name": "Adam", "email": "adam@example.com"}
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::new(20)
        .with_search(Some("ada"))
        .with_filter("role", "subscriber")
        .with_page(2);
    let page = gateway(&server).list(EntityKind::Users, &query).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_items, 42);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.current_page, 2);
}

#[tokio::test]
async fn success_envelopes_are_unwrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/courses")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "items": [{"id": 1, "title": "Rust 101"}],
                "total": 41,
                "current_page": 1
            }
        })))
        .mount(&server)
        .await;

    let page = gateway(&server)
        .list(EntityKind::Courses, &ListQuery::new(20))
        .await
        .unwrap();

    assert_eq!(page.items[0]["title"], "Rust 101");
    assert_eq!(page.total_items, 41);
    assert_eq!(page.total_pages, 3);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/teams/9")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "rest_not_found",
            "message": "Team not found"
        })))
        .mount(&server)
        .await;

    let err = gateway(&server).get(EntityKind::Teams, 9).await.unwrap_err();
    assert_eq!(err, ApiError::NotFound);
}

#[tokio::test]
async fn rejected_mutations_carry_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/users")))
        .and(body_string_contains("ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Email already in use",
            "errors": {"email": "Email already in use"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server)
        .create(EntityKind::Users, &json!({"name": "Ada", "email": "ada@example.com"}))
        .await
        .unwrap_err();

    match err {
        ApiError::Validation { message, fields } => {
            assert_eq!(message, "Email already in use");
            assert_eq!(fields["email"], "Email already in use");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn wordpress_errors_become_business_errors() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{API}/teams/3")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "team_not_empty",
            "message": "Team still has members",
            "data": {"status": 400}
        })))
        .mount(&server)
        .await;

    let err = gateway(&server).delete(EntityKind::Teams, 3).await.unwrap_err();
    assert_eq!(err, ApiError::Business("Team still has members".to_string()));
    assert_eq!(err.user_message(), "Team still has members");
}

#[tokio::test]
async fn updates_return_the_saved_entity() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{API}/courses/4")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": 4, "title": "Rust 102"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let saved = gateway(&server)
        .update(EntityKind::Courses, 4, &json!({"title": "Rust 102"}))
        .await
        .unwrap();
    assert_eq!(saved["title"], "Rust 102");
}

#[tokio::test]
async fn imports_are_posted_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/users/import")))
        .and(body_string_contains("filename=\"staff.csv\""))
        .and(body_string_contains("ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"imported": 2, "skipped": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = gateway(&server)
        .import_csv(
            EntityKind::Users,
            "staff.csv",
            b"name,email,role\nAda,ada@example.com,subscriber\n".to_vec(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.skipped, 1);
}

#[tokio::test]
async fn exports_pass_the_file_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/reports/export")))
        .and(query_param("format", "pdf"))
        .and(query_param("report", "revenue"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"revenue.pdf\"")
                .set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::new(20).with_filter("report", "revenue");
    let file = gateway(&server)
        .export(EntityKind::Reports, &query, "pdf")
        .await
        .unwrap();

    assert_eq!(file.content_type, "application/pdf");
    assert_eq!(file.file_name.as_deref(), Some("revenue.pdf"));
    assert_eq!(file.bytes, b"%PDF-1.7");
}

#[tokio::test]
async fn server_errors_keep_their_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .list(EntityKind::AuditLogs, &ListQuery::new(20))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    assert_eq!(err.user_message(), "The LMS failed to process the request.");
}
