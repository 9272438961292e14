//! End-to-end API behavior over the full router: the auth gate, admin CRUD,
//! validation surfaces and upload serving.

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::{TestServer, TestServerConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

use sheetsmith::config::{AppConfig, AuthConfig, AuthStrategy, Environment};
use sheetsmith::create_app;
use sheetsmith::store::DocumentStore;
use sheetsmith::utils::UploadStorage;

struct TestSite {
    server: TestServer,
    _data_dir: TempDir,
    _uploads_dir: TempDir,
}

fn spawn_site() -> TestSite {
    let data_dir = TempDir::new().unwrap();
    let uploads_dir = TempDir::new().unwrap();

    let config = AppConfig {
        environment: Environment::Development,
        base_url: "http://localhost:8080".to_string(),
        server_port: 8080,
        cors_origins: vec!["http://localhost:3000".to_string()],
        auth: AuthConfig {
            strategy: AuthStrategy::Credentials,
            session_secret: "test-session-secret".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "hunter2hunter2".to_string(),
            admin_emails: Vec::new(),
            oauth: None,
        },
        store: DocumentStore::local(data_dir.path()),
        uploads: UploadStorage::new(uploads_dir.path()),
        mail: None,
    };

    let server = TestServer::new_with_config(
        create_app(config),
        TestServerConfig {
            save_cookies: true,
            ..Default::default()
        },
    )
    .unwrap();

    TestSite {
        server,
        _data_dir: data_dir,
        _uploads_dir: uploads_dir,
    }
}

async fn login(server: &TestServer) {
    let response = server
        .post("/api/login")
        .json(&json!({"username": "admin", "password": "hunter2hunter2"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
}

fn sample_inquiry_body() -> Value {
    json!({
        "name": "Dana Smith",
        "email": "dana@example.com",
        "description": "Need a cash flow model for my bakery",
        "services": ["dashboards"]
    })
}

// ---------------------------------------------------------------------------
// Auth gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_api_without_session_returns_401() {
    let site = spawn_site();

    let response = site.server.get("/api/admin/inquiries").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn admin_page_without_session_redirects_to_login() {
    let site = spawn_site();

    let response = site.server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        &HeaderValue::from_static("/login")
    );
}

#[tokio::test]
async fn unmatched_admin_paths_are_still_gated() {
    let site = spawn_site();

    // Page path: redirect, API path: 401, both before any handler runs
    let page = site.server.get("/admin/inquiries").await;
    assert_eq!(page.status_code(), StatusCode::SEE_OTHER);

    let api = site.server.get("/api/admin/does-not-exist").await;
    assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);

    login(&site.server).await;
    let api = site.server.get("/api/admin/does-not-exist").await;
    assert_eq!(api.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn forged_session_cookie_is_rejected() {
    let site = spawn_site();

    let response = site
        .server
        .get("/api/admin/inquiries")
        .add_header(
            HeaderName::from_static("cookie"),
            HeaderValue::from_static("session=not-a-real-token"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let site = spawn_site();

    let response = site
        .server
        .post("/api/login")
        .json(&json!({"username": "admin", "password": "wrong"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_unlocks_admin_api() {
    let site = spawn_site();
    login(&site.server).await;

    let response = site.server.get("/api/admin/inquiries").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Vec<Value>>().len(), 0);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let site = spawn_site();
    login(&site.server).await;

    let response = site.server.post("/api/logout").await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("Max-Age=0"));
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn created_template_defaults_to_unpublished() {
    let site = spawn_site();
    login(&site.server).await;

    let response = site
        .server
        .post("/api/admin/templates")
        .json(&json!({
            "id": "budget-tracker",
            "name": "Budget Tracker",
            "price": 49,
            "shortDesc": "Monthly budget tracker"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["template"]["active"], false);
    assert_eq!(body["template"]["cover"], "https://picsum.photos/seed/template/600");

    // Hidden from the public catalog, still reachable by direct id
    let public_list: Vec<Value> = site.server.get("/api/templates").await.json();
    assert!(public_list.is_empty());

    let direct = site.server.get("/api/templates/budget-tracker").await;
    assert_eq!(direct.status_code(), StatusCode::OK);

    // Activation publishes it
    let patched = site
        .server
        .patch("/api/admin/templates/budget-tracker")
        .json(&json!({"active": true}))
        .await;
    assert_eq!(patched.status_code(), StatusCode::OK);

    let public_list: Vec<Value> = site.server.get("/api/templates").await.json();
    assert_eq!(public_list.len(), 1);
}

#[tokio::test]
async fn duplicate_template_id_conflicts() {
    let site = spawn_site();
    login(&site.server).await;

    let template = json!({
        "id": "invoice-tracker",
        "name": "Invoice Tracker",
        "price": 29,
        "shortDesc": "Track invoices"
    });
    let first = site.server.post("/api/admin/templates").json(&template).await;
    assert_eq!(first.status_code(), StatusCode::CREATED);

    let second = site.server.post("/api/admin/templates").json(&template).await;
    assert_eq!(second.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn template_validation_reports_offending_fields() {
    let site = spawn_site();
    login(&site.server).await;

    let response = site
        .server
        .post("/api/admin/templates")
        .json(&json!({
            "id": "Not Kebab",
            "name": "",
            "price": -5,
            "shortDesc": "x"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Validation failed");
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d.as_str().unwrap().starts_with("id:")));
    assert!(details.iter().any(|d| d.as_str().unwrap().starts_with("price:")));
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[tokio::test]
async fn portfolio_defaults_to_visible_and_hides_when_deactivated() {
    let site = spawn_site();
    login(&site.server).await;

    let response = site
        .server
        .post("/api/admin/portfolio")
        .json(&json!({
            "id": "bakery-dashboard",
            "title": "Bakery Dashboard",
            "shortDesc": "Weekly sales dashboard"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["project"]["active"], true);

    let public = site.server.get("/api/portfolio/bakery-dashboard").await;
    assert_eq!(public.status_code(), StatusCode::OK);

    site.server
        .patch("/api/admin/portfolio/bakery-dashboard")
        .json(&json!({"active": false}))
        .await;

    // Deactivated projects 404 publicly but stay visible to the admin
    let public = site.server.get("/api/portfolio/bakery-dashboard").await;
    assert_eq!(public.status_code(), StatusCode::NOT_FOUND);

    let admin = site.server.get("/api/admin/portfolio/bakery-dashboard").await;
    assert_eq!(admin.status_code(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Inquiries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitted_inquiry_lands_in_the_admin_list_as_new() {
    let site = spawn_site();

    let response = site.server.post("/api/inquire").json(&sample_inquiry_body()).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let inquiry_id = body["inquiryId"].as_str().unwrap().to_string();
    assert!(inquiry_id.starts_with("inquiry-"));

    login(&site.server).await;
    let list: Vec<Value> = site.server.get("/api/admin/inquiries").await.json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], inquiry_id.as_str());
    assert_eq!(list[0]["status"], "new");
    assert!(list[0].get("reviewedAt").is_none());
}

#[tokio::test]
async fn inverted_budget_range_is_rejected_with_details() {
    let site = spawn_site();

    let mut body = sample_inquiry_body();
    body["budgetLow"] = json!(2000);
    body["budgetHigh"] = json!(500);

    let response = site.server.post("/api/inquire").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Validation failed");
}

#[tokio::test]
async fn first_transition_out_of_new_stamps_reviewed_at_once() {
    let site = spawn_site();

    let submitted: Value = site
        .server
        .post("/api/inquire")
        .json(&sample_inquiry_body())
        .await
        .json();
    let id = submitted["inquiryId"].as_str().unwrap().to_string();

    login(&site.server).await;

    let checked: Value = site
        .server
        .patch(&format!("/api/admin/inquiries/{id}"))
        .json(&json!({"status": "checked"}))
        .await
        .json();
    let reviewed_at = checked["reviewedAt"].as_str().unwrap().to_string();
    assert_eq!(checked["status"], "checked");

    let dropped: Value = site
        .server
        .patch(&format!("/api/admin/inquiries/{id}"))
        .json(&json!({"status": "dropped"}))
        .await
        .json();
    assert_eq!(dropped["status"], "dropped");
    assert_eq!(dropped["reviewedAt"].as_str().unwrap(), reviewed_at);
}

#[tokio::test]
async fn update_and_delete_of_absent_ids_report_not_found() {
    let site = spawn_site();
    login(&site.server).await;

    let patched = site
        .server
        .patch("/api/admin/inquiries/inquiry-does-not-exist")
        .json(&json!({"status": "checked"}))
        .await;
    assert_eq!(patched.status_code(), StatusCode::NOT_FOUND);

    let deleted = site
        .server
        .delete("/api/admin/inquiries/inquiry-does-not-exist")
        .await;
    assert_eq!(deleted.status_code(), StatusCode::NOT_FOUND);

    // Nothing was created along the way
    let list: Vec<Value> = site.server.get("/api/admin/inquiries").await.json();
    assert!(list.is_empty());
}

#[tokio::test]
async fn deleting_an_inquiry_twice_reports_not_found_second_time() {
    let site = spawn_site();

    let submitted: Value = site
        .server
        .post("/api/inquire")
        .json(&sample_inquiry_body())
        .await
        .json();
    let id = submitted["inquiryId"].as_str().unwrap().to_string();

    login(&site.server).await;

    let first = site.server.delete(&format!("/api/admin/inquiries/{id}")).await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let second = site.server.delete(&format!("/api/admin/inquiries/{id}")).await;
    assert_eq!(second.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn inquiry_search_filters_by_term_and_status() {
    let site = spawn_site();

    for (name, description) in [
        ("Dana", "Cash flow model for my bakery"),
        ("Lee", "Inventory tracker for a bike shop"),
    ] {
        let mut body = sample_inquiry_body();
        body["name"] = json!(name);
        body["description"] = json!(description);
        body["email"] = json!(format!("{}@example.com", name.to_lowercase()));
        site.server.post("/api/inquire").json(&body).await;
    }

    login(&site.server).await;

    let matches: Vec<Value> = site
        .server
        .get("/api/admin/inquiries")
        .add_query_param("q", "bakery")
        .await
        .json();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0]["name"], "Dana");

    let checked: Vec<Value> = site
        .server
        .get("/api/admin/inquiries")
        .add_query_param("status", "checked")
        .await
        .json();
    assert!(checked.is_empty());
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "sheetsmith-test-boundary";

fn multipart_body() -> Vec<u8> {
    let mut body = String::new();
    for (name, value) in [
        ("name", "Dana Smith"),
        ("email", "dana@example.com"),
        ("description", "Need a cash flow model for my bakery"),
        ("services", "dashboards"),
        ("hasExistingSystem", "on"),
        ("budgetLow", "500"),
        ("budgetHigh", "2000"),
    ] {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"ledger.csv\"\r\nContent-Type: text/csv\r\n\r\na,b\n1,2\r\n"
    ));
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body.into_bytes()
}

#[tokio::test]
async fn multipart_submission_saves_and_serves_the_attachment() {
    let site = spawn_site();

    let response = site
        .server
        .post("/api/inquire")
        .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
        .bytes(multipart_body().into())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    login(&site.server).await;

    let list: Vec<Value> = site.server.get("/api/admin/inquiries").await.json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["hasExistingSystem"], true);
    assert_eq!(list[0]["budgetLow"].as_f64(), Some(500.0));

    let file_path = list[0]["filePath"].as_str().unwrap().to_string();
    assert!(file_path.starts_with("uploads/inquiry-"));
    assert!(file_path.ends_with(".csv"));

    let served = site
        .server
        .get(&format!("/api/admin/files/{file_path}"))
        .await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(
        served.headers().get(header::CONTENT_TYPE).unwrap(),
        &HeaderValue::from_static("text/csv")
    );
    assert_eq!(served.as_bytes().as_ref(), b"a,b\n1,2");
}

#[tokio::test]
async fn traversal_paths_on_the_file_endpoint_are_rejected() {
    let site = spawn_site();
    login(&site.server).await;

    let response = site
        .server
        .get("/api/admin/files/..%2F..%2Fetc%2Fpasswd")
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn file_endpoint_requires_a_session() {
    let site = spawn_site();

    let response = site.server.get("/api/admin/files/uploads/inquiry-1.pdf").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
