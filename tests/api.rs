use report_log::config::Credentials;
use report_log::storage::ReportStore;
use report_log::{build_router, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Serves the app on an ephemeral port against a throwaway store file and
/// returns the base URL.
async fn spawn_server(store_path: PathBuf) -> String {
    let state = Arc::new(AppState {
        store: ReportStore::new(store_path),
        credentials: Credentials {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        },
    });

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    format!("http://{}", addr)
}

/// Redirects are left unfollowed so the redirect-to-login behavior of
/// protected routes is assertable.
fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

async fn login(client: &reqwest::Client, base: &str) -> String {
    let response = client
        .post(format!("{}/login", base))
        .json(&json!({"username": "admin", "password": "hunter2"}))
        .send()
        .await
        .expect("login request");

    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("auth cookie")
        .to_string();

    let body: Value = response.json().await.expect("login body");
    assert_eq!(body["success"], json!(true));

    cookie
}

async fn submit(client: &reqwest::Client, base: &str, cookie: &str, name: &str) -> Value {
    let response = client
        .post(format!("{}/api/reports", base))
        .header(reqwest::header::COOKIE, cookie)
        .json(&json!({"name": name, "reason": "testing", "date": "2026-08-25"}))
        .send()
        .await
        .expect("submit request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("submit body");
    assert_eq!(body["success"], json!(true));
    body
}

#[tokio::test]
async fn protected_routes_redirect_without_session() {
    let dir = tempdir().expect("tempdir");
    let base = spawn_server(dir.path().join("reports.json")).await;
    let client = client();

    for path in [
        "/dashboard",
        "/new-report",
        "/total-count",
        "/report-history",
        "/report/123",
        "/api/reports",
        "/api/reports/123",
        "/api/reports-count",
    ] {
        let response = client
            .get(format!("{}{}", base, path))
            .send()
            .await
            .expect("request");
        assert!(
            response.status().is_redirection(),
            "{} should redirect, got {}",
            path,
            response.status()
        );
        assert_eq!(
            response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/")
        );
    }
}

#[tokio::test]
async fn bad_credentials_do_not_open_a_session() {
    let dir = tempdir().expect("tempdir");
    let base = spawn_server(dir.path().join("reports.json")).await;
    let client = client();

    let response = client
        .post(format!("{}/login", base))
        .json(&json!({"username": "admin", "password": "wrong"}))
        .send()
        .await
        .expect("login request");

    assert!(response.status().is_success());
    assert!(response.headers().get(reqwest::header::SET_COOKIE).is_none());

    let body: Value = response.json().await.expect("body");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Invalid credentials"));

    // Still gated.
    let response = client
        .get(format!("{}/api/reports", base))
        .send()
        .await
        .expect("request");
    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn login_opens_a_session_for_the_api() {
    let dir = tempdir().expect("tempdir");
    let base = spawn_server(dir.path().join("reports.json")).await;
    let client = client();

    let cookie = login(&client, &base).await;
    assert!(cookie.starts_with("auth="));

    let response = client
        .get(format!("{}/api/reports", base))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .expect("request");
    assert!(response.status().is_success());

    let reports: Value = response.json().await.expect("body");
    assert_eq!(reports, json!([]));

    // Root redirects an authenticated session to the dashboard.
    let response = client
        .get(format!("{}/", base))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .expect("request");
    assert!(response.status().is_redirection());
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/dashboard")
    );
}

#[tokio::test]
async fn submit_list_count_and_lookup() {
    let dir = tempdir().expect("tempdir");
    let base = spawn_server(dir.path().join("reports.json")).await;
    let client = client();
    let cookie = login(&client, &base).await;

    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let body = submit(&client, &base, &cookie, name).await;
        ids.push(body["report"]["id"].as_str().expect("id").to_string());
        // Ids are millisecond timestamps; keep submissions apart.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let reports: Value = client
        .get(format!("{}/api/reports", base))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .expect("list request")
        .json()
        .await
        .expect("list body");

    let names: Vec<&str> = reports
        .as_array()
        .expect("array")
        .iter()
        .map(|r| r["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, ["C", "B", "A"]);

    let count: Value = client
        .get(format!("{}/api/reports-count", base))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .expect("count request")
        .json()
        .await
        .expect("count body");
    assert_eq!(count, json!({"count": 3}));

    let c_id = &ids[2];
    let response = client
        .get(format!("{}/api/reports/{}", base, c_id))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .expect("lookup request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("lookup body");
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["report"]["name"], json!("C"));
    assert_eq!(body["report"]["reason"], json!("testing"));

    let response = client
        .get(format!("{}/api/reports/does-not-exist", base))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .expect("missing lookup");
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("missing body");
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Report not found"));
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let dir = tempdir().expect("tempdir");
    let base = spawn_server(dir.path().join("reports.json")).await;
    let client = client();
    let cookie = login(&client, &base).await;

    let response = client
        .post(format!("{}/logout", base))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .expect("logout request");

    let cleared = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("clear cookie")
        .to_string();
    assert!(cleared.contains("Max-Age=0"));

    let body: Value = response.json().await.expect("logout body");
    assert_eq!(body["success"], json!(true));

    // An honest client now holds the cleared cookie.
    let cleared_pair = cleared.split(';').next().expect("pair");
    let response = client
        .get(format!("{}/api/reports", base))
        .header(reqwest::header::COOKIE, cleared_pair)
        .send()
        .await
        .expect("request");
    assert!(response.status().is_redirection());
}
