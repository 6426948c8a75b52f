use crate::auth;
use crate::config::Credentials;
use crate::models::{
    CountResponse, CreateReportRequest, LoginRequest, Report, ReportResponse, StatusResponse,
};
use crate::storage::ReportStore;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeFile;

const VIEWS_DIR: &str = "views";

pub struct AppState {
    pub store: ReportStore,
    pub credentials: Credentials,
}

fn page(name: &str) -> PathBuf {
    PathBuf::from(VIEWS_DIR).join(format!("{}.html", name))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let pages = Router::new()
        .route_service("/dashboard", ServeFile::new(page("dashboard")))
        .route_service("/new-report", ServeFile::new(page("new-report")))
        .route_service("/total-count", ServeFile::new(page("total-count")))
        .route_service("/report-history", ServeFile::new(page("report-history")))
        // The detail page is the same static file for every id; rendering is
        // client-side from /api/reports/:id.
        .route_service("/report/:id", ServeFile::new(page("report-detail")));

    let api = Router::new()
        .route("/api/reports", post(create_report).get(list_reports))
        .route("/api/reports/:id", get(get_report))
        .route("/api/reports-count", get(report_count));

    Router::new()
        .route("/", get(index))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(pages.layer(middleware::from_fn(auth::require_auth)))
        .merge(api.layer(middleware::from_fn(auth::require_auth)))
        .with_state(state)
}

async fn index(headers: HeaderMap) -> Response {
    if auth::is_authenticated(&headers) {
        return Redirect::to("/dashboard").into_response();
    }

    match tokio::fs::read_to_string(page("login")).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!("failed to read login page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Login page unavailable").into_response()
        }
    }
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    if state
        .credentials
        .verify(&payload.username, &payload.password)
    {
        (
            [(header::SET_COOKIE, auth::session_cookie())],
            Json(StatusResponse::ok()),
        )
            .into_response()
    } else {
        Json(StatusResponse::failed("Invalid credentials")).into_response()
    }
}

async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, auth::clear_cookie())],
        Json(StatusResponse::ok()),
    )
}

async fn create_report(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<Json<ReportResponse>, (StatusCode, String)> {
    let report = state
        .store
        .append(payload.name, payload.reason, payload.date)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to save report: {}", e),
            )
        })?;

    Ok(Json(ReportResponse {
        success: true,
        report,
    }))
}

async fn list_reports(State(state): State<Arc<AppState>>) -> Json<Vec<Report>> {
    Json(state.store.list().await)
}

async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.find_by_id(&id).await {
        Some(report) => Json(ReportResponse {
            success: true,
            report,
        })
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(StatusResponse::failed("Report not found")),
        )
            .into_response(),
    }
}

async fn report_count(State(state): State<Arc<AppState>>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.store.count().await,
    })
}
