use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

pub const AUTH_COOKIE: &str = "auth";

/// The cookie value marking an authenticated session. The cookie is a plain
/// marker, not a signed credential: any client that sets `auth=true` passes
/// the gate. See DESIGN.md.
const AUTH_SENTINEL: &str = "true";

/// 7 days.
const SESSION_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// `Set-Cookie` value establishing an authenticated session, site-wide, for
/// 7 days.
pub fn session_cookie() -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        AUTH_COOKIE, AUTH_SENTINEL, SESSION_MAX_AGE_SECS
    )
}

/// `Set-Cookie` value instructing the client to drop the session cookie.
pub fn clear_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", AUTH_COOKIE)
}

/// True iff the request carries a cookie whose value is exactly the
/// authenticated sentinel.
pub fn is_authenticated(headers: &HeaderMap) -> bool {
    let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    cookies
        .split(';')
        .find_map(|c| c.trim().strip_prefix("auth="))
        .map(|value| value == AUTH_SENTINEL)
        .unwrap_or(false)
}

/// Middleware guarding protected routes: unauthenticated requests are
/// redirected to the login page and never reach the handler.
pub async fn require_auth(req: Request, next: Next) -> Response {
    if is_authenticated(req.headers()) {
        next.run(req).await
    } else {
        Redirect::to("/").into_response()
    }
}
