use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, RegisterResponse},
        repo_types::SafeUser,
        service::{AuthService, USER_LOGIN_STATE},
        session::{SessionManager, SessionStore},
    },
    state::AppState,
};

/// Cookie carrying the opaque session id.
const SESSION_COOKIE: &str = "studenthub_session";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn session_cookie(id: &str) -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly"),
    )
}

fn not_logged_in() -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, "Not logged in".to_string())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, (StatusCode, String)> {
    let service = AuthService::new(state.users.clone());
    let id = service
        .register(
            &payload.student_no,
            &payload.username,
            &payload.password,
            &payload.check_password,
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "register rejected");
            (e.status(), e.to_string())
        })?;
    Ok(Json(RegisterResponse { id }))
}

/// Logs a user in. An unknown identifier or wrong password is not an error;
/// the body is a JSON `null` and no session state is written.
#[instrument(skip(state, headers, payload))]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sid = session_id(&headers).unwrap_or_else(SessionManager::new_id);
    let session = state.sessions.session(&sid).await;

    let service = AuthService::new(state.users.clone());
    let user = service
        .login(&payload.student_no, &payload.password, session.as_ref())
        .await
        .map_err(|e| {
            warn!(error = %e, "login rejected");
            (e.status(), e.to_string())
        })?;

    Ok((AppendHeaders([session_cookie(&sid)]), Json(user)))
}

/// Returns the redacted record parked in the session at login.
#[instrument(skip(state, headers))]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SafeUser>, (StatusCode, String)> {
    let Some(sid) = session_id(&headers) else {
        return Err(not_logged_in());
    };
    let session = state.sessions.session(&sid).await;
    let Some(value) = session.get_attribute(USER_LOGIN_STATE).await else {
        return Err(not_logged_in());
    };
    let user: SafeUser = serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "corrupt session attribute");
        not_logged_in()
    })?;
    Ok(Json(user))
}

#[instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    if let Some(sid) = session_id(&headers) {
        let session = state.sessions.session(&sid).await;
        session.remove_attribute(USER_LOGIN_STATE).await;
        info!("user logged out");
    }
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn session_id_parsed_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; studenthub_session=abc-123"),
        );
        assert_eq!(session_id(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn session_id_absent_when_cookie_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(session_id(&headers), None);
        assert_eq!(session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn register_response_serialization() {
        let json = serde_json::to_string(&RegisterResponse { id: 42 }).unwrap();
        assert_eq!(json, r#"{"id":42}"#);
    }
}
