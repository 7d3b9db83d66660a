use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, header::COOKIE, header::SET_COOKIE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::engine::{Engine, general_purpose::STANDARD_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use std::time::Duration;
use tracing::warn;

const SESSION_COOKIE_NAME: &str = "academy_session";
const SESSION_TTL_HOURS: u64 = 12;

type HmacSha256 = Hmac<Sha256>;

pub fn urls() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    username: Option<String>,
    password: Option<String>,
}

/// POST /api/auth/login — admin credentials come from configuration, are
/// compared server-side, and a signed session cookie is issued on success.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<Response> {
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    if username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::validation("username and password are required"));
    }

    let Some(admin) = state.config.admin.as_ref() else {
        warn!("login attempt but no admin account is configured");
        return Err(ApiError::validation("admin login is not configured"));
    };

    if admin.username != username.trim() || admin.password != password {
        return Err(ApiError::validation("invalid credentials"));
    }

    let mut response = Json(json!({ "success": true })).into_response();
    if let Some(header) = session_cookie_header(&state) {
        response.headers_mut().append(SET_COOKIE, header);
    }
    Ok(response)
}

async fn logout() -> Response {
    let mut response = Json(json!({ "success": true })).into_response();
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    );
    if let Ok(header) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, header);
    }
    response
}

async fn session(State(state): State<AppState>, headers: HeaderMap) -> Json<serde_json::Value> {
    let authenticated = extract_session_cookie(&headers)
        .map(|value| verify_session(&state, &value))
        .unwrap_or(false);
    Json(json!({ "authenticated": authenticated }))
}

fn sign(state: &AppState, payload: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(state.session_key.as_slice()).ok()?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();
    Some(STANDARD_NO_PAD.encode(signature))
}

fn session_cookie_header(state: &AppState) -> Option<HeaderValue> {
    let expires_at = Utc::now() + Duration::from_secs(SESSION_TTL_HOURS * 3600);
    let payload = format!("admin:{}", expires_at.timestamp());
    let signature = match sign(state, &payload) {
        Some(sig) => sig,
        None => {
            warn!("failed to sign session payload");
            return None;
        }
    };
    let cookie = format!(
        "{}={}:{}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME,
        payload,
        signature,
        SESSION_TTL_HOURS * 3600
    );
    match HeaderValue::from_str(&cookie) {
        Ok(header) => Some(header),
        Err(err) => {
            warn!("failed to build session cookie header: {}", err);
            None
        }
    }
}

fn verify_session(state: &AppState, cookie_value: &str) -> bool {
    let mut segments = cookie_value.split(':');
    let (Some(subject), Some(expires), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return false;
    };
    let Ok(expires_ts) = expires.parse::<i64>() else {
        return false;
    };
    if subject != "admin" || expires_ts <= Utc::now().timestamp() {
        return false;
    }
    let payload = format!("{}:{}", subject, expires);
    match sign(state, &payload) {
        Some(expected) => expected == signature,
        None => false,
    }
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    for cookie_header in headers.get_all(COOKIE) {
        if let Ok(s) = cookie_header.to_str() {
            let found = s.split(';').find_map(|pair| {
                let mut parts = pair.trim().splitn(2, '=');
                let key = parts.next()?.trim();
                if key == SESSION_COOKIE_NAME {
                    Some(parts.next().unwrap_or("").trim().to_string())
                } else {
                    None
                }
            });
            if found.is_some() {
                return found;
            }
        }
    }
    None
}
