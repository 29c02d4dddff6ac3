use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::AppendHeaders,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{cookie_value, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    models::{LoginRequest, RefreshRequest, RegisterRequest, RegisterResponse, UserResponse},
    services::{accounts, SessionClaims},
    state::AppState,
};

const ACCESS_COOKIE_MAX_AGE: i64 = 24 * 60 * 60;
const REFRESH_COOKIE_MAX_AGE: i64 = 7 * 24 * 60 * 60;

type SessionCookies = AppendHeaders<[(HeaderName, String); 2]>;

fn cookie(name: &str, value: &str, max_age: i64) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        name, value, max_age
    )
}

fn session_cookies(session: &UserResponse) -> SessionCookies {
    AppendHeaders([
        (
            header::SET_COOKIE,
            cookie(ACCESS_TOKEN_COOKIE, &session.token, ACCESS_COOKIE_MAX_AGE),
        ),
        (
            header::SET_COOKIE,
            cookie(REFRESH_TOKEN_COOKIE, &session.refresh_token, REFRESH_COOKIE_MAX_AGE),
        ),
    ])
}

fn expired_cookies() -> SessionCookies {
    AppendHeaders([
        (header::SET_COOKIE, cookie(ACCESS_TOKEN_COOKIE, "", 0)),
        (header::SET_COOKIE, cookie(REFRESH_TOKEN_COOKIE, "", 0)),
    ])
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let response = accounts::register(state.users.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<(SessionCookies, Json<UserResponse>)> {
    let session = accounts::login(state.users.as_ref(), &state.tokens, request).await?;
    Ok((session_cookies(&session), Json(session)))
}

/// The refresh token comes from the cookie, or from the JSON body
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> AppResult<(SessionCookies, Json<UserResponse>)> {
    let refresh_token = cookie_value(&headers, REFRESH_TOKEN_COOKIE)
        .or_else(|| body.and_then(|Json(b)| b.refresh_token))
        .ok_or_else(|| AppError::Unauthorized("Refresh token required".to_string()))?;

    let session = accounts::refresh(state.users.as_ref(), &state.tokens, &refresh_token).await?;
    Ok((session_cookies(&session), Json(session)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<SessionClaims>,
) -> AppResult<(SessionCookies, Json<Value>)> {
    accounts::logout(state.users.as_ref(), &claims.user_id).await?;
    Ok((
        expired_cookies(),
        Json(json!({ "message": "Logged out successfully" })),
    ))
}
