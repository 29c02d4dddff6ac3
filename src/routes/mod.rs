use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware, require_session},
    state::AppState,
};

pub mod genres;
pub mod movies;
pub mod recommendations;
pub mod users;

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/movie/:imdb_id", get(movies::get_movie))
        .route("/addmovie", post(movies::add_movie))
        .route("/recommendedmovies", get(recommendations::recommended))
        .route("/updatereview/:imdb_id", patch(movies::update_review))
        .route("/logout", post(users::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/refresh", post(users::refresh))
        .route("/movies", get(movies::list_movies))
        .route("/genres", get(genres::list_genres))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&state.config.origins()))
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// Explicit origins get credentialed CORS; a `*` entry switches to any origin
/// without credentials, since browsers reject that combination
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.iter().any(|o| o == "*") {
        tracing::warn!("Wildcard CORS origin configured, cookies will not be sent cross-origin");
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
