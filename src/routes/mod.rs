//! HTTP route handlers.
//!
//! Three routes: the liveness check at `/`, contact submission, and the
//! database probe. API responses are marked `no-store`. CORS is fully
//! permissive (any origin, method and header, with credentials) since the
//! contact form is called from the public portfolio site.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod contact;
pub mod probe;
pub mod root;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// CORS policy allowing every origin, method and header, with credentials.
///
/// Wildcards cannot be combined with credentials, so the request's own values
/// are mirrored back instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Creates the Axum router with all routes, CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    // Liveness - static payload
    let root_routes = Router::new().route("/", get(root::index));

    // API - never cached, each call has side effects
    let api_routes = Router::new()
        .route("/contact", post(contact::submit))
        .route("/test", get(probe::test_database))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    Router::new()
        .merge(root_routes)
        .merge(api_routes)
        .with_state(state)
        .layer(cors_layer())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
