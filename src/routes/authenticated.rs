use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Defines the routes accessible to any principal that has passed the
/// authentication layer, with no particular role required. The gate resolves
/// the identity before dispatch and stores it in the request extensions, where
/// the `AuthUser` extractor picks it up.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET /hello
        // The plain greeting, served to any authenticated principal.
        .route("/hello", get(handlers::greet))
        // GET /me
        // Returns the caller's own resolved profile (username and roles).
        .route("/me", get(handlers::get_me))
}
