use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Defines the routes exclusively accessible to principals with the ADMIN role.
///
/// Access Control:
/// The policy table maps `/admin` to Role("ADMIN"), so the gate authenticates
/// the caller and verifies the role before this router's handler is reached.
/// No unauthenticated or under-privileged request can arrive here.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        // Greeting for the administrative role.
        .route("/admin", get(handlers::greet_admin))
}
