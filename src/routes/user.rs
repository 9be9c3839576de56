use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// User Router Module
///
/// Defines the routes reserved for principals holding the USER role. The role
/// requirement lives in the policy table (`/user` → Role("USER")); a principal
/// authenticating with any other role set receives a 403 from the gate.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // GET /user
        // Greeting for the standard role. Note that ADMIN does not imply USER:
        // a role is held only if explicitly granted.
        .route("/user", get(handlers::greet_user))
}
