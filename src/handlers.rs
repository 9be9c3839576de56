use axum::Json;

use crate::{auth::AuthUser, models::UserProfile};

// --- Handlers ---
//
// Every response body here is a fixed literal; the interesting work (policy
// matching, authentication, role checks) happens in the gate before a handler
// ever runs. Handlers take `Option<AuthUser>` purely to log who is being
// greeted, which also keeps them servable under the permit-all profile.

/// greet
///
/// [Authenticated Route] The plain greeting. Any principal that authenticates
/// may call this; no role is required.
#[utoipa::path(
    get,
    path = "/hello",
    responses(
        (status = 200, description = "Greeting", body = String),
        (status = 401, description = "Missing or invalid credentials")
    )
)]
pub async fn greet(user: Option<AuthUser>) -> &'static str {
    if let Some(user) = user {
        tracing::debug!(user = %user.username, "serving greeting");
    }
    "Hello!"
}

/// greet_user
///
/// [USER Route] Greeting reserved for principals holding the USER role.
/// The role check is enforced by the gate's policy table before dispatch.
#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "User greeting", body = String),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Authenticated but lacking the USER role")
    )
)]
pub async fn greet_user(user: Option<AuthUser>) -> &'static str {
    if let Some(user) = user {
        tracing::debug!(user = %user.username, "serving user greeting");
    }
    "Hello User!"
}

/// greet_admin
///
/// [ADMIN Route] Greeting reserved for principals holding the ADMIN role.
#[utoipa::path(
    get,
    path = "/admin",
    responses(
        (status = 200, description = "Admin greeting", body = String),
        (status = 401, description = "Missing or invalid credentials"),
        (status = 403, description = "Authenticated but lacking the ADMIN role")
    )
)]
pub async fn greet_admin(user: Option<AuthUser>) -> &'static str {
    if let Some(user) = user {
        tracing::debug!(user = %user.username, "serving admin greeting");
    }
    "Hello Admin!"
}

/// get_me
///
/// [Authenticated Route] Returns the authenticated caller's own profile:
/// username and sorted role claims.
///
/// *Note*: This handler requires `AuthUser` (not `Option`), so it challenges
/// with 401 even under the permit-all profile. A profile cannot be rendered
/// without a resolved principal.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Authenticated principal", body = UserProfile),
        (status = 401, description = "Missing or invalid credentials")
    )
)]
pub async fn get_me(user: AuthUser) -> Json<UserProfile> {
    Json(user.profile())
}
