use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

// --- Role Labels ---

/// Role granted to the standard demo account. Required by GET /user.
pub const ROLE_USER: &str = "USER";

/// Role granted to the administrative demo account. Required by GET /admin.
pub const ROLE_ADMIN: &str = "ADMIN";

/// Principal
///
/// Represents one credentialed identity held by the in-memory credential store.
/// Created once at startup and never mutated or destroyed afterwards; the store
/// exposes only lookups, so a Principal lives for the whole process.
///
/// Note: Serialize is intentionally NOT derived. The password hash must never be
/// able to reach a response body or a JSON log line through serde.
#[derive(Debug, Clone)]
pub struct Principal {
    // The unique login name. Uniqueness is enforced by the store's map key.
    pub username: String,
    // Salted adaptive hash (bcrypt) of the account password, computed at seed time.
    pub password_hash: String,
    // The RBAC field: set of coarse-grained role labels ("USER", "ADMIN").
    pub roles: HashSet<String>,
}

/// UserProfile
///
/// The serializable projection of an authenticated principal returned by GET /me.
/// Roles are sorted so the JSON shape is deterministic for clients and tests.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub username: String,
    pub roles: Vec<String>,
}
