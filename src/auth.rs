use axum::{
    extract::{FromRef, FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::collections::HashSet;
use std::convert::Infallible;
use thiserror::Error;

use crate::{config::DEFAULT_REALM, credentials::CredentialState, models::UserProfile};

/// AuthError
///
/// The full failure taxonomy of the request gate. Five variants exist internally
/// (and are visible in tracing output), but they collapse to exactly two
/// caller-visible outcomes: any authentication failure becomes a 401 challenge,
/// and only `InsufficientRole` becomes a 403. A client can never tell a wrong
/// password from an unknown username or a garbled header.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No Authorization header was presented on a protected path.
    #[error("missing credentials: Authorization header required")]
    MissingCredentials,
    /// The Authorization header was present but not a decodable Basic payload.
    #[error("malformed Authorization header")]
    MalformedHeader,
    /// The supplied username resolves to no principal.
    #[error("unknown user")]
    UnknownUser,
    /// The principal exists but the supplied password failed verification.
    #[error("password verification failed")]
    BadPassword,
    /// Authentication succeeded but the principal lacks the required role.
    #[error("insufficient role: requires '{0}'")]
    InsufficientRole(String),
}

impl AuthError {
    /// The caller-visible status for this failure: 403 for a role shortfall,
    /// 401 for everything else.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InsufficientRole(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// challenge
    ///
    /// Renders the failure as an HTTP response. 401 responses carry the
    /// `WWW-Authenticate: Basic` challenge with the configured realm so browsers
    /// and HTTP clients know to retry with credentials; 403 responses are an
    /// empty body with no challenge (re-authenticating would not help).
    pub fn challenge(&self, realm: &str) -> Response {
        match self {
            AuthError::InsufficientRole(_) => StatusCode::FORBIDDEN.into_response(),
            _ => (
                StatusCode::UNAUTHORIZED,
                [(
                    header::WWW_AUTHENTICATE,
                    format!("Basic realm=\"{realm}\""),
                )],
            )
                .into_response(),
        }
    }
}

impl IntoResponse for AuthError {
    // Extractor rejections fall back to the default realm; the gate middleware
    // builds its responses through `challenge` with the configured realm.
    fn into_response(self) -> Response {
        self.challenge(DEFAULT_REALM)
    }
}

/// AuthUser
///
/// This struct represents the resolved identity of an authenticated request.
/// It is the core output of the authentication routine and of the AuthUser
/// extractor implementation. Handlers use it to read the caller's username and
/// role claims; the gate uses it for the route-policy role check.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The unique login name of the principal.
    pub username: String,
    /// The principal's role claims ("USER", "ADMIN"). Used for Role-Based Access Control.
    pub roles: HashSet<String>,
}

impl AuthUser {
    /// Whether this principal holds the given role label.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// The serializable projection served by GET /me, with roles sorted for a
    /// deterministic JSON shape.
    pub fn profile(&self) -> UserProfile {
        let mut roles: Vec<String> = self.roles.iter().cloned().collect();
        roles.sort();
        UserProfile {
            username: self.username.clone(),
            roles,
        }
    }
}

/// authenticate
///
/// The authentication half of the request gate, as a pure function over the
/// request headers and the credential store. No state is read or written
/// anywhere else, which is what makes every request independently and
/// statelessly authenticated.
///
/// The entire process involves:
/// 1. Header Extraction: the Authorization header must be present and ASCII.
/// 2. Scheme Check: only the `Basic` scheme is accepted (case-insensitive).
/// 3. Payload Decode: base64 to UTF-8, then split on the FIRST colon, so
///    passwords may themselves contain colons per RFC 7617.
/// 4. Principal Lookup: a miss burns a fallback bcrypt verification so unknown
///    usernames cost the same as wrong passwords.
/// 5. Password Verification: bcrypt's verify routine performs the comparison in
///    constant time against the stored salted hash.
pub fn authenticate(
    headers: &HeaderMap,
    store: &CredentialState,
) -> Result<AuthUser, AuthError> {
    // 1. Header Extraction
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    // 2. Scheme Check
    let (scheme, payload) = auth_header
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MalformedHeader);
    }

    // 3. Payload Decode
    let decoded = STANDARD
        .decode(payload.trim())
        .map_err(|_| AuthError::MalformedHeader)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedHeader)?;
    let (username, password) = decoded.split_once(':').ok_or(AuthError::MalformedHeader)?;

    // 4. Principal Lookup
    let principal = match store.lookup(username) {
        Some(principal) => principal,
        None => {
            store.verify_fallback(password);
            return Err(AuthError::UnknownUser);
        }
    };

    // 5. Password Verification
    if !bcrypt::verify(password, &principal.password_hash).unwrap_or(false) {
        return Err(AuthError::BadPassword);
    }

    Ok(AuthUser {
        username: principal.username.clone(),
        roles: principal.roles.clone(),
    })
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a function
/// argument in any handler that requires an identity. This cleanly separates
/// authentication (gate middleware / extractor) from the handler's own logic.
///
/// The gate middleware stores the identity it resolved in the request extensions;
/// the extractor reuses that result rather than paying a second bcrypt
/// verification. When the gate did not run authentication (the permit-all
/// deployment profile), the extractor performs the full Basic flow itself, so
/// identity-bearing endpoints stay protected under every profile.
///
/// Rejection: `AuthError`, rendered as 401 with a Basic challenge.
impl<S> FromRequestParts<S> for AuthUser
where
    // S must allow sending across threads and sharing.
    S: Send + Sync,
    // Allows the extractor to pull the credential store from the app state.
    CredentialState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let store = CredentialState::from_ref(state);
        authenticate(&parts.headers, &store)
    }
}

/// Optional AuthUser Extractor
///
/// Lets handlers accept `Option<AuthUser>`: the identity when one can be
/// resolved, `None` otherwise. Used by the greeting handlers, which serve a
/// fixed body regardless of who asks but log the caller when known. Never
/// rejects, so anonymous requests under the permit-all profile pass through.
impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    CredentialState: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(Some(user.clone()));
        }

        let store = CredentialState::from_ref(state);
        Ok(authenticate(&parts.headers, &store).ok())
    }
}
