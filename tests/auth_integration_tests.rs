use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, Method, Request, StatusCode, Uri, header, request::Parts},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use hello_portal::{
    AppConfig, AppState,
    auth::{AuthError, AuthUser, authenticate},
    credentials::{CredentialState, InMemoryUsers},
    models::{ROLE_ADMIN, ROLE_USER},
    policy::PolicyTable,
};
use std::collections::HashSet;
use std::sync::Arc;

// --- Helper Functions ---

// Fast hashing for tests; startup cost only.
const TEST_COST: u32 = 4;

fn seeded_store() -> CredentialState {
    Arc::new(InMemoryUsers::seeded(TEST_COST))
}

fn create_app_state(credentials: CredentialState) -> AppState {
    AppState {
        credentials,
        policy: Arc::new(PolicyTable::enforced()),
        config: AppConfig::default(),
    }
}

fn basic_header(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{username}:{password}"))
    )
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn headers_with_authorization(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(value).unwrap(),
    );
    headers
}

// --- Extractor Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_credentials() {
    let app_state = create_app_state(seeded_store());

    let mut parts = get_request_parts(Method::GET, "/hello".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&basic_header("user1", "password1")).unwrap(),
    );

    let auth_user =
        <AuthUser as FromRequestParts<AppState>>::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    let user = auth_user.unwrap();
    assert_eq!(user.username, "user1");
    assert!(user.has_role(ROLE_USER));
    assert!(!user.has_role(ROLE_ADMIN));
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let app_state = create_app_state(seeded_store());

    let mut parts = get_request_parts(Method::GET, "/hello".parse().unwrap());

    let auth_user =
        <AuthUser as FromRequestParts<AppState>>::from_request_parts(&mut parts, &app_state).await;

    assert!(matches!(&auth_user, Err(AuthError::MissingCredentials)));
    assert_eq!(
        auth_user.unwrap_err().status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_extractor_reuses_gate_resolved_identity() {
    // Empty store: if the extractor tried to authenticate it could only fail,
    // so a success proves the extension fast path is taken.
    let empty = Arc::new(InMemoryUsers::with_users(
        Vec::<(String, String, Vec<String>)>::new(),
        TEST_COST,
    )) as CredentialState;
    let app_state = create_app_state(empty);

    let mut parts = get_request_parts(Method::GET, "/me".parse().unwrap());
    parts.extensions.insert(AuthUser {
        username: "user1".to_string(),
        roles: HashSet::from([ROLE_USER.to_string()]),
    });

    let auth_user =
        <AuthUser as FromRequestParts<AppState>>::from_request_parts(&mut parts, &app_state).await;

    assert!(auth_user.is_ok());
    assert_eq!(auth_user.unwrap().username, "user1");
}

#[tokio::test]
async fn test_optional_extractor_passes_anonymous_through() {
    let app_state = create_app_state(seeded_store());

    let mut parts = get_request_parts(Method::GET, "/hello".parse().unwrap());
    let anonymous =
        <AuthUser as OptionalFromRequestParts<AppState>>::from_request_parts(&mut parts, &app_state)
            .await
            .unwrap();
    assert!(anonymous.is_none());

    let mut parts = get_request_parts(Method::GET, "/hello".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&basic_header("admin", "adminpass")).unwrap(),
    );
    let resolved =
        <AuthUser as OptionalFromRequestParts<AppState>>::from_request_parts(&mut parts, &app_state)
            .await
            .unwrap();
    assert_eq!(resolved.unwrap().username, "admin");
}

// --- authenticate() Tests ---

#[tokio::test]
async fn test_unknown_user_is_rejected() {
    let store = seeded_store();
    let headers = headers_with_authorization(&basic_header("ghost", "whatever"));

    let result = authenticate(&headers, &store);

    assert!(matches!(&result, Err(AuthError::UnknownUser)));
    assert_eq!(result.unwrap_err().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bad_password_is_rejected() {
    let store = seeded_store();
    let headers = headers_with_authorization(&basic_header("user1", "not-the-password"));

    let result = authenticate(&headers, &store);

    assert!(matches!(&result, Err(AuthError::BadPassword)));
    assert_eq!(result.unwrap_err().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_headers_are_rejected() {
    let store = seeded_store();

    let malformed = [
        // No space between scheme and payload.
        "BasicdXNlcjE6cGFzc3dvcmQx".to_string(),
        // Wrong scheme.
        format!("Bearer {}", STANDARD.encode("user1:password1")),
        // Not base64.
        "Basic !!!".to_string(),
        // Base64 but no colon in the decoded payload.
        format!("Basic {}", STANDARD.encode("user1password1")),
        // Base64 of non-UTF-8 bytes.
        format!("Basic {}", STANDARD.encode([0xffu8, 0xfe, 0xfd])),
    ];

    for value in malformed {
        let headers = headers_with_authorization(&value);
        let result = authenticate(&headers, &store);
        assert!(
            matches!(result, Err(AuthError::MalformedHeader)),
            "expected MalformedHeader for {:?}",
            value
        );
    }
}

#[tokio::test]
async fn test_scheme_is_case_insensitive() {
    let store = seeded_store();
    let headers = headers_with_authorization(&format!(
        "basic {}",
        STANDARD.encode("user1:password1")
    ));

    let result = authenticate(&headers, &store);

    assert_eq!(result.unwrap().username, "user1");
}

#[tokio::test]
async fn test_password_may_contain_colons() {
    // RFC 7617: only the first colon separates username from password.
    let store = Arc::new(InMemoryUsers::with_users(
        [(
            "alice".to_string(),
            "pa:ss:word".to_string(),
            vec![ROLE_USER.to_string()],
        )],
        TEST_COST,
    )) as CredentialState;
    let headers = headers_with_authorization(&basic_header("alice", "pa:ss:word"));

    let result = authenticate(&headers, &store);

    assert_eq!(result.unwrap().username, "alice");
}

// --- Response Shape Tests ---

#[tokio::test]
async fn test_challenge_carries_realm_on_401() {
    let response = AuthError::UnknownUser.challenge("test-realm");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .unwrap()
            .to_str()
            .unwrap(),
        "Basic realm=\"test-realm\""
    );
}

#[tokio::test]
async fn test_forbidden_has_no_challenge() {
    let response = AuthError::InsufficientRole(ROLE_ADMIN.to_string()).challenge("test-realm");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
}

// --- Store & Model Tests ---

#[tokio::test]
async fn test_seeded_store_holds_the_two_demo_principals() {
    let store = seeded_store();

    assert_eq!(store.len(), 2);
    let user1 = store.lookup("user1").unwrap();
    assert!(user1.roles.contains(ROLE_USER));
    // The plaintext never survives seeding.
    assert_ne!(user1.password_hash, "password1");

    let admin = store.lookup("admin").unwrap();
    assert!(admin.roles.contains(ROLE_ADMIN));
    assert!(store.lookup("ghost").is_none());
}

#[tokio::test]
async fn test_duplicate_usernames_collapse_to_one_principal() {
    let store = InMemoryUsers::with_users(
        [
            (
                "alice".to_string(),
                "first".to_string(),
                vec![ROLE_USER.to_string()],
            ),
            (
                "alice".to_string(),
                "second".to_string(),
                vec![ROLE_ADMIN.to_string()],
            ),
        ],
        TEST_COST,
    );

    assert_eq!(store.len(), 1);
    assert!(store.lookup("alice").unwrap().roles.contains(ROLE_ADMIN));
}

#[tokio::test]
async fn test_profile_projection_sorts_roles() {
    let user = AuthUser {
        username: "root".to_string(),
        roles: HashSet::from([ROLE_USER.to_string(), ROLE_ADMIN.to_string()]),
    };

    let profile = user.profile();

    assert_eq!(profile.username, "root");
    assert_eq!(profile.roles, vec!["ADMIN", "USER"]);
}
