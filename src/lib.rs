use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod credentials;
pub mod handlers;
pub mod models;
pub mod policy;

// Module for routing segregation (Public, Authenticated, User, Admin).
pub mod routes;
use auth::AuthUser; // The resolved authenticated request identity.
use policy::Access;
use routes::{admin, authenticated, public, user};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use credentials::{CredentialState, InMemoryUsers};
pub use policy::PolicyTable;

/// ApiDoc
///
/// This struct auto-generates the OpenAPI documentation (Swagger JSON) for the application.
/// It aggregates all API paths and data schemas that have been decorated with
/// the `#[utoipa::path]` and `#[derive(utoipa::ToSchema)]` macros.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    // List all public handler functions here for documentation generation.
    paths(
        handlers::greet,
        handlers::greet_user,
        handlers::greet_admin,
        handlers::get_me
    ),
    // List all models (schemas) used in the response bodies.
    components(schemas(models::UserProfile)),
    tags(
        (name = "hello-portal", description = "Role-gated greeting API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Implements the **Unified State Pattern**. This is the single, thread-safe, and immutable
/// container holding all essential application services and configuration.
/// The application state is shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Credential Store: the read-only principal set built at startup.
    pub credentials: CredentialState,
    /// Policy Table: the ordered route policy selected by the deployment profile.
    pub policy: std::sync::Arc<PolicyTable>,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Allows the AuthUser extractor to pull just the credential store out of the
// shared AppState without coupling it to the rest of the state.

impl FromRef<AppState> for CredentialState {
    fn from_ref(app_state: &AppState) -> CredentialState {
        app_state.credentials.clone()
    }
}

/// security_middleware
///
/// The request gate, composed ahead of every route handler. Per request it runs
/// the full decision pipeline with no shared mutable state:
///
/// 1. Policy Match: the ordered table is evaluated against the full request
///    path; the first matching rule decides the access requirement.
/// 2. Authentication: unless the rule is PermitAll, the Basic credentials are
///    extracted and verified against the credential store. Failure rejects with
///    a 401 challenge before any handler runs.
/// 3. Authorization: a Role rule additionally checks the principal's role set.
///    Failure rejects with 403.
/// 4. Dispatch: the resolved identity is stored in the request extensions for
///    handlers, and the request proceeds.
///
/// Every request repeats the whole pipeline; nothing is remembered between
/// requests and no session is ever created.
async fn security_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    match state.policy.decide(&path) {
        Access::PermitAll => next.run(request).await,
        access => {
            // Authentication
            let user = match auth::authenticate(request.headers(), &state.credentials) {
                Ok(user) => user,
                Err(err) => {
                    tracing::warn!(path = %path, error = %err, "request rejected");
                    return err.challenge(&state.config.realm);
                }
            };

            // Authorization
            if let Access::Role(role) = &access {
                if !user.has_role(role) {
                    let err = auth::AuthError::InsufficientRole(role.clone());
                    tracing::warn!(path = %path, user = %user.username, error = %err, "request rejected");
                    return err.challenge(&state.config.realm);
                }
            }

            tracing::debug!(path = %path, user = %user.username, "request authorized");
            request.extensions_mut().insert::<AuthUser>(user);
            next.run(request).await
        }
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies the gate and
/// global middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Access-tier route modules. Registration order is irrelevant: the gate
        // below enforces access from the ordered policy table, not from module
        // placement.
        .merge(public::public_routes())
        .merge(authenticated::authenticated_routes())
        .merge(user::user_routes())
        .merge(admin::admin_routes())
        // The Request Gate: wraps every route above, including unknown paths,
        // so a protected pattern can never be bypassed. Unknown paths still
        // authenticate against the catch-all rule before they can 404.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_middleware,
        ))
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (Applied outermost/first)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: Generates a unique UUID for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: Wraps the entire request/response lifecycle in a tracing span.
                // Uses the `trace_span_logger` to include the generated request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: Ensures the generated x-request-id header is
                // returned to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer (Applied last, allowing all traffic in/out after processing)
        .layer(cors)
}

/// trace_span_logger
///
/// Helper function used by `TraceLayer` to customize the tracing span creation.
/// It extracts the `x-request-id` header (if present) and includes it in the
/// structured logging metadata alongside the HTTP method and URI.
///
/// *Goal*: Ensure every log line for a single request is correlated by a unique ID.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    // The structured log format used by the tracing macros.
    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
