use std::env;

/// Default Basic-auth realm reported in `WWW-Authenticate` challenges when no
/// explicit realm has been configured.
pub const DEFAULT_REALM: &str = "hello-portal";

/// AppConfig
///
/// Holds the application's entire configuration state. This struct is designed to be
/// immutable once loaded, ensuring consistency across all threads and services
/// (the credential store and the request gate). It is pulled into the application
/// state via FromRef, embodying the "immutable AppConfig" part of the Unified State Pattern.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log formatting and hashing cost.
    pub env: Env,
    // Security posture: full enforcement or the wide-open demo profile.
    pub profile: AuthProfile,
    // Realm string advertised in the Basic authentication challenge.
    pub realm: String,
    // Work factor used when hashing the seeded passwords at startup.
    pub bcrypt_cost: u32,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (pretty logs, cheap hashing) and production-grade settings (JSON logs, full
/// bcrypt work factor).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// AuthProfile
///
/// Selects which access policy table is installed at startup.
///
/// The service ships with two deployment profiles: `Enforced` applies the full
/// authentication and role policy, while `PermitAll` waves every request through
/// unauthenticated. The profile is pure configuration; both profiles run the exact
/// same request pipeline against a different policy table.
#[derive(Clone, PartialEq, Debug)]
pub enum AuthProfile {
    Enforced,
    PermitAll,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup.
    /// This allows us to instantiate the configuration without needing to set environment
    /// variables for lightweight unit or integration testing state scaffolding.
    fn default() -> Self {
        Self {
            env: Env::Local,
            profile: AuthProfile::Enforced,
            realm: DEFAULT_REALM.to_string(),
            // Minimum bcrypt cost keeps test startup fast.
            bcrypt_cost: 4,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at startup.
    /// It reads all parameters from environment variables, falling back to safe local
    /// defaults. Unlike a database-backed service there are no mandatory secrets here:
    /// the credential set is fixed and baked in, so every variable has a usable default.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let profile_str = env::var("AUTH_PROFILE").unwrap_or_else(|_| "enforced".to_string());
        let profile = match profile_str.as_str() {
            "permit-all" => AuthProfile::PermitAll,
            _ => AuthProfile::Enforced,
        };

        let realm = env::var("AUTH_REALM").unwrap_or_else(|_| DEFAULT_REALM.to_string());

        // Hashing cost resolution: production always pays the full work factor.
        // Local boots hash at the bcrypt minimum so repeated dev restarts stay snappy.
        let bcrypt_cost = match env {
            Env::Production => bcrypt::DEFAULT_COST,
            Env::Local => 4,
        };

        Self {
            env,
            profile,
            realm,
            bcrypt_cost,
        }
    }
}
