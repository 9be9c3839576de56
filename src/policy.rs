use crate::config::AuthProfile;
use crate::models::{ROLE_ADMIN, ROLE_USER};

/// Access
///
/// The access requirement attached to a route pattern.
///
/// `Authenticated` is the "no required role" case: any principal that presents
/// valid credentials passes. `Role` additionally demands that the principal's
/// role set contains the named label.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// No credentials required; the request gate waves the request through.
    PermitAll,
    /// Valid credentials required, any role accepted.
    Authenticated,
    /// Valid credentials required and the given role must be held.
    Role(String),
}

/// RoutePolicy
///
/// One ordered entry of the policy table: a path pattern paired with the access
/// requirement enforced once that pattern matches.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    pub pattern: String,
    pub access: Access,
}

impl RoutePolicy {
    pub fn permit(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            access: Access::PermitAll,
        }
    }

    pub fn authenticated(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            access: Access::Authenticated,
        }
    }

    pub fn role(pattern: &str, role: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            access: Access::Role(role.to_string()),
        }
    }
}

/// PolicyTable
///
/// The ordered route policy evaluated by the request gate. Patterns are checked
/// top-to-bottom against the full request path and the first match wins, so a
/// protected pattern placed above a broader one can never be bypassed.
///
/// A path matching no rule resolves to `Authenticated`: the table is
/// deny-by-default, and an empty table protects everything.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    rules: Vec<RoutePolicy>,
}

impl PolicyTable {
    pub fn new(rules: Vec<RoutePolicy>) -> Self {
        Self { rules }
    }

    /// enforced
    ///
    /// The standard deployment table. Health and documentation surfaces stay
    /// open; every greeting route requires authentication, with `/user` and
    /// `/admin` additionally gated by role; the trailing catch-all keeps any
    /// unlisted path behind authentication.
    pub fn enforced() -> Self {
        Self::new(vec![
            RoutePolicy::permit("/health"),
            RoutePolicy::permit("/swagger-ui/*"),
            RoutePolicy::permit("/api-docs/*"),
            RoutePolicy::authenticated("/hello"),
            RoutePolicy::role("/user", ROLE_USER),
            RoutePolicy::role("/admin", ROLE_ADMIN),
            RoutePolicy::authenticated("/me"),
            RoutePolicy::authenticated("/*"),
        ])
    }

    /// permit_all
    ///
    /// The wide-open demo table: a single catch-all rule that disables the gate.
    /// Handlers that need a resolved principal still challenge on their own.
    pub fn permit_all() -> Self {
        Self::new(vec![RoutePolicy::permit("/*")])
    }

    /// Selects the table for a configured deployment profile.
    pub fn for_profile(profile: &AuthProfile) -> Self {
        match profile {
            AuthProfile::Enforced => Self::enforced(),
            AuthProfile::PermitAll => Self::permit_all(),
        }
    }

    /// decide
    ///
    /// Evaluates the table against a full request path. Pure: no request state
    /// beyond the path is consulted and nothing is mutated.
    pub fn decide(&self, path: &str) -> Access {
        for rule in &self.rules {
            if pattern_matches(&rule.pattern, path) {
                return rule.access.clone();
            }
        }
        Access::Authenticated
    }

    pub fn rules(&self) -> &[RoutePolicy] {
        &self.rules
    }
}

/// pattern_matches
///
/// Pattern semantics: a literal pattern matches exactly one path. A pattern
/// ending in `/*` matches the bare prefix itself and anything nested below it,
/// and the bare `/*` matches every path. A literal never matches a mere string
/// extension of itself (`/user` does not match `/username`).
fn pattern_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix("/*") {
        Some("") => true,
        Some(prefix) => {
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        None => path == pattern,
    }
}
