use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::{Principal, ROLE_ADMIN, ROLE_USER};

/// CredentialState
///
/// The concrete type used to share the credential store across the application state.
/// The store is read-only after startup, so a plain Arc is sufficient; no lock is
/// needed and exactly one credential source exists, so no trait object either.
pub type CredentialState = Arc<InMemoryUsers>;

/// InMemoryUsers
///
/// The credential store: a fixed, process-lifetime mapping from username to
/// `Principal`. Populated exactly once at startup with passwords one-way-hashed
/// via bcrypt; there are no update or delete operations.
///
/// The store also keeps a `fallback_hash` that is verified against whenever a
/// lookup misses. An unknown username therefore costs the same bcrypt work as a
/// wrong password, keeping the two failures indistinguishable from outside.
pub struct InMemoryUsers {
    users: HashMap<String, Principal>,
    fallback_hash: String,
}

impl InMemoryUsers {
    /// with_users
    ///
    /// Builds a store from plaintext entries, hashing each password at the given
    /// bcrypt cost. Duplicate usernames collapse to the last entry (map-key
    /// uniqueness), matching the invariant that every username is unique.
    ///
    /// # Panics
    /// Panics if bcrypt rejects the cost parameter. Hashing happens only at
    /// startup, so a bad work factor should stop the process immediately.
    pub fn with_users<I, R>(entries: I, cost: u32) -> Self
    where
        I: IntoIterator<Item = (String, String, R)>,
        R: IntoIterator<Item = String>,
    {
        let mut users = HashMap::new();
        for (username, password, roles) in entries {
            let password_hash = bcrypt::hash(&password, cost)
                .expect("FATAL: password hashing failed at startup");
            let roles: HashSet<String> = roles.into_iter().collect();
            users.insert(
                username.clone(),
                Principal {
                    username,
                    password_hash,
                    roles,
                },
            );
        }

        // Hash an arbitrary throwaway value once, up front, so unknown-username
        // verification later has a real bcrypt hash to grind against.
        let fallback_hash = bcrypt::hash("fallback-credential", cost)
            .expect("FATAL: password hashing failed at startup");

        Self {
            users,
            fallback_hash,
        }
    }

    /// seeded
    ///
    /// The canonical demo population: two fixed accounts, one per role.
    /// This is the entire credential universe of the service.
    pub fn seeded(cost: u32) -> Self {
        Self::with_users(
            [
                (
                    "user1".to_string(),
                    "password1".to_string(),
                    vec![ROLE_USER.to_string()],
                ),
                (
                    "admin".to_string(),
                    "adminpass".to_string(),
                    vec![ROLE_ADMIN.to_string()],
                ),
            ],
            cost,
        )
    }

    /// lookup
    ///
    /// Resolves a username to its Principal. This is the store's single read
    /// operation; `None` means the account does not exist.
    pub fn lookup(&self, username: &str) -> Option<&Principal> {
        self.users.get(username)
    }

    /// verify_fallback
    ///
    /// Burns one bcrypt verification against the throwaway hash. Called on the
    /// unknown-username path so it takes the same amount of work as a real
    /// password check; the result is meaningless and discarded.
    pub fn verify_fallback(&self, candidate: &str) {
        let _ = bcrypt::verify(candidate, &self.fallback_hash);
    }

    /// Number of principals held by the store.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
