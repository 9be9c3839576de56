/// Router Module Index
///
/// Organizes the application's routing logic into access-tier modules mirroring
/// the policy table, so a reader can see at a glance which tier a handler
/// belongs to. Enforcement itself happens in the gate middleware ahead of every
/// route, driven by the same ordered policy the tiers reflect.

/// Routes open to all clients (health probe).
pub mod public;

/// Routes requiring valid credentials, any role.
pub mod authenticated;

/// Routes restricted to principals holding the USER role.
pub mod user;

/// Routes restricted to principals holding the ADMIN role.
pub mod admin;
