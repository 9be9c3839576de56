use hello_portal::{
    config::AuthProfile,
    models::{ROLE_ADMIN, ROLE_USER},
    policy::{Access, PolicyTable, RoutePolicy},
};

#[test]
fn test_first_match_wins() {
    // A broad rule placed first shadows everything below it.
    let table = PolicyTable::new(vec![
        RoutePolicy::permit("/*"),
        RoutePolicy::role("/admin", ROLE_ADMIN),
    ]);
    assert_eq!(table.decide("/admin"), Access::PermitAll);

    // Reversed order: the specific rule is consulted first.
    let table = PolicyTable::new(vec![
        RoutePolicy::role("/admin", ROLE_ADMIN),
        RoutePolicy::permit("/*"),
    ]);
    assert_eq!(table.decide("/admin"), Access::Role(ROLE_ADMIN.to_string()));
    assert_eq!(table.decide("/anything-else"), Access::PermitAll);
}

#[test]
fn test_wildcard_matches_prefix_and_nested_paths() {
    let table = PolicyTable::new(vec![RoutePolicy::permit("/swagger-ui/*")]);

    assert_eq!(table.decide("/swagger-ui"), Access::PermitAll);
    assert_eq!(table.decide("/swagger-ui/index.html"), Access::PermitAll);
    assert_eq!(
        table.decide("/swagger-ui/nested/deep.css"),
        Access::PermitAll
    );
    // A string extension of the prefix is not below it.
    assert_eq!(table.decide("/swagger-uindex"), Access::Authenticated);
}

#[test]
fn test_catch_all_wildcard_matches_everything() {
    let table = PolicyTable::new(vec![RoutePolicy::authenticated("/*")]);

    assert_eq!(table.decide("/"), Access::Authenticated);
    assert_eq!(table.decide("/a/b/c"), Access::Authenticated);
}

#[test]
fn test_exact_pattern_does_not_match_extensions() {
    let table = PolicyTable::new(vec![RoutePolicy::role("/user", ROLE_USER)]);

    assert_eq!(table.decide("/user"), Access::Role(ROLE_USER.to_string()));
    // Neither a longer name nor a nested path matches a literal pattern.
    assert_eq!(table.decide("/username"), Access::Authenticated);
    assert_eq!(table.decide("/user/42"), Access::Authenticated);
}

#[test]
fn test_unmatched_path_is_deny_by_default() {
    // An empty table protects everything: authentication is the floor.
    let table = PolicyTable::new(vec![]);
    assert_eq!(table.decide("/anything"), Access::Authenticated);
}

#[test]
fn test_enforced_table_route_requirements() {
    let table = PolicyTable::enforced();

    assert_eq!(table.decide("/health"), Access::PermitAll);
    assert_eq!(table.decide("/swagger-ui"), Access::PermitAll);
    assert_eq!(table.decide("/api-docs/openapi.json"), Access::PermitAll);
    assert_eq!(table.decide("/hello"), Access::Authenticated);
    assert_eq!(table.decide("/user"), Access::Role(ROLE_USER.to_string()));
    assert_eq!(table.decide("/admin"), Access::Role(ROLE_ADMIN.to_string()));
    assert_eq!(table.decide("/me"), Access::Authenticated);
    // The trailing catch-all keeps unknown paths behind authentication.
    assert_eq!(table.decide("/no-such-route"), Access::Authenticated);
}

#[test]
fn test_permit_all_table_opens_everything() {
    let table = PolicyTable::permit_all();

    for path in ["/hello", "/user", "/admin", "/me", "/no-such-route"] {
        assert_eq!(table.decide(path), Access::PermitAll, "path {}", path);
    }
}

#[test]
fn test_profile_selects_table() {
    let enforced = PolicyTable::for_profile(&AuthProfile::Enforced);
    assert_eq!(enforced.decide("/admin"), Access::Role(ROLE_ADMIN.to_string()));

    let open = PolicyTable::for_profile(&AuthProfile::PermitAll);
    assert_eq!(open.decide("/admin"), Access::PermitAll);
    assert_eq!(open.rules().len(), 1);
}
