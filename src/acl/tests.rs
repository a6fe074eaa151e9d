//! Test suite for the ACL module
//!
//! Covers grant storage and normalization, alias expansion (flat, nested,
//! cyclic), lookup behavior, and configuration loading.

use super::*;
use std::collections::HashSet;

fn actions(set: &[&str]) -> HashSet<String> {
    set.iter().map(|a| a.to_string()).collect()
}

// ============================================================================
// Grant Storage Tests
// ============================================================================

#[test]
fn test_allow_stores_lowercase() {
    let mut acl = Acl::new();
    acl.allow("Admin", "User", ["READ"]);

    let permissions = acl.permissions_for("admin");
    assert_eq!(permissions["user"], actions(&["read"]));
}

#[test]
fn test_allow_unions_repeated_calls() {
    let mut acl = Acl::new();
    acl.allow("editor", "article", ["read", "update"]);
    acl.allow("editor", "article", ["update", "delete"]);

    assert_eq!(
        acl.permissions_for("editor")["article"],
        actions(&["read", "update", "delete"])
    );
}

#[test]
fn test_allow_is_idempotent() {
    let mut acl = Acl::new();
    acl.allow("editor", "article", ["read"]);
    let first = acl.permissions_for("editor");

    acl.allow("editor", "article", ["read"]);
    assert_eq!(acl.permissions_for("editor"), first);
}

#[test]
fn test_targets_kept_separate() {
    let mut acl = Acl::new();
    acl.allow("admin", "user", ["delete"]);
    acl.allow("admin", "apple", ["read"]);

    let permissions = acl.permissions_for("admin");
    assert_eq!(permissions["user"], actions(&["delete"]));
    assert_eq!(permissions["apple"], actions(&["read"]));
}

// ============================================================================
// Alias Expansion Tests
// ============================================================================

#[test]
fn test_alias_expansion_matches_direct_grant() {
    let mut aliased = Acl::new();
    aliased.alias("manage", ["create", "read", "update", "delete"]);
    aliased.allow("admin", "user", ["manage"]);

    let mut direct = Acl::new();
    direct.allow("admin", "user", ["create", "read", "update", "delete"]);

    assert_eq!(
        aliased.permissions_for("admin"),
        direct.permissions_for("admin")
    );
}

#[test]
fn test_alias_name_is_not_grantable() {
    let mut acl = Acl::new();
    acl.alias("manage", ["create", "read", "update", "delete"]);
    acl.allow("admin", "user", ["manage"]);

    assert!(!acl.permissions_for("admin")["user"].contains("manage"));
}

#[test]
fn test_recursive_alias() {
    let mut acl = Acl::new();
    acl.alias("a", ["b"]);
    acl.alias("b", ["c"]);
    acl.allow("role", "target", ["a"]);

    assert_eq!(acl.permissions_for("role")["target"], actions(&["c"]));
}

#[test]
fn test_alias_mixed_with_plain_actions() {
    let mut acl = Acl::new();
    acl.alias("publish", ["review", "approve"]);
    acl.allow("editor", "article", ["read", "publish"]);

    assert_eq!(
        acl.permissions_for("editor")["article"],
        actions(&["read", "review", "approve"])
    );
}

#[test]
fn test_cyclic_aliases_degrade_to_base_actions() {
    let mut acl = Acl::new();
    acl.alias("a", ["b", "read"]);
    acl.alias("b", ["a", "write"]);
    acl.allow("role", "target", ["a"]);

    assert_eq!(
        acl.permissions_for("role")["target"],
        actions(&["read", "write"])
    );
}

#[test]
fn test_alias_registered_after_use_has_no_effect() {
    let mut acl = Acl::new();
    acl.allow("admin", "user", ["manage"]);
    acl.alias("manage", ["create", "delete"]);

    // Expansion happens at write time; the earlier grant keeps the token
    assert_eq!(acl.permissions_for("admin")["user"], actions(&["manage"]));
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn test_unknown_role_is_empty() {
    let acl = Acl::new();
    assert!(acl.permissions_for("ghost").is_empty());
}

#[test]
fn test_permissions_lookup_is_case_insensitive() {
    let mut acl = Acl::new();
    acl.allow("admin", "user", ["read"]);

    assert_eq!(acl.permissions_for("ADMIN"), acl.permissions_for("admin"));
}

#[test]
fn test_returned_map_is_a_copy() {
    let mut acl = Acl::new();
    acl.allow("admin", "user", ["read"]);

    let mut copy = acl.permissions_for("admin");
    if let Some(set) = copy.get_mut("user") {
        set.insert("delete".to_string());
    }

    assert_eq!(acl.permissions_for("admin")["user"], actions(&["read"]));
}

#[test]
fn test_roles_lists_every_granted_role() {
    let mut acl = Acl::new();
    acl.allow("Admin", "user", ["read"]);
    acl.allow("editor", "article", ["update"]);

    let mut roles = acl.roles();
    roles.sort();
    assert_eq!(roles, vec!["admin".to_string(), "editor".to_string()]);
}

#[test]
fn test_roles_empty_without_grants() {
    let acl = Acl::new();
    assert!(acl.roles().is_empty());
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_from_config_applies_aliases_to_grants() {
    let config: AclConfig = serde_json::from_str(
        r#"{
            "aliases": {"manage": ["create", "read", "update", "delete"]},
            "grants": {
                "admin": {"user": ["manage"], "apple": ["read"]},
                "editor": {"article": ["read", "update"]}
            }
        }"#,
    )
    .unwrap();

    let acl = Acl::from_config(config);

    assert_eq!(
        acl.permissions_for("admin")["user"],
        actions(&["create", "read", "update", "delete"])
    );
    assert_eq!(acl.permissions_for("admin")["apple"], actions(&["read"]));
    assert_eq!(
        acl.permissions_for("editor")["article"],
        actions(&["read", "update"])
    );
}

#[test]
fn test_from_config_defaults_missing_sections() {
    let config: AclConfig = serde_json::from_str(r#"{}"#).unwrap();
    let acl = Acl::from_config(config);

    assert!(acl.roles().is_empty());
}
