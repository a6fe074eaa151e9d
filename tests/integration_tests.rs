//! End-to-end tests across ACL, Manager, and Guard
//!
//! Exercises the full stack the way a host application wires it: ACLs built
//! from code or configuration, an entity set on a manager, decisions flowing
//! through the override/service/self-check pipeline, and paths gated by
//! accept/reject rules.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use serde::Deserialize;

use authgate::{
    Access, Acl, AclConfig, Context, Guard, GuardConfig, Manager, ResourceContext,
    SelfAuthorizing, StaticEntity,
};

fn admin_acl() -> Acl {
    let mut acl = Acl::new();
    acl.alias("manage", ["create", "read", "update", "delete"]);
    acl.allow("admin", "user", ["manage"]);
    acl.allow("admin", "apple", ["read"]);
    acl
}

// ============================================================================
// FULL DECISION SCENARIOS
// ============================================================================

#[test]
fn test_full_decision_scenario() {
    let mut manager = Manager::new();
    manager.add(Arc::new(admin_acl()));
    manager.set_entity(Arc::new(StaticEntity::new(["admin"])));

    assert!(manager.can("read", "user"), "alias expansion should grant read");
    assert!(manager.can("delete", "user"));
    assert!(manager.can("read", "apple"));
    assert!(!manager.can("update", "apple"), "apple only carries read");

    // The alias token never lands in the table
    assert!(!manager.can("manage", "user"));
    assert!(!manager.has("manage", "user"));
}

#[test]
fn test_pipeline_precedence_end_to_end() {
    struct Ledger;

    impl ResourceContext for Ledger {}

    impl SelfAuthorizing for Ledger {
        fn can(&self, _manager: &Manager, _permission: &str) -> Access {
            Access::Granted
        }
    }

    let mut acl = Acl::new();
    acl.allow("auditor", "ledger", ["close"]);

    let mut manager = Manager::new();
    manager.add(Arc::new(acl));
    manager.set_entity(Arc::new(StaticEntity::new(["auditor"])));

    let ledger = Ledger;

    // Self-check grants whatever the table lacks
    assert!(manager.can("reopen", Context::guarded(&ledger)));

    // A service outranks the self-check
    manager.register("ledger", |_, _, permission| {
        Access::from(permission == "close")
    });
    assert!(!manager.can("reopen", Context::guarded(&ledger)));
    assert!(manager.can("close", Context::guarded(&ledger)));

    // An override outranks the service
    manager.add_override("ledger", "close", |_, _| false);
    assert!(!manager.can("close", Context::guarded(&ledger)));

    // `has` stays a pure table lookup throughout
    assert!(manager.has("close", Context::guarded(&ledger)));
    assert!(!manager.has("reopen", Context::guarded(&ledger)));
}

#[test]
fn test_per_request_entity_swap() {
    let mut manager = Manager::new();
    manager.add(Arc::new(admin_acl()));

    manager.set_entity(Arc::new(StaticEntity::new(["admin"])));
    assert!(manager.can("delete", "user"));

    manager.set_entity(Arc::new(StaticEntity::new(["guest"])));
    assert!(!manager.can("delete", "user"));
    assert!(!manager.is("admin"));
    assert!(manager.is("guest"));
}

#[test]
fn test_wildcard_service_backstops_exact() {
    let mut manager = Manager::new();
    manager.set_entity(Arc::new(StaticEntity::new(["bot"])));

    manager.register("queue", |_, _, _| Access::Indeterminate);
    manager.register("*", |manager, _, _| Access::from(manager.is("bot")));

    assert!(manager.can("drain", "queue"));
    assert!(manager.can("anything", "elsewhere"));
}

// ============================================================================
// CONFIGURATION-DRIVEN WIRING
// ============================================================================

#[derive(Debug, Deserialize)]
struct Settings {
    acl: AclConfig,
    guard: GuardConfig,
}

const SETTINGS_JSON: &str = r#"{
    "acl": {
        "aliases": {"manage": ["create", "read", "update", "delete"]},
        "grants": {
            "admin": {"user": ["manage"]},
            "editor": {"article": ["read", "update"]}
        }
    },
    "guard": {
        "default_rule": "accept",
        "user_role": "user",
        "accept": {"/admin/help": ["user"]},
        "reject": {"/admin(/.*)?": ["!admin"]}
    }
}"#;

#[test]
fn test_config_driven_system() {
    let settings: Settings = serde_json::from_str(SETTINGS_JSON).unwrap();

    let acl = Arc::new(Acl::from_config(settings.acl));
    let guard = Guard::from_config(settings.guard).unwrap();

    let mut manager = Manager::new();
    manager.add(acl);
    manager.set_entity(Arc::new(StaticEntity::new(["editor", "user"])));

    assert!(manager.can("update", "article"));
    assert!(!manager.can("delete", "user"));

    assert_eq!(guard.check("/articles/42", &["editor", "user"]), Access::Granted);
    assert_eq!(guard.check("/admin/help", &["editor", "user"]), Access::Granted);
    assert_eq!(guard.check("/admin/flags", &["editor", "user"]), Access::Denied);
    assert_eq!(guard.check("/admin/flags", &["crawler"]), Access::Indeterminate);
}

#[test]
fn test_bad_guard_settings_surface_invalid_input() {
    let config: GuardConfig =
        serde_json::from_str(r#"{"default_rule": "allow"}"#).unwrap();

    let err = Guard::from_config(config).unwrap_err();
    assert!(err.to_string().contains("Invalid input"));
}

// ============================================================================
// ENTITY ROLES FEEDING THE GUARD
// ============================================================================

#[test]
fn test_entity_roles_drive_path_gating() {
    let mut manager = Manager::new();
    manager.add(Arc::new(admin_acl()));
    manager.set_entity(Arc::new(StaticEntity::new(["admin", "user"])));

    let mut guard = Guard::new();
    guard.set_user_role("user");
    guard.add_reject_rules(HashMap::from([(
        "/admin(/.*)?".to_string(),
        vec!["!admin".to_string()],
    )]));

    let roles = manager.entity().map(|entity| entity.roles()).unwrap_or_default();

    assert_eq!(guard.check("/admin/users", &roles), Access::Granted);
    assert_eq!(guard.check("/admin/users", &["user"]), Access::Denied);
}

// ============================================================================
// PROPERTY-BASED INVARIANTS
// ============================================================================

proptest! {
    #[test]
    fn prop_stored_actions_are_lowercase(
        role in "[A-Za-z]{1,8}",
        target in "[A-Za-z]{1,8}",
        actions in prop::collection::vec("[A-Za-z]{1,10}", 1..6),
    ) {
        let mut acl = Acl::new();
        acl.allow(&role, &target, actions);

        for (_, set) in acl.permissions_for(&role) {
            for action in set {
                prop_assert_eq!(action.to_lowercase(), action.clone());
            }
        }
    }

    #[test]
    fn prop_allow_is_idempotent(
        role in "[a-z]{1,8}",
        target in "[a-z]{1,8}",
        actions in prop::collection::vec("[a-z]{1,10}", 1..6),
    ) {
        let mut once = Acl::new();
        once.allow(&role, &target, actions.clone());

        let mut twice = Acl::new();
        twice.allow(&role, &target, actions.clone());
        twice.allow(&role, &target, actions);

        prop_assert_eq!(once.permissions_for(&role), twice.permissions_for(&role));
    }

    #[test]
    fn prop_allow_is_order_insensitive(
        role in "[a-z]{1,8}",
        target in "[a-z]{1,8}",
        actions in prop::collection::vec("[a-z]{1,10}", 1..6),
    ) {
        let mut forward = Acl::new();
        forward.allow(&role, &target, actions.clone());

        let mut backward = Acl::new();
        let reversed: Vec<String> = actions.into_iter().rev().collect();
        backward.allow(&role, &target, reversed);

        prop_assert_eq!(forward.permissions_for(&role), backward.permissions_for(&role));
    }

    #[test]
    fn prop_alias_token_never_stored(
        role in "[a-z]{1,8}",
        target in "[a-z]{1,8}",
        expansion in prop::collection::vec("[a-z]{3,10}", 1..4),
    ) {
        // Two letters; expansion tokens are at least three, so no collision
        let alias_name = "xx";

        let mut acl = Acl::new();
        acl.alias(alias_name, expansion);
        acl.allow(&role, &target, [alias_name]);

        prop_assert!(!acl.permissions_for(&role)[&target].contains(alias_name));
    }

    #[test]
    fn prop_guard_check_is_role_case_invariant(
        roles in prop::collection::vec("[a-z]{1,8}", 1..5),
        path in "/[a-z]{1,12}",
    ) {
        let mut guard = Guard::new();
        guard.add_reject_rules(HashMap::from([(
            "/secret(/.*)?".to_string(),
            vec!["!admin".to_string()],
        )]));
        guard.set_user_role("user");

        let upper: Vec<String> = roles.iter().map(|role| role.to_uppercase()).collect();

        prop_assert_eq!(guard.check(&path, &roles), guard.check(&path, &upper));
    }
}
