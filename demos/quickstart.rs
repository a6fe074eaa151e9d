//! Quickstart walkthrough
//!
//! Demonstrates the full authorization flow:
//! 1. Build an ACL with permission aliases
//! 2. Attach it to a manager and bind a subject
//! 3. Layer overrides and services over the permission table
//! 4. Let a resource object vote on its own access
//! 5. Gate request paths with a guard
//! 6. Load the same setup from configuration
//!
//! Run with: cargo run --example quickstart

use std::collections::HashMap;
use std::sync::Arc;

use authgate::{
    Access, Acl, AclConfig, Context, Guard, GuardConfig, Manager, ResourceContext, SelfAuthorizing,
    StaticEntity,
};

/// A resource that decides its own access, independent of role grants.
struct Document {
    locked: bool,
}

impl ResourceContext for Document {
    fn auth_context(&self) -> String {
        "file".to_string()
    }
}

impl SelfAuthorizing for Document {
    fn can(&self, _manager: &Manager, permission: &str) -> Access {
        if self.locked {
            return Access::Denied;
        }

        match permission {
            "open" => Access::Granted,
            _ => Access::Indeterminate,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Authgate Quickstart ===\n");

    // Step 1: Build an ACL
    println!("Step 1: Building the ACL...");

    let mut acl = Acl::new();
    acl.alias("manage", ["create", "read", "update", "delete"]);
    acl.allow("admin", "user", ["manage", "ban"]);
    acl.allow("editor", "article", ["create", "read", "update"]);
    acl.allow("viewer", "article", ["read"]);

    println!("✓ Alias \"manage\" expands to create / read / update / delete");
    println!("✓ Granted targets to admin, editor and viewer\n");

    // Step 2: Bind a subject to a manager
    println!("Step 2: Binding a subject...");

    let mut manager = Manager::new();
    manager.add(Arc::new(acl));
    manager.set_entity(Arc::new(
        StaticEntity::new(["admin"]).with_permission("reports", ["read", "export"]),
    ));

    println!("✓ Subject holds role \"admin\" plus a personal grant on \"reports\"");
    println!("  - can(\"delete\", \"user\")     = {}", manager.can("delete", "user"));
    println!("  - can(\"manage\", \"user\")     = {} (aliases are not grants)", manager.can("manage", "user"));
    println!("  - can(\"export\", \"reports\")  = {}", manager.can("export", "reports"));
    println!("  - is(\"admin\")               = {}", manager.is("admin"));
    println!("  - is_any([\"editor\", \"admin\"]) = {}\n", manager.is_any(&["editor", "admin"]));

    // Step 3: Overrides and services
    println!("Step 3: Layering overrides and services...");

    // A service owns every decision about billing.
    manager.register("billing", |_, _, permission| match permission {
        "view" => Access::Granted,
        _ => Access::Denied,
    });

    // An override freezes one specific action regardless of grants.
    manager.add_override("user", "delete", |_, _| false);

    println!("✓ Service registered for \"billing\", override frozen on user deletion");
    println!("  - can(\"view\", \"billing\")    = {}", manager.can("view", "billing"));
    println!("  - can(\"refund\", \"billing\")  = {}", manager.can("refund", "billing"));
    println!("  - can(\"delete\", \"user\")     = {} (override wins over the grant)", manager.can("delete", "user"));
    println!("  - has(\"delete\", \"user\")     = {} (raw table ignores hooks)\n", manager.has("delete", "user"));

    // Step 4: Self-authorizing resources
    println!("Step 4: Asking a resource about itself...");

    let draft = Document { locked: false };
    let sealed = Document { locked: true };

    println!("✓ Documents resolve to target {:?}", manager.resolve(Context::guarded(&draft)));
    println!("  - can(\"open\", draft)        = {}", manager.can("open", Context::guarded(&draft)));
    println!("  - can(\"open\", sealed)       = {} (locked document refuses)\n", manager.can("open", Context::guarded(&sealed)));

    // Step 5: Path gating
    println!("Step 5: Gating request paths...");

    let mut guard = Guard::new();
    guard.set_default_rule("accept")?;
    guard.set_user_role("user");
    guard.add_reject_rules(HashMap::from([(
        "/admin(/.*)?".to_string(),
        vec!["!staff".to_string()],
    )]));

    if let Err(err) = guard.set_default_rule("sometimes") {
        println!("✓ Unknown defaults are rejected: {}", err);
    }

    for (path, roles) in [
        ("/articles/42", vec!["user".to_string()]),
        ("/admin/settings", vec!["user".to_string()]),
        ("/admin/settings", vec!["user".to_string(), "staff".to_string()]),
        ("/admin/settings", vec![]),
    ] {
        let verdict = match guard.check(path, &roles) {
            Access::Granted => "pass",
            Access::Denied => "403 Forbidden",
            Access::Indeterminate => "401 Unauthorized",
        };
        println!("  - {:<20} roles {:?} => {}", path, roles, verdict);
    }
    println!("  (requests with no roles at all fall back to the default rule)\n");

    // Step 6: Config-driven setup
    println!("Step 6: Loading the same setup from configuration...");

    let acl_config: AclConfig = serde_json::from_str(
        r#"{
            "aliases": { "manage": ["create", "read", "update", "delete"] },
            "grants": { "admin": { "user": ["manage"] } }
        }"#,
    )?;
    let guard_config: GuardConfig = serde_json::from_str(
        r#"{
            "default_rule": "reject",
            "user_role": "user",
            "accept": { "/public(/.*)?": ["user"] }
        }"#,
    )?;

    let acl = Acl::from_config(acl_config);
    let guard = Guard::from_config(guard_config)?;

    let mut manager = Manager::new();
    manager.add(Arc::new(acl));
    manager.set_entity(Arc::new(StaticEntity::new(["admin"])));

    println!("✓ ACL and guard rebuilt from JSON");
    println!("  - can(\"update\", \"user\")     = {}", manager.can("update", "user"));
    println!(
        "  - check(\"/public/index\")    = {:?}",
        guard.check("/public/index", &["user"])
    );
    println!(
        "  - check(\"/private/index\")   = {:?}",
        guard.check("/private/index", &["user"])
    );

    println!("\n=== Walkthrough Complete ===");

    Ok(())
}
