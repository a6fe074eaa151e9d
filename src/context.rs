//! Context values and the capabilities they may expose
//!
//! A permission check is always made *against* something: a plain target name,
//! or a domain value standing in for one. [`Context`] is the tagged union over
//! those shapes, and the two traits here are the narrow capabilities a value
//! can opt into: naming its own target ([`ResourceContext`]) and judging
//! permissions on itself ([`SelfAuthorizing`]).

use std::borrow::Cow;
use std::fmt;

use crate::manager::Manager;
use crate::types::{Access, Target};

/// A value that resolves to a target name
///
/// The default implementation uses the implementing type's short name (final
/// path segment, generic parameters stripped), so plain domain types opt in
/// with an empty `impl` block. Override [`auth_context`] to supply a custom
/// name.
///
/// [`auth_context`]: ResourceContext::auth_context
pub trait ResourceContext {
    /// Target name permission checks resolve this value to
    fn auth_context(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// A context value that can judge permissions on itself
///
/// Consulted by the [`Manager`] pipeline after overrides and services but
/// before the permission table. Returning [`Access::Indeterminate`] passes
/// the decision down to the table lookup.
pub trait SelfAuthorizing: ResourceContext {
    /// Decide `permission` for this value
    fn can(&self, manager: &Manager, permission: &str) -> Access;
}

/// The value a permission check is made against
///
/// Construction picks the capability; the decision pipeline branches on the
/// variant. Plain strings convert directly:
///
/// ```
/// use authgate::{Context, Manager};
///
/// let manager = Manager::new();
/// assert!(!manager.can("read", "user"));
/// assert!(!manager.can("read", Context::name("user")));
/// ```
pub enum Context<'a> {
    /// A target named directly
    Name(Cow<'a, str>),
    /// A value naming its own target
    Object(&'a dyn ResourceContext),
    /// A value that authorizes itself
    Guarded(&'a dyn SelfAuthorizing),
}

impl<'a> Context<'a> {
    /// Context for a plain target name
    pub fn name(name: impl Into<Cow<'a, str>>) -> Self {
        Context::Name(name.into())
    }

    /// Context for a value that resolves to its own target name
    pub fn object<T: ResourceContext>(value: &'a T) -> Self {
        Context::Object(value)
    }

    /// Context for a value that authorizes itself
    pub fn guarded<T: SelfAuthorizing>(value: &'a T) -> Self {
        Context::Guarded(value)
    }

    /// Resolved lowercase target name
    pub(crate) fn target(&self) -> Target {
        let raw = match self {
            Context::Name(name) => name.as_ref().to_string(),
            Context::Object(value) => value.auth_context(),
            Context::Guarded(value) => value.auth_context(),
        };

        raw.to_lowercase()
    }
}

impl<'a> From<&'a str> for Context<'a> {
    fn from(name: &'a str) -> Self {
        Context::Name(Cow::Borrowed(name))
    }
}

impl<'a> From<&'a String> for Context<'a> {
    fn from(name: &'a String) -> Self {
        Context::Name(Cow::Borrowed(name.as_str()))
    }
}

impl From<String> for Context<'static> {
    fn from(name: String) -> Self {
        Context::Name(Cow::Owned(name))
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Context::Object(value) => f.debug_tuple("Object").field(&value.auth_context()).finish(),
            Context::Guarded(value) => {
                f.debug_tuple("Guarded").field(&value.auth_context()).finish()
            }
        }
    }
}

/// Final path segment of a type name, with generic parameters stripped
fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);

    base.rsplit("::").next().unwrap_or(base).to_string()
}
