//! Service lifetime definitions.

/// Service lifetimes controlling instance reuse
///
/// The lifetime decides where a resolved instance is cached, if anywhere:
///
/// - **Singleton**: one instance per container, cached in the root scope and
///   shared by every scope.
/// - **Scoped**: one instance per [`Scope`](crate::Scope), cached in the scope
///   that first requested it.
/// - **Transient**: a fresh instance on every resolution, never cached.
///
/// # Examples
///
/// ```rust
/// use minject::{Constructor, Injectable, Lifetime, ServiceCollection};
/// use std::sync::Arc;
///
/// struct Connection;
///
/// impl Injectable for Connection {
///     fn constructors() -> Vec<Constructor> {
///         vec![Constructor::new(Vec::new(), |_| Ok(Arc::new(Connection)))]
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped::<Connection>();
///
/// let container = services.build();
/// let scope_a = container.create_scope();
/// let scope_b = container.create_scope();
///
/// let first = scope_a.resolve::<Connection>().unwrap();
/// let second = scope_a.resolve::<Connection>().unwrap();
/// let other = scope_b.resolve::<Connection>().unwrap();
///
/// // Same instance within a scope, a different one per scope.
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(!Arc::ptr_eq(&first, &other));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// New instance per resolution, never cached.
    Transient,
    /// Single instance per scope, cached for the scope's lifetime.
    Scoped,
    /// Single instance per container, cached in the root scope.
    Singleton,
}
