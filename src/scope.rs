//! Scopes: lifetime routing, per-scope caching and disposal bookkeeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::container::ContainerInner;
use crate::descriptor::{AnyArc, ServiceDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::{DisposeBag, DisposeEntry};
use crate::key::Key;
use crate::lifetime::Lifetime;

/// A lifetime boundary for service resolution.
///
/// A scope caches Scoped instances for its own lifetime and records every
/// disposable instance it constructs, in construction order, for reverse
/// teardown. The container's root scope additionally serves as the
/// process-wide Singleton store.
///
/// Scopes are created through [`Container::create_scope`] and torn down with
/// [`dispose`](Scope::dispose) or [`dispose_async`](Scope::dispose_async);
/// a scope must stop being used before teardown begins.
///
/// [`Container::create_scope`]: crate::Container::create_scope
///
/// # Examples
///
/// ```rust
/// use minject::{Constructor, Injectable, ServiceCollection};
/// use std::sync::Arc;
///
/// struct RequestContext;
///
/// impl Injectable for RequestContext {
///     fn constructors() -> Vec<Constructor> {
///         vec![Constructor::new(Vec::new(), |_| Ok(Arc::new(RequestContext)))]
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_scoped::<RequestContext>();
/// let container = services.build();
///
/// let scope = container.create_scope();
/// let a = scope.resolve::<RequestContext>().unwrap();
/// let b = scope.resolve::<RequestContext>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// scope.dispose();
/// ```
pub struct Scope {
    container: Arc<ContainerInner>,
    state: Arc<ScopeState>,
}

/// Per-scope mutable state: the Scoped instance cache and the disposal list.
pub(crate) struct ScopeState {
    /// Per-key cells give exactly-once construction per (key, scope) pair
    /// without holding the map lock during construction, so resolving nested
    /// dependencies of other keys never deadlocks.
    instances: Mutex<HashMap<Key, Arc<OnceCell<AnyArc>>>>,
    pub(crate) disposables: Mutex<DisposeBag>,
}

impl ScopeState {
    pub(crate) fn new() -> Self {
        Self {
            instances: Mutex::new(HashMap::new()),
            disposables: Mutex::new(DisposeBag::default()),
        }
    }
}

impl Scope {
    pub(crate) fn new(container: Arc<ContainerInner>, state: Arc<ScopeState>) -> Self {
        Self { container, state }
    }

    /// Resolve a concrete service type.
    pub fn resolve<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_key(&Key::of::<T>())?;
        any.downcast::<T>()
            .map_err(|_| DiError::type_mismatch::<T>())
    }

    /// Resolve a trait-keyed service.
    pub fn resolve_trait<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let any = self.resolve_key(&Key::of::<T>())?;
        any.downcast::<Arc<T>>()
            .map(|wrapped| (*wrapped).clone())
            .map_err(|_| DiError::type_mismatch::<T>())
    }

    /// Resolve by key, returning the type-erased instance.
    ///
    /// This is the routing core. Lifetimes are evaluated in a fixed order:
    /// Transient first, then "am I the root scope" (which makes Scoped and
    /// Singleton indistinguishable once the call reaches the root), then
    /// explicit Singleton delegation. That ordering is what lets the root
    /// scope be both its own Scoped cache and the global Singleton store.
    pub fn resolve_key(&self, key: &Key) -> DiResult<AnyArc> {
        let descriptor = self
            .container
            .descriptors
            .get(key)
            .ok_or_else(|| DiError::not_found(key))?;

        if descriptor.lifetime() == Lifetime::Transient {
            let activator = self.container.activator_for(key)?;
            let instance = activator(self)?;
            self.track_disposal(descriptor, &instance);
            return Ok(instance);
        }

        if descriptor.lifetime() == Lifetime::Scoped || self.is_root() {
            let cell = {
                let mut instances = self.state.instances.lock().unwrap();
                instances
                    .entry(*key)
                    .or_insert_with(|| Arc::new(OnceCell::new()))
                    .clone()
            };
            let instance = cell.get_or_try_init(|| {
                let activator = self.container.activator_for(key)?;
                let instance = activator(self)?;
                self.track_disposal(descriptor, &instance);
                Ok(instance)
            })?;
            return Ok(instance.clone());
        }

        // Singleton requested from a non-root scope: the root scope owns it,
        // so the whole call is delegated there, nested dependencies included.
        self.root().resolve_key(key)
    }

    /// Tear down every disposable instance this scope constructed, in
    /// reverse construction order. Prefers each instance's sync hook and
    /// best-effort-blocks on async-only hooks.
    ///
    /// The disposal list is drained exactly once; resolving from a scope
    /// while it is being disposed is a caller error.
    pub fn dispose(&self) {
        let mut bag = std::mem::take(&mut *self.state.disposables.lock().unwrap());
        if !bag.is_empty() {
            debug!(target: "minject", disposables = bag.len(), "disposing scope");
        }
        bag.run_sync_reverse();
    }

    /// Tear down in reverse construction order, awaiting async hooks and
    /// falling back to sync hooks where that is all an instance exposes.
    pub async fn dispose_async(&self) {
        let mut bag = std::mem::take(&mut *self.state.disposables.lock().unwrap());
        if !bag.is_empty() {
            debug!(target: "minject", disposables = bag.len(), "disposing scope");
        }
        bag.run_async_reverse().await;
    }

    fn is_root(&self) -> bool {
        Arc::ptr_eq(&self.state, &self.container.root)
    }

    fn root(&self) -> Scope {
        Scope::new(self.container.clone(), self.container.root.clone())
    }

    fn track_disposal(&self, descriptor: &ServiceDescriptor, instance: &AnyArc) {
        let Some(hooks) = descriptor.hooks() else {
            return;
        };
        if hooks.is_empty() {
            return;
        }
        self.state
            .disposables
            .lock()
            .unwrap()
            .push(DisposeEntry::bind(hooks, instance.clone()));
    }
}
