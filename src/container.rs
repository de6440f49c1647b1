//! The container: composition root and factory for scopes.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::activation::{ActivationCache, ActivationStrategy, Activator};
use crate::descriptor::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::scope::{Scope, ScopeState};

/// Inversion-of-control container.
///
/// Owns the immutable descriptor table, the activation cache, the installed
/// [`ActivationStrategy`] and one distinguished root scope that doubles as
/// the Singleton store. The container itself exposes no resolution surface;
/// services are resolved through scopes.
///
/// Cloning is cheap (`Arc` inner) and clones share all state.
///
/// # Examples
///
/// ```rust
/// use minject::{CompiledActivation, Container, ServiceDescriptor};
///
/// let container = Container::new(
///     [ServiceDescriptor::instance(42u32)],
///     CompiledActivation,
/// );
///
/// let scope = container.create_scope();
/// assert_eq!(*scope.resolve::<u32>().unwrap(), 42);
/// container.dispose();
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    /// Immutable after build; lock-free reads.
    pub(crate) descriptors: HashMap<Key, ServiceDescriptor>,
    activators: ActivationCache,
    strategy: Box<dyn ActivationStrategy>,
    /// The root scope's state. Root identity is pointer identity against
    /// this field, which is also what makes it the Singleton store.
    pub(crate) root: Arc<ScopeState>,
}

impl Container {
    /// Build a container from a finalized descriptor sequence and an
    /// activation strategy.
    ///
    /// Duplicate registrations for the same service key overwrite silently;
    /// the last one wins.
    pub fn new(
        descriptors: impl IntoIterator<Item = ServiceDescriptor>,
        strategy: impl ActivationStrategy + 'static,
    ) -> Self {
        let mut table = HashMap::new();
        for descriptor in descriptors {
            table.insert(*descriptor.key(), descriptor);
        }
        debug!(target: "minject", services = table.len(), "container built");
        Self {
            inner: Arc::new(ContainerInner {
                descriptors: table,
                activators: ActivationCache::new(),
                strategy: Box::new(strategy),
                root: Arc::new(ScopeState::new()),
            }),
        }
    }

    /// Create a new scope referencing this container. Always succeeds, with
    /// no side effects on the container.
    pub fn create_scope(&self) -> Scope {
        debug!(target: "minject", "creating scope");
        Scope::new(self.inner.clone(), Arc::new(ScopeState::new()))
    }

    /// Synchronous teardown, defined as disposing the root scope: singletons
    /// are released in reverse construction order, blocking best-effort on
    /// any async-only hooks.
    pub fn dispose(&self) {
        self.root_scope().dispose();
    }

    /// Asynchronous teardown of the root scope, awaiting async hooks.
    pub async fn dispose_async(&self) {
        self.root_scope().dispose_async().await;
    }

    fn root_scope(&self) -> Scope {
        Scope::new(self.inner.clone(), self.inner.root.clone())
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            if let Ok(bag) = self.inner.root.disposables.try_lock() {
                if !bag.is_empty() {
                    warn!(
                        target: "minject",
                        disposables = bag.len(),
                        "container dropped with undisposed singletons; call dispose() first"
                    );
                }
            }
        }
    }
}

impl ContainerInner {
    /// Fetch the memoized activator for `key`, building it through the
    /// installed strategy on first use. Instance- and factory-based
    /// descriptors get trivial activators without consulting the strategy.
    pub(crate) fn activator_for(&self, key: &Key) -> DiResult<Activator> {
        let descriptor = self
            .descriptors
            .get(key)
            .ok_or_else(|| DiError::not_found(key))?;
        self.activators
            .get_or_build(key, || self.build_activator(descriptor))
    }

    fn build_activator(&self, descriptor: &ServiceDescriptor) -> DiResult<Activator> {
        match descriptor {
            ServiceDescriptor::Instance(ib) => {
                let instance = ib.instance.clone();
                Ok(Arc::new(move |_scope: &Scope| Ok(instance.clone())))
            }
            ServiceDescriptor::Factory(fb) => Ok(fb.factory.clone()),
            ServiceDescriptor::Type(tb) => self.strategy.build_activation(tb),
        }
    }
}
