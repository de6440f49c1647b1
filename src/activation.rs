//! Activation strategies and the per-container activation cache.
//!
//! A strategy turns a type-based descriptor into a construction function.
//! Two interchangeable strategies ship with the crate: one that re-reads the
//! declared constructor on every invocation and one that validates and
//! captures it once at build time. Both must be behaviorally identical; the
//! resolution engine is agnostic to which is installed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::descriptor::{AnyArc, ArgList, Constructor, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::scope::Scope;

/// A memoized construction function: resolves the dependencies of one service
/// through the supplied scope and returns the constructed instance.
pub type Activator = Arc<dyn Fn(&Scope) -> DiResult<AnyArc> + Send + Sync>;

/// Pluggable builder of construction functions for type-based descriptors.
///
/// Invoked by the container at most once per distinct type-based key; the
/// resulting [`Activator`] may be invoked many times. Factory- and
/// instance-based descriptors bypass the strategy entirely.
pub trait ActivationStrategy: Send + Sync {
    /// Build the construction function for a type-based descriptor.
    ///
    /// Contract: the implementation type must declare exactly one
    /// constructor. Zero or several is a
    /// [`DiError::InvalidConstructor`] raised at first activation, either
    /// from this build (compiled) or from the first invocation (reflective).
    fn build_activation(&self, descriptor: &TypeDescriptor) -> DiResult<Activator>;
}

/// Strategy that re-enumerates the declared constructors on every
/// invocation, the runtime-introspection analogue. Simple and always
/// current, at the cost of re-validating per call.
pub struct ReflectionActivation;

impl ActivationStrategy for ReflectionActivation {
    fn build_activation(&self, descriptor: &TypeDescriptor) -> DiResult<Activator> {
        let constructors = descriptor.constructors;
        let impl_name = descriptor.impl_name;
        let cast = descriptor.cast.clone();
        Ok(Arc::new(move |scope: &Scope| {
            let ctor = single_constructor(constructors, impl_name)?;
            construct(&ctor, cast.as_ref(), scope)
        }))
    }
}

/// Strategy that validates the constructor shape once, at build time, and
/// captures it in the returned closure. More setup cost, faster steady state.
pub struct CompiledActivation;

impl ActivationStrategy for CompiledActivation {
    fn build_activation(&self, descriptor: &TypeDescriptor) -> DiResult<Activator> {
        let ctor = single_constructor(descriptor.constructors, descriptor.impl_name)?;
        let cast = descriptor.cast.clone();
        Ok(Arc::new(move |scope: &Scope| {
            construct(&ctor, cast.as_ref(), scope)
        }))
    }
}

fn single_constructor(
    constructors: fn() -> Vec<Constructor>,
    impl_name: &'static str,
) -> DiResult<Constructor> {
    let mut ctors = constructors();
    if ctors.len() != 1 {
        return Err(DiError::InvalidConstructor {
            type_name: impl_name,
            found: ctors.len(),
        });
    }
    Ok(ctors.remove(0))
}

/// Resolve every constructor parameter through the scope, in declaration
/// order, then invoke the constructor and apply the trait cast if any.
fn construct(
    ctor: &Constructor,
    cast: Option<&crate::descriptor::CastFn>,
    scope: &Scope,
) -> DiResult<AnyArc> {
    let mut args = Vec::with_capacity(ctor.params().len());
    for param in ctor.params() {
        args.push(scope.resolve_key(param)?);
    }
    let instance = ctor.invoke(&mut ArgList::new(args))?;
    match cast {
        Some(cast) => cast(instance),
        None => Ok(instance),
    }
}

/// Memoizes the activator per service key so the strategy runs at most once
/// per type per container lifetime, independent of how many times or how
/// concurrently that type is resolved.
pub(crate) struct ActivationCache {
    activators: Mutex<HashMap<Key, Activator>>,
}

impl ActivationCache {
    pub(crate) fn new() -> Self {
        Self {
            activators: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the activator for `key`, building it on first use. The lock is
    /// held across the build; strategy builds are pure and never resolve,
    /// so this cannot deadlock, and it guarantees a single build per key
    /// under concurrent first use. A failed build inserts nothing and leaves
    /// every other key's entry intact.
    pub(crate) fn get_or_build(
        &self,
        key: &Key,
        build: impl FnOnce() -> DiResult<Activator>,
    ) -> DiResult<Activator> {
        let mut activators = self.activators.lock().unwrap();
        if let Some(activator) = activators.get(key) {
            return Ok(activator.clone());
        }
        trace!(target: "minject", service = key.display_name(), "building activator");
        let activator = build()?;
        activators.insert(*key, activator.clone());
        Ok(activator)
    }
}
