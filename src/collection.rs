//! Fluent registration surface that accumulates descriptors before the
//! container is built.

use std::sync::Arc;

use crate::activation::{ActivationStrategy, CompiledActivation};
use crate::container::Container;
use crate::descriptor::{Injectable, ServiceDescriptor};
use crate::error::DiResult;
use crate::lifetime::Lifetime;
use crate::scope::Scope;

/// Mutable collection of service registrations.
///
/// The collection is the only place where registration happens; once
/// [`build`](ServiceCollection::build) runs, the resulting [`Container`]'s
/// descriptor table is immutable. Registering a service key twice overwrites
/// the earlier registration.
///
/// # Examples
///
/// ```rust
/// use minject::{Constructor, Injectable, Key, ServiceCollection};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct EnglishGreeter;
///
/// impl Greeter for EnglishGreeter {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// impl Injectable for EnglishGreeter {
///     fn constructors() -> Vec<Constructor> {
///         vec![Constructor::new(Vec::new(), |_| Ok(Arc::new(EnglishGreeter)))]
///     }
/// }
///
/// struct Controller {
///     greeter: Arc<dyn Greeter>,
/// }
///
/// impl Injectable for Controller {
///     fn constructors() -> Vec<Constructor> {
///         vec![Constructor::new(vec![Key::of::<dyn Greeter>()], |args| {
///             let greeter = args.take_trait::<dyn Greeter>()?;
///             Ok(Arc::new(Controller { greeter }))
///         })]
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_transient_as::<dyn Greeter, EnglishGreeter>(|g| g);
/// services.add_scoped::<Controller>();
///
/// let container = services.build();
/// let scope = container.create_scope();
/// let controller = scope.resolve::<Controller>().unwrap();
/// assert_eq!(controller.greeter.greet(), "hello");
/// ```
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Add a pre-assembled descriptor.
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Register `T` under its own key with Transient lifetime.
    pub fn add_transient<T: Injectable>(&mut self) -> &mut Self {
        self.add(ServiceDescriptor::from_type::<T>(Lifetime::Transient))
    }

    /// Register `T` under its own key with Scoped lifetime.
    pub fn add_scoped<T: Injectable>(&mut self) -> &mut Self {
        self.add(ServiceDescriptor::from_type::<T>(Lifetime::Scoped))
    }

    /// Register `T` under its own key with Singleton lifetime.
    pub fn add_singleton<T: Injectable>(&mut self) -> &mut Self {
        self.add(ServiceDescriptor::from_type::<T>(Lifetime::Singleton))
    }

    /// Register implementation `T` under the trait key `S`, Transient.
    /// The coercion closure is written at the call site (`|t| t`), where
    /// both types are concrete enough for the unsizing to apply.
    pub fn add_transient_as<S, T>(&mut self, cast: fn(Arc<T>) -> Arc<S>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable,
    {
        self.add(ServiceDescriptor::from_type_as::<S, T>(
            Lifetime::Transient,
            cast,
        ))
    }

    /// Register implementation `T` under the trait key `S`, Scoped.
    pub fn add_scoped_as<S, T>(&mut self, cast: fn(Arc<T>) -> Arc<S>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable,
    {
        self.add(ServiceDescriptor::from_type_as::<S, T>(
            Lifetime::Scoped,
            cast,
        ))
    }

    /// Register implementation `T` under the trait key `S`, Singleton.
    pub fn add_singleton_as<S, T>(&mut self, cast: fn(Arc<T>) -> Arc<S>) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable,
    {
        self.add(ServiceDescriptor::from_type_as::<S, T>(
            Lifetime::Singleton,
            cast,
        ))
    }

    /// Register a Transient factory for `T`. The factory receives the
    /// requesting scope and may resolve its own dependencies through it.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Scope) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::factory(Lifetime::Transient, factory))
    }

    /// Register a Scoped factory for `T`.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Scope) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::factory(Lifetime::Scoped, factory))
    }

    /// Register a Singleton factory for `T`.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Scope) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::factory(Lifetime::Singleton, factory))
    }

    /// Register a factory producing a trait object under the key `S`, with
    /// a caller-declared lifetime.
    pub fn add_trait_factory<S, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> DiResult<Arc<S>> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::trait_factory(lifetime, factory))
    }

    /// Register a pre-built instance. Always Singleton; never
    /// disposal-tracked.
    pub fn add_singleton_instance<T: Send + Sync + 'static>(&mut self, value: T) -> &mut Self {
        self.add(ServiceDescriptor::instance(value))
    }

    /// Register a pre-built trait object under the key `S`. Always Singleton.
    pub fn add_singleton_trait_instance<S: ?Sized + Send + Sync + 'static>(
        &mut self,
        value: Arc<S>,
    ) -> &mut Self {
        self.add(ServiceDescriptor::trait_instance(value))
    }

    /// Finalize into a [`Container`] with the default [`CompiledActivation`]
    /// strategy.
    pub fn build(self) -> Container {
        self.build_with(CompiledActivation)
    }

    /// Finalize into a [`Container`] with an explicit activation strategy.
    pub fn build_with(self, strategy: impl ActivationStrategy + 'static) -> Container {
        Container::new(self.descriptors, strategy)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
