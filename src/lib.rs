//! # minject
//!
//! Minimal inversion-of-control container with Transient, Scoped and
//! Singleton lifetimes, inspired by Microsoft.Extensions.DependencyInjection.
//!
//! ## Features
//!
//! - **Three lifetimes**: Transient (never cached), Scoped (cached per
//!   scope), Singleton (cached in the container's root scope)
//! - **Pluggable activation**: type-based registrations are turned into
//!   construction functions by an [`ActivationStrategy`]; two ship with the
//!   crate and are behaviorally interchangeable
//! - **Dependency-safe teardown**: every disposable instance a scope
//!   constructs is released in reverse construction order, with sync and
//!   async paths
//! - **Thread-safe**: concurrent resolution constructs each (service, scope)
//!   pair exactly once
//!
//! ## Quick Start
//!
//! ```rust
//! use minject::{Constructor, Injectable, Key, ServiceCollection};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock(u64);
//!
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         self.0
//!     }
//! }
//!
//! struct Reporter {
//!     clock: Arc<dyn Clock>,
//! }
//!
//! impl Injectable for Reporter {
//!     fn constructors() -> Vec<Constructor> {
//!         vec![Constructor::new(vec![Key::of::<dyn Clock>()], |args| {
//!             let clock = args.take_trait::<dyn Clock>()?;
//!             Ok(Arc::new(Reporter { clock }))
//!         })]
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton_trait_instance::<dyn Clock>(Arc::new(FixedClock(1700000000)));
//! services.add_transient::<Reporter>();
//!
//! let container = services.build();
//! let scope = container.create_scope();
//!
//! let reporter = scope.resolve::<Reporter>().unwrap();
//! assert_eq!(reporter.clock.now(), 1700000000);
//!
//! scope.dispose();
//! container.dispose();
//! ```
//!
//! ## Lifetime routing
//!
//! Resolution always goes through a [`Scope`]. Transient requests construct
//! a fresh instance; Scoped requests are cached in the requesting scope;
//! Singleton requests are delegated to the container's root scope, where
//! they are cached like Scoped ones. The root scope is distinguished by
//! identity, which is exactly what makes it the global Singleton store.
//!
//! ## Disposal
//!
//! Scopes record the disposable instances they construct in order and
//! release them last-constructed-first on [`Scope::dispose`] /
//! [`Scope::dispose_async`]. Dependencies are constructed before their
//! dependents, so a dependent being torn down can still reach everything it
//! references. Disposing the container tears down the root scope.

pub mod activation;
pub mod collection;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod scope;
pub mod traits;

mod internal;

pub use activation::{ActivationStrategy, Activator, CompiledActivation, ReflectionActivation};
pub use collection::ServiceCollection;
pub use container::Container;
pub use descriptor::{AnyArc, ArgList, Constructor, Injectable, ServiceDescriptor};
pub use error::{DiError, DiResult};
pub use key::Key;
pub use lifetime::Lifetime;
pub use scope::Scope;
pub use traits::{AsyncDispose, Dispose, DisposeHooks};
