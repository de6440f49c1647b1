//! Service descriptors: how one service type is produced, and under what
//! lifetime.

use std::any::Any;
use std::sync::Arc;

use crate::activation::Activator;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::scope::Scope;
use crate::traits::DisposeHooks;

/// Type-erased instance as stored by the container.
///
/// Concrete services are stored as `Arc<T>`; trait services are stored as
/// `Arc<Arc<dyn S>>` since an `Arc<dyn S>` cannot be downcast directly.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type CastFn = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

/// One declared constructor of an implementation type: the ordered dependency
/// list plus the function that assembles an instance from the resolved
/// arguments.
///
/// This is the crate's stand-in for runtime constructor enumeration: a type
/// declares its constructors through [`Injectable`], and an activation
/// strategy turns the single declared constructor into a construction
/// function.
///
/// # Examples
///
/// ```rust
/// use minject::{Constructor, Injectable, Key};
/// use std::sync::Arc;
///
/// struct Database;
///
/// struct Repository {
///     db: Arc<Database>,
/// }
///
/// impl Injectable for Repository {
///     fn constructors() -> Vec<Constructor> {
///         vec![Constructor::new(vec![Key::of::<Database>()], |args| {
///             let db = args.take::<Database>()?;
///             Ok(Arc::new(Repository { db }))
///         })]
///     }
/// }
/// ```
#[derive(Clone)]
pub struct Constructor {
    params: Vec<Key>,
    invoke: fn(&mut ArgList) -> DiResult<AnyArc>,
}

impl Constructor {
    /// A constructor taking the dependencies named by `params`, in order.
    /// `invoke` receives the resolved arguments in that same order.
    pub fn new(params: Vec<Key>, invoke: fn(&mut ArgList) -> DiResult<AnyArc>) -> Self {
        Self { params, invoke }
    }

    pub(crate) fn params(&self) -> &[Key] {
        &self.params
    }

    pub(crate) fn invoke(&self, args: &mut ArgList) -> DiResult<AnyArc> {
        (self.invoke)(args)
    }
}

/// Resolved constructor arguments, consumed in declaration order.
pub struct ArgList {
    args: std::vec::IntoIter<AnyArc>,
}

impl ArgList {
    pub(crate) fn new(args: Vec<AnyArc>) -> Self {
        Self {
            args: args.into_iter(),
        }
    }

    /// Take the next argument as a concrete type.
    pub fn take<T: Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        let any = self.args.next().ok_or_else(DiError::type_mismatch::<T>)?;
        any.downcast::<T>()
            .map_err(|_| DiError::type_mismatch::<T>())
    }

    /// Take the next argument as a trait object.
    pub fn take_trait<T: ?Sized + Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        let any = self.args.next().ok_or_else(DiError::type_mismatch::<T>)?;
        any.downcast::<Arc<T>>()
            .map(|wrapped| (*wrapped).clone())
            .map_err(|_| DiError::type_mismatch::<T>())
    }
}

/// Types constructible by the container.
///
/// An implementation type enumerates its declared constructors; the installed
/// activation strategy requires exactly one (zero or several is an
/// [`InvalidConstructor`](crate::DiError::InvalidConstructor) error at first
/// activation). Types with teardown needs override [`dispose_hooks`].
///
/// [`dispose_hooks`]: Injectable::dispose_hooks
pub trait Injectable: Send + Sync + Sized + 'static {
    /// The constructors this type declares.
    fn constructors() -> Vec<Constructor>;

    /// Teardown capability applied to instances of this type when registered
    /// under their own key. Defaults to none.
    fn dispose_hooks() -> DisposeHooks {
        DisposeHooks::none()
    }
}

/// Describes how one service type is produced and under what lifetime.
///
/// Identity is the service [`Key`]; a container holds at most one descriptor
/// per key, and the last registration for a key wins. Descriptors are
/// immutable once the container is built.
pub enum ServiceDescriptor {
    /// A pre-built object. Always Singleton; never disposal-tracked, since
    /// the container did not construct it.
    Instance(InstanceDescriptor),
    /// A user-supplied factory; the declared lifetime is independent of how
    /// the factory behaves internally.
    Factory(FactoryDescriptor),
    /// Constructed from the implementation type's single declared
    /// constructor, through the installed activation strategy.
    Type(TypeDescriptor),
}

pub struct InstanceDescriptor {
    pub(crate) key: Key,
    pub(crate) instance: AnyArc,
}

pub struct FactoryDescriptor {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    pub(crate) factory: Activator,
    pub(crate) hooks: DisposeHooks,
}

pub struct TypeDescriptor {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    pub(crate) impl_name: &'static str,
    pub(crate) constructors: fn() -> Vec<Constructor>,
    /// For trait-keyed registrations: wraps the concrete instance into the
    /// stored trait-object form after construction.
    pub(crate) cast: Option<CastFn>,
    pub(crate) hooks: DisposeHooks,
}

impl ServiceDescriptor {
    /// Instance-based registration for a concrete service type.
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Instance(InstanceDescriptor {
            key: Key::of::<T>(),
            instance: Arc::new(value),
        })
    }

    /// Instance-based registration keyed by a trait object.
    pub fn trait_instance<S: ?Sized + Send + Sync + 'static>(value: Arc<S>) -> Self {
        Self::Instance(InstanceDescriptor {
            key: Key::of::<S>(),
            instance: Arc::new(value),
        })
    }

    /// Factory-based registration for a concrete service type.
    pub fn factory<T, F>(lifetime: Lifetime, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Scope) -> DiResult<T> + Send + Sync + 'static,
    {
        Self::Factory(FactoryDescriptor {
            key: Key::of::<T>(),
            lifetime,
            factory: Arc::new(move |scope: &Scope| Ok(Arc::new(factory(scope)?) as AnyArc)),
            hooks: DisposeHooks::none(),
        })
    }

    /// Factory-based registration keyed by a trait object.
    pub fn trait_factory<S, F>(lifetime: Lifetime, factory: F) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&Scope) -> DiResult<Arc<S>> + Send + Sync + 'static,
    {
        Self::Factory(FactoryDescriptor {
            key: Key::of::<S>(),
            lifetime,
            factory: Arc::new(move |scope: &Scope| Ok(Arc::new(factory(scope)?) as AnyArc)),
            hooks: DisposeHooks::none(),
        })
    }

    /// Type-based registration of `T` under its own key. Teardown capability
    /// comes from [`Injectable::dispose_hooks`].
    pub fn from_type<T: Injectable>(lifetime: Lifetime) -> Self {
        Self::Type(TypeDescriptor {
            key: Key::of::<T>(),
            lifetime,
            impl_name: std::any::type_name::<T>(),
            constructors: T::constructors,
            cast: None,
            hooks: T::dispose_hooks(),
        })
    }

    /// Type-based registration of `T` under the trait key `S`. The `cast`
    /// coercion is supplied at the call site, where both types are concrete:
    ///
    /// ```rust,ignore
    /// ServiceDescriptor::from_type_as::<dyn Logger, ConsoleLogger>(Lifetime::Transient, |l| l);
    /// ```
    ///
    /// The implementation type's dispose hooks do not cross the trait cast;
    /// see `DESIGN.md` for the rationale.
    pub fn from_type_as<S, T>(lifetime: Lifetime, cast: fn(Arc<T>) -> Arc<S>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Injectable,
    {
        Self::Type(TypeDescriptor {
            key: Key::of::<S>(),
            lifetime,
            impl_name: std::any::type_name::<T>(),
            constructors: T::constructors,
            cast: Some(Arc::new(move |instance: AnyArc| {
                let concrete = instance
                    .downcast::<T>()
                    .map_err(|_| DiError::type_mismatch::<T>())?;
                Ok(Arc::new(cast(concrete)) as AnyArc)
            })),
            hooks: DisposeHooks::none(),
        })
    }

    /// Attach a teardown capability to a factory- or type-based descriptor.
    /// Instance-based descriptors are left unchanged: the container does not
    /// own what it did not construct.
    pub fn with_dispose_hooks(self, hooks: DisposeHooks) -> Self {
        match self {
            Self::Instance(ib) => Self::Instance(ib),
            Self::Factory(fb) => Self::Factory(FactoryDescriptor { hooks, ..fb }),
            Self::Type(tb) => Self::Type(TypeDescriptor { hooks, ..tb }),
        }
    }

    /// The service key this descriptor answers for.
    pub fn key(&self) -> &Key {
        match self {
            Self::Instance(ib) => &ib.key,
            Self::Factory(fb) => &fb.key,
            Self::Type(tb) => &tb.key,
        }
    }

    /// The declared lifetime. Instance-based registrations are always
    /// Singleton, fixed at construction.
    pub fn lifetime(&self) -> Lifetime {
        match self {
            Self::Instance(_) => Lifetime::Singleton,
            Self::Factory(fb) => fb.lifetime,
            Self::Type(tb) => tb.lifetime,
        }
    }

    pub(crate) fn hooks(&self) -> Option<&DisposeHooks> {
        match self {
            Self::Instance(_) => None,
            Self::Factory(fb) => Some(&fb.hooks),
            Self::Type(tb) => Some(&tb.hooks),
        }
    }
}
