//! Disposal traits and the per-registration teardown capability.

use std::sync::Arc;

use tracing::warn;

use crate::descriptor::AnyArc;
use crate::internal::BoxFutureUnit;

/// Trait for synchronous resource teardown.
///
/// Implement this for services that need structured cleanup (flushing caches,
/// closing connections). Instances constructed by a scope are released in
/// reverse construction order when the scope is disposed.
///
/// # Examples
///
/// ```rust
/// use minject::Dispose;
///
/// struct Cache {
///     name: String,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         println!("flushing cache: {}", self.name);
///     }
/// }
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}

/// Trait for asynchronous resource teardown.
///
/// Implement this for services whose cleanup must await I/O (graceful
/// connection shutdown, draining queues). The async teardown path prefers
/// this hook; the synchronous path falls back to blocking on it when no
/// [`Dispose`] impl is available.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use minject::AsyncDispose;
///
/// struct DbClient {
///     connection_id: String,
/// }
///
/// #[async_trait]
/// impl AsyncDispose for DbClient {
///     async fn dispose(&self) {
///         println!("closing connection: {}", self.connection_id);
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait AsyncDispose: Send + Sync + 'static {
    /// Perform asynchronous cleanup of resources.
    async fn dispose(&self);
}

/// Teardown capability attached to a registration.
///
/// Rust has no runtime interface probing, so "is this instance disposable" is
/// answered at registration time: a descriptor carries hooks bound to the
/// implementation type, and the owning scope applies them to every instance
/// it constructs. A registration without hooks is simply never tracked.
///
/// An implementation type may carry either hook or both; the teardown path
/// picks whichever matches its own mode first and falls back to the other.
#[derive(Clone, Default)]
pub struct DisposeHooks {
    pub(crate) sync: Option<Arc<dyn Fn(&AnyArc) + Send + Sync>>,
    pub(crate) asynchronous: Option<Arc<dyn Fn(&AnyArc) -> BoxFutureUnit + Send + Sync>>,
}

impl DisposeHooks {
    /// No teardown capability; the instance is never tracked.
    pub fn none() -> Self {
        Self::default()
    }

    /// Synchronous teardown via `T`'s [`Dispose`] impl.
    pub fn sync_of<T: Dispose>() -> Self {
        Self {
            sync: Some(Self::sync_hook::<T>()),
            asynchronous: None,
        }
    }

    /// Asynchronous teardown via `T`'s [`AsyncDispose`] impl.
    pub fn async_of<T: AsyncDispose>() -> Self {
        Self {
            sync: None,
            asynchronous: Some(Self::async_hook::<T>()),
        }
    }

    /// Both teardown paths; each teardown mode prefers its own hook.
    pub fn both_of<T: Dispose + AsyncDispose>() -> Self {
        Self {
            sync: Some(Self::sync_hook::<T>()),
            asynchronous: Some(Self::async_hook::<T>()),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.sync.is_none() && self.asynchronous.is_none()
    }

    fn sync_hook<T: Dispose>() -> Arc<dyn Fn(&AnyArc) + Send + Sync> {
        Arc::new(|instance: &AnyArc| match instance.clone().downcast::<T>() {
            Ok(service) => service.dispose(),
            Err(_) => warn!(
                target: "minject",
                service = std::any::type_name::<T>(),
                "dispose hook saw an instance of an unexpected type"
            ),
        })
    }

    fn async_hook<T: AsyncDispose>() -> Arc<dyn Fn(&AnyArc) -> BoxFutureUnit + Send + Sync> {
        Arc::new(|instance: &AnyArc| -> BoxFutureUnit {
            match instance.clone().downcast::<T>() {
                Ok(service) => Box::pin(async move { service.dispose().await }),
                Err(_) => {
                    warn!(
                        target: "minject",
                        service = std::any::type_name::<T>(),
                        "async dispose hook saw an instance of an unexpected type"
                    );
                    Box::pin(std::future::ready(()))
                }
            }
        })
    }
}
