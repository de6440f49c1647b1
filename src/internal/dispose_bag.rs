//! Ordered disposal list with LIFO teardown.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::descriptor::AnyArc;
use crate::traits::DisposeHooks;

/// Future type for disposal operations.
pub(crate) type BoxFutureUnit = Pin<Box<dyn Future<Output = ()> + Send>>;

/// One constructed instance awaiting teardown.
///
/// The entry keeps the instance alive until its hook has run, so a dependent
/// disposed earlier in the traversal can still reach its dependencies.
pub(crate) struct DisposeEntry {
    instance: AnyArc,
    sync: Option<Arc<dyn Fn(&AnyArc) + Send + Sync>>,
    asynchronous: Option<Arc<dyn Fn(&AnyArc) -> BoxFutureUnit + Send + Sync>>,
}

impl DisposeEntry {
    pub(crate) fn bind(hooks: &DisposeHooks, instance: AnyArc) -> Self {
        Self {
            instance,
            sync: hooks.sync.clone(),
            asynchronous: hooks.asynchronous.clone(),
        }
    }
}

/// Append-only list of disposables, drained once in reverse construction
/// order. Dependencies are constructed before their dependents, so walking
/// the list backwards releases dependents while everything they might still
/// reference is alive.
#[derive(Default)]
pub(crate) struct DisposeBag {
    entries: Vec<DisposeEntry>,
}

impl DisposeBag {
    pub(crate) fn push(&mut self, entry: DisposeEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Synchronous teardown. Prefers the sync hook per instance and
    /// best-effort-blocks on instances that only expose an async hook.
    pub(crate) fn run_sync_reverse(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if let Some(hook) = &entry.sync {
                hook(&entry.instance);
            } else if let Some(hook) = &entry.asynchronous {
                futures::executor::block_on(hook(&entry.instance));
            }
        }
    }

    /// Asynchronous teardown. Prefers the async hook per instance and falls
    /// back to the sync hook when that is all the instance exposes.
    pub(crate) async fn run_async_reverse(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if let Some(hook) = &entry.asynchronous {
                hook(&entry.instance).await;
            } else if let Some(hook) = &entry.sync {
                hook(&entry.instance);
            }
        }
    }
}
