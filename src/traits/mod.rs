//! Public traits for resource teardown.

mod dispose;

pub use dispose::{AsyncDispose, Dispose, DisposeHooks};
