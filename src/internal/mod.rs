//! Internal helpers not exposed outside the crate.

mod dispose_bag;

pub(crate) use dispose_bag::{BoxFutureUnit, DisposeBag, DisposeEntry};
