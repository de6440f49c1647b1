//! Error types for the container.

use thiserror::Error;

use crate::key::Key;

/// Errors surfaced during service resolution.
///
/// Resolution has no retry policy anywhere: every error propagates
/// synchronously to the immediate caller.
///
/// # Examples
///
/// ```rust
/// use minject::{DiError, ServiceCollection};
///
/// let container = ServiceCollection::new().build();
/// let scope = container.create_scope();
///
/// match scope.resolve::<String>() {
///     Err(DiError::NotFound { type_name }) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// No descriptor is registered for the requested service type.
    #[error("service not found: {type_name}")]
    NotFound { type_name: &'static str },

    /// The stored instance does not match the requested type. Usually the
    /// registration and the resolution disagree on concrete vs trait form,
    /// or a constructor consumed its arguments out of order.
    #[error("type mismatch for {type_name}")]
    TypeMismatch { type_name: &'static str },

    /// A type-based descriptor must declare exactly one constructor.
    /// Raised lazily, at first activation of the offending type.
    #[error("{type_name} must declare exactly one constructor, found {found}")]
    InvalidConstructor {
        type_name: &'static str,
        found: usize,
    },
}

impl DiError {
    pub(crate) fn not_found(key: &Key) -> Self {
        Self::NotFound {
            type_name: key.display_name(),
        }
    }

    pub(crate) fn type_mismatch<T: ?Sized + 'static>() -> Self {
        Self::TypeMismatch {
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Result type for container operations.
pub type DiResult<T> = Result<T, DiError>;
