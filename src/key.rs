//! Service key type for descriptor lookup.

use std::any::TypeId;
use std::fmt;

/// Identity of a registered service.
///
/// A key is the `TypeId` of the service type plus its `type_name` for
/// diagnostics. Both concrete types and trait objects have a `TypeId`, so the
/// same key form covers `Database` and `dyn Logger` registrations alike.
///
/// # Examples
///
/// ```rust
/// use minject::Key;
///
/// trait Logger: Send + Sync {}
///
/// let concrete = Key::of::<String>();
/// let trait_object = Key::of::<dyn Logger>();
///
/// assert_ne!(concrete, trait_object);
/// assert!(trait_object.display_name().contains("Logger"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key for the service type `T`, which may be a trait object.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable type name, for diagnostics and error messages.
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

// Identity is the TypeId alone; the name is carried only for diagnostics.
impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
