//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for element ids, class names and
//! selector names. Ids are compared far more often than they are printed, so
//! they are interned once and compared as symbols afterwards.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock, PoisonError},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner, so
/// independent documents can be compiled on different threads.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use gem_core::identifier::Id;
///
/// let header = Id::new("header");
/// let class = Id::new("lighter");
///
/// assert_eq!(header, "header");
/// assert_ne!(header, class);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns the interned string as an owned `String`.
    pub fn as_string(&self) -> String {
        interner()
            .resolve(self.0)
            .map(str::to_string)
            .unwrap_or_default()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner.resolve(self.0).unwrap_or_default();
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gem_core::identifier::Id;
    ///
    /// let id: Id = "example".into();
    /// assert_eq!(id, "example");
    /// ```
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("title");
        let id2 = Id::new("title");
        let id3 = Id::new("subtitle");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "title");
    }

    #[test]
    fn test_display_and_as_string() {
        let id = Id::new("lighter");
        assert_eq!(id.to_string(), "lighter");
        assert_eq!(id.as_string(), "lighter");
    }

    #[test]
    fn test_from_str_slice() {
        let id: Id = "big-box".into();
        assert!(id == "big-box");
        assert!(id != "big_box");
    }

    #[test]
    fn test_ids_are_shared_across_threads() {
        let here = Id::new("shared");
        let there = std::thread::spawn(|| Id::new("shared"))
            .join()
            .expect("thread should not panic");
        assert_eq!(here, there);
    }
}
