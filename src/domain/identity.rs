use std::{
    borrow::Borrow,
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    ffi::OsStr,
    path::Path,
};

use non_empty_string::NonEmptyString;
use serde::{Serialize, Serializer};

/// The short name a section or module is known by across the whole book.
///
/// Derived from the key declared in the chapter tree: the path basename with
/// its final extension stripped. `List/ListADT.rst` and `ListADT` both map to
/// `ListADT`, which is why identities must be unique book-wide rather than
/// per directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Identity(NonEmptyString);

impl Identity {
    /// Derives the identity of a declared tree key.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIdentity`] if the key has no basename (for example an
    /// empty key or one ending in `..`).
    pub fn from_key(key: &str) -> Result<Self, InvalidIdentity> {
        let stem = Path::new(key)
            .file_stem()
            .and_then(OsStr::to_str)
            .ok_or_else(|| InvalidIdentity(key.to_string()))?;

        NonEmptyString::new(stem.to_string())
            .map(Self)
            .map_err(|_| InvalidIdentity(key.to_string()))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Identity {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Identity {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Error returned when a tree key does not yield a usable name.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid tree key '{0}': no module or section name can be derived from it")]
pub struct InvalidIdentity(String);
