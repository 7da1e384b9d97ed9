use std::collections::HashSet;

use crate::domain::Identity;

/// Set of module identities admitted so far.
#[derive(Debug, Default)]
pub struct DuplicateGuard {
    seen: HashSet<Identity>,
}

/// A module identity occurred a second time in the chapter tree.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("duplicate module name detected, module: {0}")]
pub struct DuplicateIdentity(pub Identity);

impl DuplicateGuard {
    /// Admits `identity`, or rejects it if it was admitted before.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdentity`] on the second occurrence of an identity.
    pub fn admit(&mut self, identity: &Identity) -> Result<(), DuplicateIdentity> {
        if self.seen.insert(identity.clone()) {
            Ok(())
        } else {
            Err(DuplicateIdentity(identity.clone()))
        }
    }

    /// Number of admitted identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns `true` if nothing was admitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
