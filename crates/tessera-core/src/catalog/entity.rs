//! Entity identity.

use crate::error::{Error, Result};

/// A record keyed by a positive integer identity.
///
/// The catalog stores a `Clone` of each record, so a stored snapshot is only
/// independent of the caller's value when `Clone` copies all of its state.
/// Fields that share state across clones (`Arc<Mutex<_>>`, `Rc<RefCell<_>>`)
/// stay shared.
pub trait Entity {
    /// The record's identity. Valid identities are `>= 1`.
    fn id(&self) -> i64;
}

impl<T: Entity> Entity for crate::Snapshot<T> {
    fn id(&self) -> i64 {
        (**self).id()
    }
}

/// Check that `id` is a usable identity.
pub fn validate_identity(id: i64) -> Result<i64> {
    if id >= 1 {
        Ok(id)
    } else {
        Err(Error::InvalidIdentity(id))
    }
}
