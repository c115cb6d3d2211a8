//! Frozen snapshots and ordered-slice helpers.
//!
//! A [`Snapshot`] is an independent copy of a value that only ever hands out
//! shared references. Containers in this crate store snapshots and return
//! clones of them, so callers can hold on to what they read without being
//! able to reach back into container state.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An immutable, independent copy of a value.
///
/// Cloning a snapshot is cheap: clones share the same allocation. There is no
/// way to obtain `&mut T` from a snapshot; use [`Snapshot::into_inner`] to get
/// an owned copy that can be edited and re-submitted.
///
/// ```compile_fail
/// use tessera_core::Snapshot;
///
/// let snapshot = Snapshot::new(vec![1]);
/// snapshot.push(2);
/// ```
///
/// ```compile_fail
/// use tessera_core::Snapshot;
///
/// let mut snapshot = Snapshot::new(String::from("frozen"));
/// snapshot.push_str(" no more");
/// ```
pub struct Snapshot<T>(Arc<T>);

impl<T> Snapshot<T> {
    /// Freeze an owned value.
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Check whether two snapshots share the same allocation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: Clone> Snapshot<T> {
    /// Freeze a copy of a borrowed value.
    ///
    /// The copy is as deep as `T::clone`. Later changes to `value` do not show
    /// up in the snapshot unless `T` shares state through fields such as
    /// `Arc<Mutex<_>>` or `Rc<RefCell<_>>`.
    pub fn capture(value: &T) -> Self {
        Self::new(value.clone())
    }

    /// Take an owned copy of the frozen value.
    pub fn into_inner(self) -> T {
        Arc::try_unwrap(self.0).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Build a new snapshot from a private copy of this one with `edit` applied.
    ///
    /// Existing clones of `self` keep observing the old value.
    pub(crate) fn rebuild(&self, edit: impl FnOnce(&mut T)) -> Self {
        let mut value = (*self.0).clone();
        edit(&mut value);
        Self::new(value)
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> AsRef<T> for Snapshot<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for Snapshot<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Snapshot").field(&*self.0).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Snapshot<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: Eq> Eq for Snapshot<T> {}

impl<T: PartialEq> PartialEq<T> for Snapshot<T> {
    fn eq(&self, other: &T) -> bool {
        *self.0 == *other
    }
}

impl<T: Serialize> Serialize for Snapshot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Snapshot<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Snapshot::new)
    }
}

/// Find the index at which a candidate belongs in a sorted slice.
///
/// `compare` orders each probe element against the candidate. The result is
/// the first index whose element is not less than the candidate, so an equal
/// element, if present, sits exactly at the returned index.
pub fn insertion_index<T, F>(items: &[T], mut compare: F) -> usize
where
    F: FnMut(&T) -> Ordering,
{
    items.partition_point(|probe| compare(probe) == Ordering::Less)
}

/// Binary-search a slice sorted by `key_fn` for `key`.
pub fn find_index<T, K, F>(items: &[T], key: &K, key_fn: F) -> Option<usize>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    items.binary_search_by_key(key, key_fn).ok()
}
