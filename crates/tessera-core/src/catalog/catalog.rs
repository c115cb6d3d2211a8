//! Catalog storage for entity snapshots.

use super::entity::{validate_identity, Entity};
use crate::error::{Error, Result};
use crate::snapshot::{find_index, insertion_index, Snapshot};

/// A sorted, identity-keyed collection of entity snapshots.
///
/// Entries are kept in a single vector ordered by ascending identity, so
/// lookups are a binary search and inserts/removes shift the tail.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<Snapshot<T>>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Entity + Clone> Catalog<T> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a batch of items.
    ///
    /// Fails on the first item with an invalid or duplicate identity.
    pub fn from_items<'a, I>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(item)?;
        }
        Ok(catalog)
    }

    /// Insert a snapshot of `item`.
    ///
    /// Returns the stored snapshot. The catalog is unchanged on error.
    pub fn insert(&mut self, item: &T) -> Result<Snapshot<T>> {
        let id = validate_identity(item.id())?;

        let index = insertion_index(&self.entries, |probe| probe.id().cmp(&id));
        if self.entries.get(index).is_some_and(|existing| existing.id() == id) {
            return Err(Error::DuplicateIdentity(id));
        }

        let snapshot = Snapshot::capture(item);
        self.entries.insert(index, snapshot.clone());

        tracing::debug!(id, size = self.entries.len(), "entity inserted");
        Ok(snapshot)
    }

    /// Replace the stored snapshot for `item`'s identity.
    pub fn update(&mut self, item: &T) -> Result<Snapshot<T>> {
        let id = validate_identity(item.id())?;
        let index = self.position(id).ok_or(Error::IdentityNotFound(id))?;

        let snapshot = Snapshot::capture(item);
        self.entries[index] = snapshot.clone();

        tracing::debug!(id, "entity updated");
        Ok(snapshot)
    }

    /// Look up the snapshot for `id`.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Snapshot<T>>> {
        let id = validate_identity(id)?;
        Ok(self.position(id).map(|index| self.entries[index].clone()))
    }

    /// Remove the entry for `id`, returning it if it was present.
    pub fn remove(&mut self, id: i64) -> Result<Option<Snapshot<T>>> {
        let id = validate_identity(id)?;
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let removed = self.entries.remove(index);
        tracing::debug!(id, size = self.entries.len(), "entity removed");
        Ok(Some(removed))
    }

    /// Check whether an entry exists for `id`.
    pub fn contains(&self, id: i64) -> Result<bool> {
        let id = validate_identity(id)?;
        Ok(self.position(id).is_some())
    }

    /// All snapshots in ascending identity order.
    pub fn fetch_all(&self) -> Vec<Snapshot<T>> {
        self.entries.clone()
    }

    /// All identities in ascending order.
    pub fn ids(&self) -> Vec<i64> {
        self.entries.iter().map(|entry| entry.id()).collect()
    }

    /// Iterate over snapshots in ascending identity order.
    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot<T>> {
        self.entries.iter()
    }

    fn position(&self, id: i64) -> Option<usize> {
        find_index(&self.entries, &id, |entry| entry.id())
    }
}

impl<T> Catalog<T> {
    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T: Entity + Clone> IntoIterator for &'a Catalog<T> {
    type Item = &'a Snapshot<T>;
    type IntoIter = std::slice::Iter<'a, Snapshot<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Product {
        id: i64,
        name: String,
        tags: Vec<String>,
    }

    impl Product {
        fn new(id: i64, name: &str) -> Self {
            Self {
                id,
                name: name.to_string(),
                tags: Vec::new(),
            }
        }
    }

    impl Entity for Product {
        fn id(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn test_catalog_empty() {
        let catalog: Catalog<Product> = Catalog::new();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert!(catalog.fetch_all().is_empty());
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut catalog = Catalog::new();
        for id in [5, 1, 9, 3] {
            catalog.insert(&Product::new(id, "p")).unwrap();
        }

        assert_eq!(catalog.ids(), vec![1, 3, 5, 9]);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut catalog = Catalog::new();
        assert!(catalog.find_by_id(5).unwrap().is_none());

        catalog.insert(&Product::new(5, "first")).unwrap();
        let err = catalog.insert(&Product::new(5, "second")).unwrap_err();

        assert_eq!(err, Error::DuplicateIdentity(5));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find_by_id(5).unwrap().unwrap().name, "first");

        catalog.remove(5).unwrap();
        assert!(catalog.find_by_id(5).unwrap().is_none());
    }

    #[test]
    fn test_invalid_identity() {
        let mut catalog = Catalog::new();

        assert_eq!(
            catalog.insert(&Product::new(0, "zero")).unwrap_err(),
            Error::InvalidIdentity(0)
        );
        assert_eq!(
            catalog.update(&Product::new(-1, "neg")).unwrap_err(),
            Error::InvalidIdentity(-1)
        );
        assert_eq!(catalog.find_by_id(0).unwrap_err(), Error::InvalidIdentity(0));
        assert_eq!(catalog.remove(-7).unwrap_err(), Error::InvalidIdentity(-7));
        assert_eq!(catalog.contains(0).unwrap_err(), Error::InvalidIdentity(0));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_update_replaces() {
        let mut catalog = Catalog::new();
        let mut product = Product::new(2, "widget");
        product.tags.push("old".to_string());
        catalog.insert(&product).unwrap();

        let replacement = Product::new(2, "gadget");
        catalog.update(&replacement).unwrap();

        let stored = catalog.find_by_id(2).unwrap().unwrap();
        assert_eq!(stored.name, "gadget");
        assert!(stored.tags.is_empty());
    }

    #[test]
    fn test_update_missing() {
        let mut catalog = Catalog::new();
        catalog.insert(&Product::new(1, "a")).unwrap();

        let err = catalog.update(&Product::new(2, "b")).unwrap_err();
        assert_eq!(err, Error::IdentityNotFound(2));
        assert_eq!(catalog.ids(), vec![1]);
    }

    #[test]
    fn test_snapshot_independence() {
        let mut catalog = Catalog::new();
        let mut product = Product::new(3, "original");
        catalog.insert(&product).unwrap();

        product.name = "mutated".to_string();
        product.tags.push("x".to_string());

        let stored = catalog.find_by_id(3).unwrap().unwrap();
        assert_eq!(stored.name, "original");
        assert!(stored.tags.is_empty());

        catalog.update(&product).unwrap();
        product.name = "mutated again".to_string();
        assert_eq!(catalog.find_by_id(3).unwrap().unwrap().name, "mutated");

        // Earlier reads keep the value they observed.
        assert_eq!(stored.name, "original");
    }

    #[test]
    fn test_fetch_all_is_detached() {
        let mut catalog = Catalog::new();
        catalog.insert(&Product::new(1, "a")).unwrap();
        catalog.insert(&Product::new(2, "b")).unwrap();

        let mut all = catalog.fetch_all();
        all.clear();

        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut catalog = Catalog::new();
        catalog.insert(&Product::new(1, "a")).unwrap();

        assert!(catalog.remove(42).unwrap().is_none());
        assert_eq!(catalog.len(), 1);

        let removed = catalog.remove(1).unwrap().unwrap();
        assert_eq!(removed.name, "a");
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_from_items() {
        let items = vec![Product::new(4, "d"), Product::new(2, "b")];
        let catalog = Catalog::from_items(&items).unwrap();
        assert_eq!(catalog.ids(), vec![2, 4]);

        let dupes = vec![Product::new(1, "a"), Product::new(1, "b")];
        assert_eq!(
            Catalog::from_items(&dupes).unwrap_err(),
            Error::DuplicateIdentity(1)
        );
    }

    #[test]
    fn test_iter_in_order() {
        let mut catalog = Catalog::new();
        for id in [8, 2, 6] {
            catalog.insert(&Product::new(id, "p")).unwrap();
        }

        let ids: Vec<i64> = (&catalog).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 6, 8]);
        assert!(catalog.contains(6).unwrap());
        assert!(!catalog.contains(7).unwrap());
    }
}
