//! The package cache built by the dependency walk.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::models::PackageDescriptor;

/// Import path → descriptor, holding every non-local transitive dependency.
///
/// The cache keeps at most one descriptor per import path; the first insertion wins.
/// Insertion order is recorded so the postorder contract of the walk (a package is
/// inserted only after everything it depends on) can be observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageCache {
    packages: BTreeMap<String, PackageDescriptor>,
    order: Vec<String>,
}

impl PackageCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `import_path` is cached.
    #[must_use]
    pub fn contains(&self, import_path: &str) -> bool {
        self.packages.contains_key(import_path)
    }

    /// The cached descriptor for `import_path`.
    #[must_use]
    pub fn get(&self, import_path: &str) -> Option<&PackageDescriptor> {
        self.packages.get(import_path)
    }

    /// Insert `package` unless its import path is already present.
    ///
    /// Local packages are never cached. Returns whether the cache changed.
    pub fn insert(&mut self, package: PackageDescriptor) -> bool {
        if package.is_local {
            return false;
        }
        match self.packages.entry(package.import_path.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                self.order.push(package.import_path.clone());
                slot.insert(package);
                true
            }
        }
    }

    /// Number of cached packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Cached import paths in sorted order.
    pub fn import_paths(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// Import paths in the order they were inserted.
    #[must_use]
    pub fn insertion_order(&self) -> &[String] {
        &self.order
    }
}

impl FromIterator<PackageDescriptor> for PackageCache {
    fn from_iter<I: IntoIterator<Item = PackageDescriptor>>(iter: I) -> Self {
        let mut cache = Self::new();
        for package in iter {
            cache.insert(package);
        }
        cache
    }
}
