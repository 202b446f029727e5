//! Storage for processed packages.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use uuid::Uuid;

use crate::models::ProcessedPackage;

/// Where processed packages are kept, keyed by source path.
///
/// Implementations must be shareable across threads. Putting a package for a
/// path that is already stored replaces the old record.
pub trait PackageStore: Send + Sync {
    fn get_by_path(&self, source_path: &str) -> Result<Option<ProcessedPackage>>;
    fn get_by_id(&self, id: Uuid) -> Result<Option<ProcessedPackage>>;
    fn put(&self, package: &ProcessedPackage) -> Result<()>;
    /// All packages, ordered by source path.
    fn list(&self) -> Result<Vec<ProcessedPackage>>;
    /// Remove everything. Returns how many packages were removed.
    fn clear(&self) -> Result<usize>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    packages: Mutex<HashMap<String, ProcessedPackage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PackageStore for MemoryStore {
    fn get_by_path(&self, source_path: &str) -> Result<Option<ProcessedPackage>> {
        let packages = self.packages.lock().expect("package store lock poisoned");
        Ok(packages.get(source_path).cloned())
    }

    fn get_by_id(&self, id: Uuid) -> Result<Option<ProcessedPackage>> {
        let packages = self.packages.lock().expect("package store lock poisoned");
        Ok(packages.values().find(|p| p.id == id).cloned())
    }

    fn put(&self, package: &ProcessedPackage) -> Result<()> {
        let mut packages = self.packages.lock().expect("package store lock poisoned");
        packages.insert(package.source_path.clone(), package.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<ProcessedPackage>> {
        let packages = self.packages.lock().expect("package store lock poisoned");
        let mut all: Vec<_> = packages.values().cloned().collect();
        all.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        Ok(all)
    }

    fn clear(&self) -> Result<usize> {
        let mut packages = self.packages.lock().expect("package store lock poisoned");
        let removed = packages.len();
        packages.clear();
        Ok(removed)
    }
}

impl<S: PackageStore + ?Sized> PackageStore for std::sync::Arc<S> {
    fn get_by_path(&self, source_path: &str) -> Result<Option<ProcessedPackage>> {
        (**self).get_by_path(source_path)
    }

    fn get_by_id(&self, id: Uuid) -> Result<Option<ProcessedPackage>> {
        (**self).get_by_id(id)
    }

    fn put(&self, package: &ProcessedPackage) -> Result<()> {
        (**self).put(package)
    }

    fn list(&self) -> Result<Vec<ProcessedPackage>> {
        (**self).list()
    }

    fn clear(&self) -> Result<usize> {
        (**self).clear()
    }
}
