//! In-memory content store
//!
//! Keeps every package, asset and revision in process memory. Suitable for
//! tests and embedding; nothing survives a restart.

use crate::models::{stamp_now, AssetItem, Checkin, Draft, ItemKind, PackageItem};
use crate::traits::ContentStore;
use crate::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

struct AssetEntry {
    current: AssetItem,
    history: Vec<AssetItem>,
}

/// A checked-in package revision and the asset revisions current at the time
struct PackageRevision {
    package: PackageItem,
    assets: Vec<(String, u64)>,
}

struct PackageEntry {
    current: PackageItem,
    history: Vec<PackageRevision>,
    /// Insertion order is the listing order
    assets: Vec<AssetEntry>,
}

impl PackageEntry {
    fn asset(&self, name: &str) -> Option<&AssetEntry> {
        self.assets.iter().find(|a| a.current.name == name)
    }

    fn revision(&self, version: u64) -> Option<&PackageRevision> {
        self.history.iter().find(|r| r.package.version == version)
    }

    fn asset_mut(&mut self, name: &str) -> Option<&mut AssetEntry> {
        self.assets.iter_mut().find(|a| a.current.name == name)
    }
}

/// In-memory content store
pub struct MemoryContentStore {
    packages: RwLock<BTreeMap<String, PackageEntry>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self {
            packages: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, BTreeMap<String, PackageEntry>>> {
        self.packages
            .read()
            .map_err(|_| RepositoryError::Store("package lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, BTreeMap<String, PackageEntry>>> {
        self.packages
            .write()
            .map_err(|_| RepositoryError::Store("package lock poisoned".to_string()))
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Stamp for a new write; never earlier than the previous one
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    stamp_now().max(previous)
}

fn package_entry<'a>(
    packages: &'a BTreeMap<String, PackageEntry>,
    name: &str,
) -> RepositoryResult<&'a PackageEntry> {
    packages
        .get(name)
        .ok_or_else(|| RepositoryError::not_found(name))
}

fn package_entry_mut<'a>(
    packages: &'a mut BTreeMap<String, PackageEntry>,
    name: &str,
) -> RepositoryResult<&'a mut PackageEntry> {
    packages
        .get_mut(name)
        .ok_or_else(|| RepositoryError::not_found(name))
}

/// Reject a package draft whose base revision is no longer current
fn check_package_base(entry: &PackageEntry, draft: &Draft<PackageItem>) -> RepositoryResult<()> {
    if entry.current.version != draft.base_version() {
        warn!(
            package = %entry.current.name,
            base = draft.base_version(),
            current = entry.current.version,
            "Rejected stale package draft"
        );
        return Err(RepositoryError::conflict(
            ItemKind::Package,
            entry.current.last_contributor.clone(),
        ));
    }
    Ok(())
}

impl ContentStore for MemoryContentStore {
    fn create_package(&self, name: &str, description: &str) -> RepositoryResult<PackageItem> {
        let mut packages = self.write()?;
        if packages.contains_key(name) {
            return Err(RepositoryError::already_exists(name));
        }

        let package = PackageItem::new(name, description);
        packages.insert(
            name.to_string(),
            PackageEntry {
                current: package.clone(),
                history: Vec::new(),
                assets: Vec::new(),
            },
        );
        info!(package = %name, "Created package");
        Ok(package)
    }

    fn load_package(&self, name: &str) -> RepositoryResult<PackageItem> {
        let packages = self.read()?;
        Ok(package_entry(&packages, name)?.current.clone())
    }

    fn contains_package(&self, name: &str) -> RepositoryResult<bool> {
        Ok(self.read()?.contains_key(name))
    }

    fn list_packages(&self) -> RepositoryResult<Vec<PackageItem>> {
        Ok(self.read()?.values().map(|e| e.current.clone()).collect())
    }

    fn save_package(
        &self,
        draft: Draft<PackageItem>,
        checkin: &Checkin,
    ) -> RepositoryResult<PackageItem> {
        let mut packages = self.write()?;
        let entry = package_entry_mut(&mut packages, &draft.name)?;
        check_package_base(entry, &draft)?;

        let mut package = draft.into_inner();
        package.version = entry.current.version;
        package.last_modified = next_stamp(entry.current.last_modified);
        package.last_contributor = checkin.contributor.clone();
        package.checkin_comment = checkin.comment.clone();
        entry.current = package.clone();

        debug!(package = %package.name, version = package.version, "Saved package in place");
        Ok(package)
    }

    fn checkin_package(
        &self,
        draft: Draft<PackageItem>,
        checkin: &Checkin,
    ) -> RepositoryResult<PackageItem> {
        let mut packages = self.write()?;
        let entry = package_entry_mut(&mut packages, &draft.name)?;
        check_package_base(entry, &draft)?;

        let mut package = draft.into_inner();
        package.version = entry.current.version + 1;
        package.last_modified = next_stamp(entry.current.last_modified);
        package.last_contributor = checkin.contributor.clone();
        package.checkin_comment = checkin.comment.clone();
        let assets = entry
            .assets
            .iter()
            .map(|a| (a.current.name.clone(), a.current.version))
            .collect();
        entry.history.push(PackageRevision {
            package: package.clone(),
            assets,
        });
        entry.current = package.clone();

        debug!(package = %package.name, version = package.version, "Checked in package");
        Ok(package)
    }

    fn package_history(&self, name: &str) -> RepositoryResult<Vec<PackageItem>> {
        let packages = self.read()?;
        Ok(package_entry(&packages, name)?
            .history
            .iter()
            .map(|r| r.package.clone())
            .collect())
    }

    fn load_package_version(&self, name: &str, version: u64) -> RepositoryResult<PackageItem> {
        let packages = self.read()?;
        package_entry(&packages, name)?
            .revision(version)
            .map(|r| r.package.clone())
            .ok_or_else(|| RepositoryError::not_found(format!("{}@{}", name, version)))
    }

    fn list_assets_at(&self, package: &str, version: u64) -> RepositoryResult<Vec<AssetItem>> {
        let packages = self.read()?;
        let entry = package_entry(&packages, package)?;
        let revision = entry
            .revision(version)
            .ok_or_else(|| RepositoryError::not_found(format!("{}@{}", package, version)))?;

        revision
            .assets
            .iter()
            .map(|(name, asset_version)| {
                entry
                    .asset(name)
                    .and_then(|a| a.history.iter().find(|h| h.version == *asset_version))
                    .cloned()
                    .ok_or_else(|| {
                        RepositoryError::Store(format!(
                            "{}/{} has no revision {}",
                            package, name, asset_version
                        ))
                    })
            })
            .collect()
    }

    fn load_asset(&self, package: &str, name: &str) -> RepositoryResult<AssetItem> {
        let packages = self.read()?;
        package_entry(&packages, package)?
            .asset(name)
            .map(|a| a.current.clone())
            .ok_or_else(|| RepositoryError::not_found(format!("{}/{}", package, name)))
    }

    fn list_assets(&self, package: &str) -> RepositoryResult<Vec<AssetItem>> {
        let packages = self.read()?;
        Ok(package_entry(&packages, package)?
            .assets
            .iter()
            .map(|a| a.current.clone())
            .collect())
    }

    fn checkin_asset(
        &self,
        draft: Draft<AssetItem>,
        checkin: &Checkin,
    ) -> RepositoryResult<AssetItem> {
        let mut packages = self.write()?;
        let entry = package_entry_mut(&mut packages, &draft.package_name)?;
        let base_version = draft.base_version();
        let mut asset = draft.into_inner();

        match entry.asset_mut(&asset.name) {
            Some(existing) => {
                if base_version == 0 {
                    return Err(RepositoryError::already_exists(asset.path()));
                }
                if existing.current.version != base_version {
                    warn!(
                        asset = %asset.path(),
                        base = base_version,
                        current = existing.current.version,
                        "Rejected stale asset draft"
                    );
                    return Err(RepositoryError::conflict(
                        ItemKind::Asset,
                        existing.current.last_contributor.clone(),
                    ));
                }
                asset.version = existing.current.version + 1;
                asset.last_modified = next_stamp(existing.current.last_modified);
                asset.last_contributor = checkin.contributor.clone();
                asset.checkin_comment = checkin.comment.clone();
                existing.history.push(asset.clone());
                existing.current = asset.clone();
            }
            None => {
                if base_version != 0 {
                    return Err(RepositoryError::not_found(asset.path()));
                }
                asset.version = 1;
                asset.last_modified = stamp_now();
                asset.last_contributor = checkin.contributor.clone();
                asset.checkin_comment = checkin.comment.clone();
                entry.assets.push(AssetEntry {
                    current: asset.clone(),
                    history: vec![asset.clone()],
                });
            }
        }

        debug!(asset = %asset.path(), version = asset.version, "Checked in asset");
        Ok(asset)
    }

    fn asset_history(&self, package: &str, name: &str) -> RepositoryResult<Vec<AssetItem>> {
        let packages = self.read()?;
        package_entry(&packages, package)?
            .asset(name)
            .map(|a| a.history.clone())
            .ok_or_else(|| RepositoryError::not_found(format!("{}/{}", package, name)))
    }
}
