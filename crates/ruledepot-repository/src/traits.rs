//! Content store contract
//!
//! The store is the only owner of shared mutable state. Implementations must
//! serialize conflicting writes and enforce the revision check on checkin:
//! a draft whose base version is no longer current is rejected with
//! [`RepositoryError::Conflict`](crate::RepositoryError::Conflict).

use crate::models::{AssetItem, Checkin, Draft, PackageItem};
use crate::RepositoryResult;

/// Versioned store of packages and their assets
pub trait ContentStore: Send + Sync {
    /// Create an empty package at version 0
    ///
    /// Fails with `AlreadyExists` if the name is taken.
    fn create_package(&self, name: &str, description: &str) -> RepositoryResult<PackageItem>;

    /// Current revision of a package
    fn load_package(&self, name: &str) -> RepositoryResult<PackageItem>;

    fn contains_package(&self, name: &str) -> RepositoryResult<bool>;

    /// All packages, ordered by name
    fn list_packages(&self) -> RepositoryResult<Vec<PackageItem>>;

    /// Persist a package draft in place, without creating a revision
    fn save_package(
        &self,
        draft: Draft<PackageItem>,
        checkin: &Checkin,
    ) -> RepositoryResult<PackageItem>;

    /// Commit a package draft as a new revision
    fn checkin_package(
        &self,
        draft: Draft<PackageItem>,
        checkin: &Checkin,
    ) -> RepositoryResult<PackageItem>;

    /// Checked-in package revisions, oldest first
    fn package_history(&self, name: &str) -> RepositoryResult<Vec<PackageItem>>;

    /// Current revision of an asset
    fn load_asset(&self, package: &str, name: &str) -> RepositoryResult<AssetItem>;

    /// Current revisions of every asset in a package, archived ones included,
    /// in insertion order
    fn list_assets(&self, package: &str) -> RepositoryResult<Vec<AssetItem>>;

    /// Commit an asset draft as a new revision
    ///
    /// A draft from [`AssetItem::draft`] adds the asset.
    fn checkin_asset(&self, draft: Draft<AssetItem>, checkin: &Checkin)
        -> RepositoryResult<AssetItem>;

    /// Checked-in asset revisions, oldest first
    fn asset_history(&self, package: &str, name: &str) -> RepositoryResult<Vec<AssetItem>>;

    /// A specific checked-in package revision
    fn load_package_version(&self, name: &str, version: u64) -> RepositoryResult<PackageItem> {
        self.package_history(name)?
            .into_iter()
            .find(|p| p.version == version)
            .ok_or_else(|| crate::RepositoryError::not_found(format!("{}@{}", name, version)))
    }

    /// Asset revisions that were current when package revision `version` was
    /// checked in, archived ones included, in insertion order
    fn list_assets_at(&self, package: &str, version: u64) -> RepositoryResult<Vec<AssetItem>>;
}
