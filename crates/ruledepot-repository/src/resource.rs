//! Typed package and asset operations
//!
//! The structured counterpart of [`RestApi`](crate::RestApi): packages and
//! assets are addressed by name and returned as models or summaries ready to
//! serialize. Archived assets are hidden from listings and lookups; their
//! version history stays readable.

use crate::assembler::PackageAssembler;
use crate::config::RepositoryConfig;
use crate::models::{
    AssetItem, AssetSummary, Checkin, Content, PackageItem, PackageSummary, VersionEntry,
};
use crate::traits::ContentStore;
use crate::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Check-in comment used when an item is archived
pub const ARCHIVED_COMMENT: &str = "Archived";

/// Fields of a package to change; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub archived: Option<bool>,
    pub comment: String,
}

/// Fields of an asset to change; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    /// New text content
    pub content: Option<String>,
    pub comment: String,
}

/// Package resource
#[derive(Clone)]
pub struct PackageResource {
    store: Arc<dyn ContentStore>,
    assembler: PackageAssembler,
    contributor: String,
}

impl PackageResource {
    pub fn new(store: Arc<dyn ContentStore>, config: &RepositoryConfig) -> Self {
        Self {
            store,
            assembler: PackageAssembler::new(config),
            contributor: config.user.clone(),
        }
    }

    fn checkin(&self, comment: &str) -> Checkin {
        Checkin::new(self.contributor.clone(), comment)
    }

    // ----- packages -----

    pub fn list_packages(&self) -> RepositoryResult<Vec<PackageSummary>> {
        Ok(self
            .store
            .list_packages()?
            .iter()
            .map(PackageSummary::from)
            .collect())
    }

    /// Create a package named after `title`
    pub fn create_package(&self, title: &str, description: &str) -> RepositoryResult<PackageSummary> {
        if title.trim().is_empty() {
            return Err(RepositoryError::InvalidRequest(
                "Package title must not be empty".to_string(),
            ));
        }
        let package = self.store.create_package(title, description)?;
        Ok(PackageSummary::from(&package))
    }

    pub fn get_package(&self, name: &str) -> RepositoryResult<PackageItem> {
        self.store.load_package(name)
    }

    pub fn get_package_version(&self, name: &str, version: u64) -> RepositoryResult<PackageItem> {
        self.store.load_package_version(name, version)
    }

    /// Apply an update and check the package in
    pub fn update_package(&self, name: &str, update: PackageUpdate) -> RepositoryResult<PackageItem> {
        let mut draft = self.store.load_package(name)?.checkout();
        if let Some(title) = update.title {
            draft.title = title;
        }
        if let Some(description) = update.description {
            draft.description = description;
        }
        if let Some(archived) = update.archived {
            draft.archived = archived;
        }
        debug!(package = %name, "Updating package");
        self.store.checkin_package(draft, &self.checkin(&update.comment))
    }

    /// Logical delete; the package stays in the store
    pub fn archive_package(&self, name: &str) -> RepositoryResult<PackageItem> {
        let mut draft = self.store.load_package(name)?.checkout();
        draft.archived = true;
        self.store.checkin_package(draft, &self.checkin(ARCHIVED_COMMENT))
    }

    /// Checked-in revisions; the initial working copy is not listed
    pub fn package_versions(&self, name: &str) -> RepositoryResult<Vec<VersionEntry>> {
        Ok(self
            .store
            .package_history(name)?
            .iter()
            .map(VersionEntry::from)
            .collect())
    }

    /// DRL of the whole package
    pub fn package_source(&self, name: &str) -> RepositoryResult<String> {
        let package = self.store.load_package(name)?;
        let assets = self.store.list_assets(name)?;
        self.assembler.assemble(&package, &assets)
    }

    /// DRL of the package as it stood at a checked-in revision
    pub fn package_version_source(&self, name: &str, version: u64) -> RepositoryResult<String> {
        let package = self.store.load_package_version(name, version)?;
        let assets = self.store.list_assets_at(name, version)?;
        self.assembler.assemble(&package, &assets)
    }

    // ----- assets -----

    /// Current asset, or `NotFound` once it is archived
    fn live_asset(&self, package: &str, name: &str) -> RepositoryResult<AssetItem> {
        let asset = self.store.load_asset(package, name)?;
        if asset.archived {
            return Err(RepositoryError::not_found(asset.path()));
        }
        Ok(asset)
    }

    pub fn list_assets(&self, package: &str) -> RepositoryResult<Vec<AssetSummary>> {
        Ok(self
            .store
            .list_assets(package)?
            .iter()
            .filter(|a| !a.archived)
            .map(AssetSummary::from)
            .collect())
    }

    pub fn get_asset(&self, package: &str, name: &str) -> RepositoryResult<AssetItem> {
        self.live_asset(package, name)
    }

    /// Raw bytes of the asset content
    pub fn asset_binary(&self, package: &str, name: &str) -> RepositoryResult<Vec<u8>> {
        Ok(self.live_asset(package, name)?.content.as_bytes().to_vec())
    }

    /// Stored text of the asset
    pub fn asset_source(&self, package: &str, name: &str) -> RepositoryResult<String> {
        match self.live_asset(package, name)?.content {
            Content::Text(text) => Ok(text),
            Content::Binary(_) => Err(RepositoryError::Unsupported(format!(
                "{}/{} is binary and has no source",
                package, name
            ))),
        }
    }

    pub fn asset_versions(&self, package: &str, name: &str) -> RepositoryResult<Vec<VersionEntry>> {
        Ok(self
            .store
            .asset_history(package, name)?
            .iter()
            .map(VersionEntry::from)
            .collect())
    }

    /// Apply an update and check the asset in
    pub fn update_asset(
        &self,
        package: &str,
        name: &str,
        update: AssetUpdate,
    ) -> RepositoryResult<AssetItem> {
        let mut draft = self.live_asset(package, name)?.checkout();
        if let Some(title) = update.title {
            draft.title = title;
        }
        if let Some(description) = update.description {
            draft.description = description;
        }
        if let Some(content) = update.content {
            if draft.is_binary() {
                return Err(RepositoryError::Unsupported(format!(
                    "{} is binary; text content cannot be set",
                    draft.path()
                )));
            }
            draft.content = Content::Text(content);
        }
        debug!(asset = %draft.path(), "Updating asset");
        self.store.checkin_asset(draft, &self.checkin(&update.comment))
    }

    /// Logical delete; history is kept
    pub fn archive_asset(&self, package: &str, name: &str) -> RepositoryResult<AssetItem> {
        let mut draft = self.live_asset(package, name)?.checkout();
        draft.archived = true;
        self.store.checkin_asset(draft, &self.checkin(ARCHIVED_COMMENT))
    }
}
