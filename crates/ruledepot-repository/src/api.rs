//! Path-addressed repository access
//!
//! [`RestApi`] maps `packages/<pkg>[/<file>]` addresses onto content store
//! operations with uniform content-type and concurrency handling.
//!
//! # Example
//!
//! ```
//! use ruledepot_repository::{MemoryContentStore, RepositoryConfig, RestApi};
//! use std::sync::Arc;
//!
//! # fn main() -> ruledepot_repository::RepositoryResult<()> {
//! let api = RestApi::new(Arc::new(MemoryContentStore::new()), &RepositoryConfig::default());
//! api.create("packages/billing/.package", b"import java.util.List", false, "new")?;
//! api.create("packages/billing/late_fee.drl", b"rule \"late fee\" end", false, "first")?;
//!
//! let listing = api.read("packages/billing")?;
//! assert!(listing.as_text().unwrap().starts_with("late_fee.drl="));
//! # Ok(())
//! # }
//! ```

use crate::config::RepositoryConfig;
use crate::models::{AssetItem, Checkin, Content, ItemKind, TIMESTAMP_FORMAT};
use crate::path::ResourcePath;
use crate::traits::ContentStore;
use crate::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, warn};

/// Description given to items created through the façade
pub const ADDED_REMOTELY: &str = "<added remotely>";

/// Check-in comment used when an asset is removed through the façade
pub const REMOVED_REMOTELY: &str = "<removed remotely>";

/// Body of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Text {
        data: String,
        last_modified: DateTime<Utc>,
    },
    Binary {
        data: Vec<u8>,
        last_modified: DateTime<Utc>,
    },
}

impl Response {
    pub fn last_modified(&self) -> DateTime<Utc> {
        match self {
            Response::Text { last_modified, .. } | Response::Binary { last_modified, .. } => {
                *last_modified
            }
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Response::Binary { .. })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Response::Text { data, .. } => Some(data),
            Response::Binary { .. } => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Response::Text { data, .. } => data.as_bytes(),
            Response::Binary { data, .. } => data,
        }
    }
}

/// Precondition for an overwrite
#[derive(Debug, Clone, Copy)]
enum WriteGuard {
    /// Reject if the stored stamp is strictly after this one
    LastModified(DateTime<Utc>),
    /// Reject unless the stored revision equals this one
    Version(u64),
}

impl WriteGuard {
    fn admits(&self, last_modified: DateTime<Utc>, version: u64) -> bool {
        match *self {
            WriteGuard::LastModified(expected) => last_modified <= expected,
            WriteGuard::Version(expected) => version == expected,
        }
    }
}

/// Repository access façade
#[derive(Clone)]
pub struct RestApi {
    store: Arc<dyn ContentStore>,
    contributor: String,
}

impl RestApi {
    pub fn new(store: Arc<dyn ContentStore>, config: &RepositoryConfig) -> Self {
        Self {
            store,
            contributor: config.user.clone(),
        }
    }

    /// Record writes under a different contributor
    pub fn with_contributor(mut self, contributor: impl Into<String>) -> Self {
        self.contributor = contributor.into();
        self
    }

    fn checkin(&self, comment: &str) -> Checkin {
        Checkin::new(self.contributor.clone(), comment)
    }

    /// Read a package listing, a package header or an asset
    pub fn read(&self, path: &str) -> RepositoryResult<Response> {
        let resource = ResourcePath::parse(path)?;
        debug!(path = %path, "read");

        let package = self.store.load_package(&resource.package)?;
        let Some(file) = resource.file else {
            return self.list_package(&resource.package, package.last_modified);
        };

        if file.is_package_header() {
            return Ok(Response::Text {
                data: package.header,
                last_modified: package.last_modified,
            });
        }

        let asset = self.store.load_asset(&package.name, file.stem())?;
        match asset.content {
            Content::Binary(data) => Ok(Response::Binary {
                data,
                last_modified: asset.last_modified,
            }),
            // Text reads carry the package stamp, as listings do
            Content::Text(data) => Ok(Response::Text {
                data,
                last_modified: package.last_modified,
            }),
        }
    }

    fn list_package(
        &self,
        package: &str,
        last_modified: DateTime<Utc>,
    ) -> RepositoryResult<Response> {
        let mut data = String::new();
        for asset in self.store.list_assets(package)?.iter().filter(|a| !a.archived) {
            // Writing into a String cannot fail
            let _ = writeln!(
                data,
                "{}={}",
                asset.file_name(),
                asset.last_modified.format(TIMESTAMP_FORMAT)
            );
        }
        Ok(Response::Text {
            data,
            last_modified,
        })
    }

    /// Create a package (file extension `package`) or a new asset
    pub fn create(
        &self,
        path: &str,
        content: &[u8],
        is_binary: bool,
        comment: &str,
    ) -> RepositoryResult<()> {
        let resource = ResourcePath::parse(path)?;
        let file = resource.require_file()?;
        debug!(path = %path, binary = is_binary, "create");

        if file.declares_package() {
            let mut draft = self
                .store
                .create_package(&resource.package, ADDED_REMOTELY)?
                .checkout();
            draft.header = String::from_utf8_lossy(content).into_owned();
            self.store.save_package(draft, &self.checkin(comment))?;
            return Ok(());
        }

        let format = file.extension().filter(|f| !f.is_empty()).ok_or_else(|| {
            RepositoryError::InvalidRequest(format!("No format in file name {}", file.as_str()))
        })?;

        let mut draft = AssetItem::draft(&resource.package, file.asset_name()?, ADDED_REMOTELY);
        draft.format = format.to_string();
        draft.content = if is_binary {
            Content::Binary(content.to_vec())
        } else {
            Content::Text(String::from_utf8_lossy(content).into_owned())
        };
        self.store.checkin_asset(draft, &self.checkin(comment))?;
        Ok(())
    }

    /// Overwrite a package header or asset, creating a new revision
    ///
    /// Fails with a conflict if the stored last-modified stamp is strictly
    /// after `expected_last_modified`.
    pub fn update(
        &self,
        path: &str,
        expected_last_modified: DateTime<Utc>,
        content: &[u8],
        comment: &str,
    ) -> RepositoryResult<()> {
        self.write(
            path,
            WriteGuard::LastModified(expected_last_modified),
            content,
            comment,
        )
    }

    /// Like [`RestApi::update`], guarded by the revision number instead of the stamp
    pub fn update_at_version(
        &self,
        path: &str,
        expected_version: u64,
        content: &[u8],
        comment: &str,
    ) -> RepositoryResult<()> {
        self.write(path, WriteGuard::Version(expected_version), content, comment)
    }

    fn write(
        &self,
        path: &str,
        guard: WriteGuard,
        content: &[u8],
        comment: &str,
    ) -> RepositoryResult<()> {
        let resource = ResourcePath::parse(path)?;
        let file = resource.require_file()?;
        debug!(path = %path, ?guard, "update");

        let package = self.store.load_package(&resource.package)?;
        if file.declares_package() {
            if !guard.admits(package.last_modified, package.version) {
                warn!(package = %package.name, "Stale package header write");
                return Err(RepositoryError::conflict(
                    ItemKind::Package,
                    package.last_contributor,
                ));
            }
            let mut draft = package.checkout();
            draft.header = String::from_utf8_lossy(content).into_owned();
            self.store.checkin_package(draft, &self.checkin(comment))?;
            return Ok(());
        }

        let asset = self.store.load_asset(&package.name, file.stem())?;
        if !guard.admits(asset.last_modified, asset.version) {
            warn!(asset = %asset.path(), "Stale asset write");
            return Err(RepositoryError::conflict(
                ItemKind::Asset,
                asset.last_contributor,
            ));
        }
        let mut draft = asset.checkout();
        draft.content.overwrite(content);
        self.store.checkin_asset(draft, &self.checkin(comment))?;
        Ok(())
    }

    /// Archive an asset; history is kept
    pub fn remove(&self, path: &str) -> RepositoryResult<()> {
        let resource = ResourcePath::parse(path)?;
        let file = resource.require_file()?;
        if file.declares_package() {
            return Err(RepositoryError::InvalidRequest(
                "Packages cannot be removed through this path".to_string(),
            ));
        }
        debug!(path = %path, "remove");

        let mut draft = self
            .store
            .load_asset(&resource.package, file.asset_name()?)?
            .checkout();
        draft.archived = true;
        self.store.checkin_asset(draft, &self.checkin(REMOVED_REMOTELY))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryContentStore;
    use chrono::Duration;

    fn api() -> RestApi {
        RestApi::new(
            Arc::new(MemoryContentStore::new()),
            &RepositoryConfig::default().with_user("tester"),
        )
    }

    #[test]
    fn test_create_and_read_header() {
        let api = api();
        api.create("packages/pkg/.package", b"import a.B", false, "init")
            .unwrap();

        let response = api.read("packages/pkg/.package").unwrap();
        assert_eq!(response.as_text(), Some("import a.B"));
    }

    #[test]
    fn test_read_text_asset_uses_package_stamp() {
        let api = api();
        api.create("packages/pkg/.package", b"", false, "init").unwrap();
        api.create("packages/pkg/r.drl", b"rule", false, "add").unwrap();

        let header = api.read("packages/pkg/.package").unwrap();
        let asset = api.read("packages/pkg/r.drl").unwrap();
        assert_eq!(asset.as_text(), Some("rule"));
        assert_eq!(asset.last_modified(), header.last_modified());
    }

    #[test]
    fn test_read_binary_asset() {
        let api = api();
        api.create("packages/pkg/.package", b"", false, "init").unwrap();
        api.create("packages/pkg/img.png", &[0, 159, 146], true, "add")
            .unwrap();

        let response = api.read("packages/pkg/img.png").unwrap();
        assert!(response.is_binary());
        assert_eq!(response.as_bytes(), &[0, 159, 146]);
    }

    #[test]
    fn test_update_conflict_names_contributor() {
        let api = api();
        api.create("packages/pkg/.package", b"", false, "init").unwrap();
        api.create("packages/pkg/r.drl", b"v1", false, "add").unwrap();

        let stale = Utc::now() - Duration::hours(1);
        let err = api
            .update("packages/pkg/r.drl", stale, b"v2", "edit")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The asset was modified by: tester, unable to write changes."
        );
        assert_eq!(api.read("packages/pkg/r.drl").unwrap().as_text(), Some("v1"));
    }

    #[test]
    fn test_update_at_version() {
        let api = api();
        api.create("packages/pkg/.package", b"", false, "init").unwrap();
        api.create("packages/pkg/r.drl", b"v1", false, "add").unwrap();

        api.update_at_version("packages/pkg/r.drl", 1, b"v2", "edit")
            .unwrap();
        let err = api
            .update_at_version("packages/pkg/r.drl", 1, b"v3", "late")
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(api.read("packages/pkg/r.drl").unwrap().as_text(), Some("v2"));
    }

    #[test]
    fn test_create_requires_format() {
        let api = api();
        api.create("packages/pkg/.package", b"", false, "init").unwrap();
        assert!(matches!(
            api.create("packages/pkg/noformat", b"x", false, "add"),
            Err(RepositoryError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_remove_package_header_rejected() {
        let api = api();
        api.create("packages/pkg/.package", b"", false, "init").unwrap();
        assert!(matches!(
            api.remove("packages/pkg/.package"),
            Err(RepositoryError::InvalidRequest(_))
        ));
    }
}
