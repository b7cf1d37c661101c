//! Data models for the repository layer
//!
//! Packages and assets are plain values. The store hands out copies; edits go
//! through a [`Draft`] obtained by `checkout` and are committed with a
//! [`Checkin`].

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Listing timestamp layout, second precision without zone
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current time at the granularity stamps are stored and listed at
pub(crate) fn stamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Which kind of item an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Package,
    Asset,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Package => f.write_str("package"),
            ItemKind::Asset => f.write_str("asset"),
        }
    }
}

/// Asset payload: text or a binary attachment, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Content {
    Text(String),
    Binary(Vec<u8>),
}

impl Content {
    pub fn is_binary(&self) -> bool {
        matches!(self, Content::Binary(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(text) => Some(text),
            Content::Binary(_) => None,
        }
    }

    /// Raw bytes of either representation
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Content::Text(text) => text.as_bytes(),
            Content::Binary(bytes) => bytes,
        }
    }

    /// Text view; binary content is decoded lossily
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        match self {
            Content::Text(text) => Cow::Borrowed(text),
            Content::Binary(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    /// Replace the payload keeping the current representation
    pub fn overwrite(&mut self, bytes: &[u8]) {
        *self = match self {
            Content::Binary(_) => Content::Binary(bytes.to_vec()),
            Content::Text(_) => Content::Text(String::from_utf8_lossy(bytes).into_owned()),
        };
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

/// A versioned container of assets plus a header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageItem {
    pub name: String,
    pub title: String,
    pub description: String,
    /// Serialized runtime configuration, emitted ahead of the package rules
    pub header: String,
    pub last_modified: DateTime<Utc>,
    pub last_contributor: String,
    pub checkin_comment: String,
    /// 0 until the first checkin
    pub version: u64,
    pub archived: bool,
}

impl PackageItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        PackageItem {
            title: name.clone(),
            name,
            description: description.into(),
            header: String::new(),
            last_modified: stamp_now(),
            last_contributor: String::new(),
            checkin_comment: String::new(),
            version: 0,
            archived: false,
        }
    }

    /// Begin an edit of this revision
    pub fn checkout(&self) -> Draft<PackageItem> {
        Draft::new(self.clone(), self.version)
    }
}

/// A named rule artifact inside a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetItem {
    pub package_name: String,
    pub name: String,
    pub format: String,
    pub title: String,
    pub description: String,
    pub content: Content,
    pub last_modified: DateTime<Utc>,
    pub last_contributor: String,
    pub checkin_comment: String,
    pub version: u64,
    pub archived: bool,
}

impl AssetItem {
    /// Draft of an asset that does not exist yet
    ///
    /// Checking it in fails if the package already holds an asset by that name.
    pub fn draft(
        package_name: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Draft<AssetItem> {
        let name = name.into();
        let asset = AssetItem {
            package_name: package_name.into(),
            title: name.clone(),
            name,
            format: String::new(),
            description: description.into(),
            content: Content::default(),
            last_modified: stamp_now(),
            last_contributor: String::new(),
            checkin_comment: String::new(),
            version: 0,
            archived: false,
        };
        Draft::new(asset, 0)
    }

    /// Begin an edit of this revision
    pub fn checkout(&self) -> Draft<AssetItem> {
        Draft::new(self.clone(), self.version)
    }

    pub fn is_binary(&self) -> bool {
        self.content.is_binary()
    }

    /// `name.format`, as used in listings and paths
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.format)
    }

    /// `package/name`, used in diagnostics
    pub fn path(&self) -> String {
        format!("{}/{}", self.package_name, self.name)
    }
}

/// An editable copy of an item, remembering the revision it came from
///
/// The store rejects a checkin whose base revision is no longer current.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<T> {
    item: T,
    base_version: u64,
}

impl<T> Draft<T> {
    fn new(item: T, base_version: u64) -> Self {
        Draft { item, base_version }
    }

    /// Revision this draft was checked out from (0 for new items)
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn into_inner(self) -> T {
        self.item
    }
}

impl<T> Deref for Draft<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T> DerefMut for Draft<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

/// Who commits a change and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkin {
    pub contributor: String,
    pub comment: String,
}

impl Checkin {
    pub fn new(contributor: impl Into<String>, comment: impl Into<String>) -> Self {
        Checkin {
            contributor: contributor.into(),
            comment: comment.into(),
        }
    }
}

/// Package listing entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    pub title: String,
    pub description: String,
    pub last_modified: DateTime<Utc>,
    pub last_contributor: String,
    pub checkin_comment: String,
    pub version: u64,
    pub archived: bool,
}

impl From<&PackageItem> for PackageSummary {
    fn from(item: &PackageItem) -> Self {
        PackageSummary {
            name: item.name.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            last_modified: item.last_modified,
            last_contributor: item.last_contributor.clone(),
            checkin_comment: item.checkin_comment.clone(),
            version: item.version,
            archived: item.archived,
        }
    }
}

/// Asset listing entry, without content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub name: String,
    pub format: String,
    pub title: String,
    pub description: String,
    pub binary: bool,
    pub last_modified: DateTime<Utc>,
    pub last_contributor: String,
    pub version: u64,
    pub archived: bool,
}

impl From<&AssetItem> for AssetSummary {
    fn from(item: &AssetItem) -> Self {
        AssetSummary {
            name: item.name.clone(),
            format: item.format.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            binary: item.is_binary(),
            last_modified: item.last_modified,
            last_contributor: item.last_contributor.clone(),
            version: item.version,
            archived: item.archived,
        }
    }
}

/// One checked-in revision in a version feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: u64,
    pub last_modified: DateTime<Utc>,
    pub contributor: String,
    pub comment: String,
}

impl From<&PackageItem> for VersionEntry {
    fn from(item: &PackageItem) -> Self {
        VersionEntry {
            version: item.version,
            last_modified: item.last_modified,
            contributor: item.last_contributor.clone(),
            comment: item.checkin_comment.clone(),
        }
    }
}

impl From<&AssetItem> for VersionEntry {
    fn from(item: &AssetItem) -> Self {
        VersionEntry {
            version: item.version,
            last_modified: item.last_modified,
            contributor: item.last_contributor.clone(),
            comment: item.checkin_comment.clone(),
        }
    }
}
