//! Versioned rule repository for ruledepot
//!
//! This crate stores packages of rule assets with checkout/checkin revision
//! semantics and exposes them two ways:
//!
//! - [`RestApi`]: path-addressed reads and writes (`packages/<pkg>/<file>`)
//!   with optimistic concurrency
//! - [`PackageResource`]: typed package and asset operations, including the
//!   assembled DRL source of a package
//!
//! Storage sits behind the [`ContentStore`] trait; [`MemoryContentStore`] keeps
//! everything in memory.
//!
//! # Quick Start
//!
//! ```
//! use ruledepot_repository::{MemoryContentStore, PackageResource, RepositoryConfig};
//! use std::sync::Arc;
//!
//! # fn main() -> ruledepot_repository::RepositoryResult<()> {
//! let config = RepositoryConfig::default();
//! let resource = PackageResource::new(Arc::new(MemoryContentStore::new()), &config);
//!
//! resource.create_package("billing", "Billing rules")?;
//! assert_eq!(resource.package_source("billing")?, "package billing\n");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod assembler;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod path;
pub mod resource;
pub mod traits;

pub use api::{Response, RestApi};
pub use assembler::PackageAssembler;
pub use config::RepositoryConfig;
pub use error::{RepositoryError, RepositoryResult};
pub use memory::MemoryContentStore;
pub use models::{
    AssetItem, AssetSummary, Checkin, Content, Draft, ItemKind, PackageItem, PackageSummary,
    VersionEntry,
};
pub use path::{FileName, ResourcePath};
pub use resource::{AssetUpdate, PackageResource, PackageUpdate};
pub use traits::ContentStore;
