//! Resource path parsing
//!
//! Grammar: `packages/<pkg>`, `packages/<pkg>/.package` and
//! `packages/<pkg>/<asset>.<format>`. Segments are percent-decoded as UTF-8
//! with `+` read as a space.

use crate::{RepositoryError, RepositoryResult};
use std::borrow::Cow;

/// Top-level segment every resource path starts with
pub const PACKAGES_ROOT: &str = "packages";

/// File name that addresses a package header on read
pub const PACKAGE_HEADER_FILE: &str = ".package";

/// Extension that marks a package header on create and update
pub const PACKAGE_EXTENSION: &str = "package";

/// A parsed resource address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pub package: String,
    pub file: Option<FileName>,
}

impl ResourcePath {
    /// Parse and decode a path
    ///
    /// A leading `/` is stripped and trailing empty segments are ignored.
    pub fn parse(path: &str) -> RepositoryResult<Self> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let mut segments = trimmed
            .split('/')
            .map(decode_segment)
            .collect::<RepositoryResult<Vec<_>>>()?;
        while segments.last().is_some_and(|s| s.is_empty()) {
            segments.pop();
        }

        match segments.first().map(String::as_str) {
            Some(PACKAGES_ROOT) => {}
            _ => {
                return Err(RepositoryError::InvalidRequest(format!(
                    "Unable to deal with {}",
                    path
                )))
            }
        }

        match segments.len() {
            2 | 3 => {}
            _ => {
                return Err(RepositoryError::InvalidRequest(format!(
                    "Expected packages/<package>[/<file>], got {}",
                    path
                )))
            }
        }

        let mut segments = segments.into_iter().skip(1);
        let package = segments.next().unwrap_or_default();
        if package.is_empty() {
            return Err(RepositoryError::InvalidRequest(format!(
                "Empty package name in {}",
                path
            )));
        }
        let file = segments.next().map(FileName::new);

        Ok(ResourcePath { package, file })
    }

    /// The file segment, or `InvalidRequest` when the path names only a package
    pub fn require_file(&self) -> RepositoryResult<&FileName> {
        self.file.as_ref().ok_or_else(|| {
            RepositoryError::InvalidRequest(format!(
                "Path names package {} but no file",
                self.package
            ))
        })
    }
}

/// The file segment of a resource path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName(String);

impl FileName {
    pub fn new(raw: impl Into<String>) -> Self {
        FileName(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Text before the first `.`; the asset name
    pub fn stem(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    /// Text between the first and second `.`; the asset format
    pub fn extension(&self) -> Option<&str> {
        self.0.split('.').nth(1)
    }

    /// Exactly `.package`
    pub fn is_package_header(&self) -> bool {
        self.0 == PACKAGE_HEADER_FILE
    }

    /// Extension is `package`, e.g. `.package` or `rules.package`
    pub fn declares_package(&self) -> bool {
        self.extension() == Some(PACKAGE_EXTENSION)
    }

    /// Asset name, rejecting an empty stem
    pub fn asset_name(&self) -> RepositoryResult<&str> {
        match self.stem() {
            "" => Err(RepositoryError::InvalidRequest(format!(
                "No asset name in {}",
                self.0
            ))),
            stem => Ok(stem),
        }
    }
}

/// Percent-decode one segment (UTF-8, `+` as space)
pub fn decode_segment(segment: &str) -> RepositoryResult<String> {
    validate_escapes(segment)?;
    let spaced = segment.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .map_err(|e| RepositoryError::Encoding(format!("{}: {}", segment, e)))
}

/// Every `%` must be followed by two hex digits
fn validate_escapes(segment: &str) -> RepositoryResult<()> {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(RepositoryError::Encoding(format!(
                    "Malformed escape at byte {} of {}",
                    i, segment
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
