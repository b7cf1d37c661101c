//! Package source assembly
//!
//! Concatenates a package's header and the source of its live assets into a
//! single DRL document.

use crate::config::RepositoryConfig;
use crate::models::{AssetItem, Content, PackageItem};
use crate::RepositoryResult;
use ruledepot_compiler::{DrlMarshaller, RulePersistence};
use ruledepot_core::RuleModel;
use std::sync::Arc;
use tracing::debug;

/// Builds the DRL of a package
#[derive(Clone)]
pub struct PackageAssembler {
    persistence: Arc<dyn RulePersistence>,
    config: RepositoryConfig,
}

impl PackageAssembler {
    pub fn new(config: &RepositoryConfig) -> Self {
        Self {
            persistence: Arc::new(DrlMarshaller::new()),
            config: config.clone(),
        }
    }

    /// Use a different rule model marshaller
    pub fn with_persistence(mut self, persistence: Arc<dyn RulePersistence>) -> Self {
        self.persistence = persistence;
        self
    }

    /// Assemble `package <name>`, the header, then each non-archived asset
    pub fn assemble(&self, package: &PackageItem, assets: &[AssetItem]) -> RepositoryResult<String> {
        let mut out = String::new();
        out.push_str("package ");
        out.push_str(&package.name);
        out.push('\n');

        if !package.header.is_empty() {
            push_section(&mut out, &package.header);
        }

        for asset in assets.iter().filter(|a| !a.archived) {
            if let Some(source) = self.asset_source(asset)? {
                push_section(&mut out, &source);
            }
        }

        Ok(out)
    }

    /// DRL contributed by one asset, or `None` if the asset has no source form
    pub fn asset_source(&self, asset: &AssetItem) -> RepositoryResult<Option<String>> {
        let Content::Text(text) = &asset.content else {
            debug!(asset = %asset.path(), "Skipping binary asset");
            return Ok(None);
        };

        if asset.format == self.config.rule_model_format {
            let model = RuleModel::from_json(text)?;
            return Ok(Some(self.persistence.marshal(&model)?));
        }

        if self.config.is_source_format(&asset.format) {
            return Ok(Some(text.clone()));
        }

        debug!(asset = %asset.path(), format = %asset.format, "Skipping asset without source form");
        Ok(None)
    }
}

/// Append text, terminating it with a newline
fn push_section(out: &mut String, text: &str) {
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}
