//! Repository configuration
//!
//! Loaded from an optional `config/repository` file and `RULEDEPOT_*`
//! environment variables, falling back to defaults. List values such as
//! `RULEDEPOT_SOURCE_FORMATS=drl,dslr` are comma separated.

use crate::RepositoryResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Repository configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Contributor recorded on writes made through the façade and resource
    pub user: String,

    /// Asset format that holds a JSON-encoded rule model
    pub rule_model_format: String,

    /// Text asset formats copied verbatim into package source
    pub source_formats: Vec<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            user: "admin".to_string(),
            rule_model_format: "brl".to_string(),
            source_formats: vec![
                "drl".to_string(),
                "dslr".to_string(),
                "function".to_string(),
            ],
        }
    }
}

impl RepositoryConfig {
    /// Load configuration from file and environment
    pub fn load() -> RepositoryResult<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/repository").required(false))
            .add_source(
                config::Environment::with_prefix("RULEDEPOT")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("source_formats"),
            )
            .build();

        match config_result {
            Ok(cfg) => Ok(cfg.try_deserialize()?),
            Err(e) => {
                tracing::info!("No usable repository config ({}), using defaults", e);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a single file; format follows the extension
    pub fn from_file(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Whether assets of this format are copied into package source
    pub fn is_source_format(&self, format: &str) -> bool {
        self.source_formats.iter().any(|f| f == format)
    }
}
