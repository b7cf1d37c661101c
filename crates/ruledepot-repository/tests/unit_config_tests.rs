//! Integration tests for repository configuration

use anyhow::Result;
use ruledepot_repository::{RepositoryConfig, RepositoryError};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_from_yaml_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("repository.yaml");
    fs::write(
        &path,
        "user: dana\nsource_formats:\n  - drl\n  - rdrl\n",
    )?;

    let config = RepositoryConfig::from_file(&path)?;
    assert_eq!(config.user, "dana");
    assert_eq!(config.rule_model_format, "brl");
    assert!(config.is_source_format("rdrl"));
    assert!(!config.is_source_format("dslr"));
    Ok(())
}

#[test]
fn test_from_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = RepositoryConfig::from_file(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(RepositoryError::Config(_))));
}

#[test]
fn test_yaml_round_trip() -> Result<()> {
    let config = RepositoryConfig::default().with_user("erin");
    let yaml = serde_yaml::to_string(&config)?;
    let parsed: RepositoryConfig = serde_yaml::from_str(&yaml)?;
    assert_eq!(parsed, config);
    Ok(())
}

#[test]
fn test_load_falls_back_to_defaults() -> Result<()> {
    // No config/repository file exists in the crate directory
    let config = RepositoryConfig::load()?;
    assert_eq!(config.rule_model_format, "brl");
    Ok(())
}

#[test]
fn test_load_splits_source_formats_from_env() -> Result<()> {
    std::env::set_var("RULEDEPOT_SOURCE_FORMATS", "drl,rdrl");
    let config = RepositoryConfig::load();
    std::env::remove_var("RULEDEPOT_SOURCE_FORMATS");

    let config = config?;
    assert_eq!(config.source_formats, vec!["drl", "rdrl"]);
    assert!(!config.is_source_format("dslr"));
    Ok(())
}
