//! Integration tests for typed package operations and package source assembly

use anyhow::Result;
use ruledepot_core::ast::{
    ActionFieldValue, ActionSetField, FactPattern, RuleAttribute, RuleModel,
    SingleFieldConstraint,
};
use ruledepot_repository::{
    AssetUpdate, MemoryContentStore, PackageResource, PackageUpdate, RepositoryConfig,
    RepositoryError, RestApi,
};
use std::sync::Arc;

fn setup() -> Result<(RestApi, PackageResource)> {
    let store = Arc::new(MemoryContentStore::new());
    let config = RepositoryConfig::default().with_user("carol");
    let api = RestApi::new(store.clone(), &config);
    let resource = PackageResource::new(store, &config);
    api.create("packages/orders/.package", b"import com.acme.Order", false, "init")?;
    Ok((api, resource))
}

fn discount_rule() -> RuleModel {
    RuleModel::new("big order")
        .with_attribute(RuleAttribute::new("salience", "10"))
        .with_pattern(
            FactPattern::new("Order")
                .bound_to("$o")
                .with_constraint(SingleFieldConstraint::literal("total", ">", "100")),
        )
        .with_action(
            ActionSetField::new("$o")
                .with_field_value(ActionFieldValue::new("discount", "5", "Integer"))
                .update(),
        )
}

// =============================================================================
// Packages
// =============================================================================

#[test]
fn test_package_versions_skip_working_copy() -> Result<()> {
    let (_, resource) = setup()?;
    assert!(resource.package_versions("orders")?.is_empty());

    for comment in ["one", "two"] {
        resource.update_package(
            "orders",
            PackageUpdate {
                comment: comment.to_string(),
                ..Default::default()
            },
        )?;
    }

    let versions = resource.package_versions("orders")?;
    let numbers: Vec<u64> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(versions[1].comment, "two");
    assert_eq!(versions[1].contributor, "carol");
    assert_eq!(resource.get_package_version("orders", 1)?.checkin_comment, "one");
    Ok(())
}

#[test]
fn test_archive_package_is_logical() -> Result<()> {
    let (_, resource) = setup()?;
    let archived = resource.archive_package("orders")?;

    assert!(archived.archived);
    assert!(resource.get_package("orders")?.archived);
    assert_eq!(resource.list_packages()?.len(), 1);
    Ok(())
}

#[test]
fn test_create_package_twice() -> Result<()> {
    let (_, resource) = setup()?;
    assert!(matches!(
        resource.create_package("orders", "dup"),
        Err(RepositoryError::AlreadyExists { .. })
    ));
    Ok(())
}

#[test]
fn test_summary_serializes() -> Result<()> {
    let (_, resource) = setup()?;
    let summaries = resource.list_packages()?;
    let json = serde_json::to_value(&summaries)?;

    assert_eq!(json[0]["name"], "orders");
    assert_eq!(json[0]["version"], 0);
    assert!(json[0].get("header").is_none());
    Ok(())
}

// =============================================================================
// Package source
// =============================================================================

#[test]
fn test_package_source_marshals_rule_models() -> Result<()> {
    let (api, resource) = setup()?;
    let model_json = discount_rule().to_json()?;
    api.create("packages/orders/big.brl", model_json.as_bytes(), false, "add")?;
    api.create("packages/orders/helpers.function", b"function int one() { return 1; }", false, "add")?;
    api.create("packages/orders/logo.png", &[137, 80], true, "add")?;

    let source = resource.package_source("orders")?;
    let expected = "package orders\n\
                    import com.acme.Order\n\
                    rule \"big order\"\n\
                    \tsalience 10\n\
                    \tdialect \"mvel\"\n\
                    \twhen\n\
                    \t\t$o : Order( total > \"100\" )\n\
                    \tthen\n\
                    \t\t$o.setDiscount( 5 );\n\
                    \t\tupdate( $o );\n\
                    end\n\
                    function int one() { return 1; }\n";
    assert_eq!(source, expected);
    Ok(())
}

#[test]
fn test_package_source_skips_archived_assets() -> Result<()> {
    let (api, resource) = setup()?;
    api.create("packages/orders/old.drl", b"rule \"old\" end", false, "add")?;
    resource.archive_asset("orders", "old")?;

    assert_eq!(
        resource.package_source("orders")?,
        "package orders\nimport com.acme.Order\n"
    );
    Ok(())
}

// =============================================================================
// Assets
// =============================================================================

#[test]
fn test_asset_operations() -> Result<()> {
    let (api, resource) = setup()?;
    api.create("packages/orders/r.drl", b"rule \"r\" end", false, "add")?;

    let summaries = resource.list_assets("orders")?;
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].format, "drl");
    assert!(!summaries[0].binary);

    assert_eq!(resource.asset_source("orders", "r")?, "rule \"r\" end");
    assert_eq!(resource.asset_binary("orders", "r")?, b"rule \"r\" end".to_vec());

    let updated = resource.update_asset(
        "orders",
        "r",
        AssetUpdate {
            title: Some("Rule R".to_string()),
            content: Some("rule \"r\" when then end".to_string()),
            comment: "edit".to_string(),
            ..Default::default()
        },
    )?;
    assert_eq!(updated.version, 2);
    assert_eq!(updated.title, "Rule R");

    let versions = resource.asset_versions("orders", "r")?;
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[1].comment, "edit");
    Ok(())
}

#[test]
fn test_binary_asset_has_no_source() -> Result<()> {
    let (api, resource) = setup()?;
    api.create("packages/orders/logo.png", &[1, 2, 3], true, "add")?;

    assert_eq!(resource.asset_binary("orders", "logo")?, vec![1, 2, 3]);
    assert!(matches!(
        resource.asset_source("orders", "logo"),
        Err(RepositoryError::Unsupported(_))
    ));
    assert!(matches!(
        resource.update_asset(
            "orders",
            "logo",
            AssetUpdate {
                content: Some("text".to_string()),
                ..Default::default()
            },
        ),
        Err(RepositoryError::Unsupported(_))
    ));
    Ok(())
}

#[test]
fn test_archive_asset_keeps_history() -> Result<()> {
    let (api, resource) = setup()?;
    api.create("packages/orders/r.drl", b"x", false, "add")?;
    let archived = resource.archive_asset("orders", "r")?;

    assert!(archived.archived);
    assert_eq!(resource.asset_versions("orders", "r")?.len(), 2);
    assert!(matches!(
        resource.get_asset("orders", "r"),
        Err(RepositoryError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_removed_asset_is_hidden() -> Result<()> {
    let (api, resource) = setup()?;
    api.create("packages/orders/r.drl", b"rule \"r\" end", false, "add")?;
    api.create("packages/orders/keep.drl", b"rule \"keep\" end", false, "add")?;
    api.remove("packages/orders/r.drl")?;

    let listed = api.read("packages/orders")?;
    let summaries = resource.list_assets("orders")?;
    assert_eq!(listed.as_text().unwrap().lines().count(), summaries.len());
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "keep");

    for result in [
        resource.asset_source("orders", "r").map(|_| ()),
        resource.asset_binary("orders", "r").map(|_| ()),
        resource.archive_asset("orders", "r").map(|_| ()),
    ] {
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }
    Ok(())
}

// =============================================================================
// Historical package source
// =============================================================================

#[test]
fn test_package_version_source_is_pinned() -> Result<()> {
    let (api, resource) = setup()?;
    api.create("packages/orders/r.drl", b"rule \"r\" end", false, "add")?;
    resource.update_package(
        "orders",
        PackageUpdate {
            comment: "release".to_string(),
            ..Default::default()
        },
    )?;

    resource.update_asset(
        "orders",
        "r",
        AssetUpdate {
            content: Some("rule \"r2\" end".to_string()),
            comment: "edit".to_string(),
            ..Default::default()
        },
    )?;
    api.create("packages/orders/extra.drl", b"rule \"extra\" end", false, "add")?;

    assert_eq!(
        resource.package_version_source("orders", 1)?,
        "package orders\nimport com.acme.Order\nrule \"r\" end\n"
    );
    assert_eq!(
        resource.package_source("orders")?,
        "package orders\nimport com.acme.Order\nrule \"r2\" end\nrule \"extra\" end\n"
    );
    Ok(())
}

#[test]
fn test_package_version_source_unknown_version() -> Result<()> {
    let (_, resource) = setup()?;
    assert!(matches!(
        resource.package_version_source("orders", 3),
        Err(RepositoryError::NotFound { .. })
    ));
    Ok(())
}
