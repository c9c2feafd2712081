//! Tests for YAML loader module

use super::*;
use crate::error::Error;
use crate::pagination::{MetaCase, PageParamStyle, PaginationStrategy};
use std::io::Write;
use tempfile::NamedTempFile;

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_catalog() {
    let yaml = r#"
resources:
  - type: posts
"#;

    let catalog = load_catalog_from_str(yaml).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.base_url().is_none());

    let posts = catalog.get("posts").unwrap();
    assert_eq!(posts.table, "posts");
    assert_eq!(posts.schema.id_column(), "id");
    assert!(posts.schema.default_sort().is_none());
    assert!(posts.schema.default_pagination().is_none());

    let config = posts.schema.pagination();
    assert_eq!(config.strategy(), PaginationStrategy::LengthAware);
    assert_eq!(config.param_name(config.page_key()), "page[number]");
    assert_eq!(config.param_name(config.per_page_key()), "page[size]");
    assert_eq!(config.default_per_page(), 15);
    assert_eq!(config.max_per_page(), 250);
    assert_eq!(config.meta_key(), "page");
    assert!(config.nested_meta());
    assert_eq!(config.meta_case(), MetaCase::Camel);
}

#[test]
fn test_load_full_resource() {
    let yaml = r#"
base_url: http://localhost/api/v1
resources:
  - type: videos
    table: video_rows
    id_column: uuid
    columns:
      createdAt: created_at
    default_sort: -createdAt
    default_pagination:
      number: 1
      size: "10"
"#;

    let catalog = load_catalog_from_str(yaml).unwrap();
    let videos = catalog.get("videos").unwrap();

    assert_eq!(videos.table, "video_rows");
    assert_eq!(videos.schema.id_column(), "uuid");
    assert_eq!(videos.schema.column_for("createdAt"), "created_at");
    assert_eq!(videos.schema.column_for("title"), "title");
    assert_eq!(
        videos.schema.default_sort().unwrap().to_string(),
        "-createdAt"
    );

    let defaults = videos.schema.default_pagination().unwrap();
    assert_eq!(defaults.get("number"), Some("1"));
    assert_eq!(defaults.get("size"), Some("10"));
}

#[test]
fn test_resource_url() {
    let yaml = r#"
base_url: http://localhost/api/v1/
resources:
  - type: posts
"#;

    let catalog = load_catalog_from_str(yaml).unwrap();
    assert_eq!(
        catalog.resource_url("posts").as_deref(),
        Some("http://localhost/api/v1/posts")
    );
}

// ============================================================================
// Pagination Settings Tests
// ============================================================================

#[test]
fn test_catalog_pagination_applies_to_all_resources() {
    let yaml = r#"
pagination:
  strategy: simple
  number_key: page
  size_key: limit
resources:
  - type: posts
  - type: comments
"#;

    let catalog = load_catalog_from_str(yaml).unwrap();
    for resource in catalog.iter() {
        let config = resource.schema.pagination();
        assert_eq!(config.strategy(), PaginationStrategy::Simple);
        assert_eq!(config.param_name(config.page_key()), "page[page]");
        assert_eq!(config.param_name(config.per_page_key()), "page[limit]");
    }
}

#[test]
fn test_resource_pagination_overrides_catalog() {
    let yaml = r#"
pagination:
  strategy: simple
resources:
  - type: posts
  - type: tags
    pagination:
      flat: true
      meta_key: paginator
      meta_case: snake
      default_per_page: 5
      max_per_page: 50
"#;

    let catalog = load_catalog_from_str(yaml).unwrap();

    let posts = catalog.get("posts").unwrap().schema.pagination();
    assert_eq!(posts.strategy(), PaginationStrategy::Simple);

    let tags = catalog.get("tags").unwrap().schema.pagination();
    assert_eq!(tags.strategy(), PaginationStrategy::LengthAware);
    assert_eq!(tags.param_style(), &PageParamStyle::Flat);
    assert_eq!(tags.param_name("number"), "number");
    assert_eq!(tags.meta_key(), "paginator");
    assert_eq!(tags.meta_case(), MetaCase::Snake);
    assert_eq!(tags.default_per_page(), 5);
    assert_eq!(tags.max_per_page(), 50);
}

#[test]
fn test_unnested_meta() {
    let yaml = r#"
resources:
  - type: posts
    pagination:
      nested_meta: false
      meta_case: dash
"#;

    let catalog = load_catalog_from_str(yaml).unwrap();
    let config = catalog.get("posts").unwrap().schema.pagination();
    assert!(!config.nested_meta());
    assert_eq!(config.meta_case(), MetaCase::Dash);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_empty_resources_rejected() {
    let result = load_catalog_from_str("resources: []");
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn test_duplicate_resource_types_rejected() {
    let yaml = r#"
resources:
  - type: posts
  - type: posts
    table: other_posts
"#;

    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("Duplicate resource types"));
}

#[test]
fn test_empty_id_column_rejected() {
    let yaml = r#"
resources:
  - type: posts
    id_column: ""
"#;

    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("id_column"));
}

#[test]
fn test_invalid_base_url_rejected() {
    let yaml = r#"
base_url: "not a url"
resources:
  - type: posts
"#;

    let result = load_catalog_from_str(yaml);
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_invalid_default_sort_rejected() {
    let yaml = r#"
resources:
  - type: posts
    default_sort: "title,,id"
"#;

    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("invalid default sort"));
}

#[test]
fn test_invalid_pagination_rejected() {
    let yaml = r#"
resources:
  - type: posts
    pagination:
      default_per_page: 300
      max_per_page: 100
"#;

    let err = load_catalog_from_str(yaml).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("posts"));
}

#[test]
fn test_unknown_strategy_rejected() {
    let yaml = r#"
pagination:
  strategy: cursor
resources:
  - type: posts
"#;

    assert!(load_catalog_from_str(yaml).is_err());
}

#[test]
fn test_unknown_resource_lookup() {
    let catalog = load_catalog_from_str("resources: [{type: posts}]").unwrap();
    let result = catalog.get("comments");
    assert!(matches!(result, Err(Error::ResourceNotFound { .. })));
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_catalog_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "resources:\n  - type: posts\n    table: blog_posts").unwrap();

    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.get("posts").unwrap().table, "blog_posts");
}

#[test]
fn test_load_missing_file() {
    let err = load_catalog("/nonexistent/catalog.yaml").unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_parse_catalog_keeps_definition() {
    let def = parse_catalog("resources: [{type: posts, id_column: uuid}]").unwrap();
    assert_eq!(def.resources[0].resource_type, "posts");
    assert_eq!(def.resources[0].id_column, "uuid");
    assert!(def.resources[0].pagination.is_none());
}
