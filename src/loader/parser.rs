//! YAML parser for resource catalogs
//!
//! Parses and validates catalog files before building the runtime catalog.

use crate::error::{Error, Result};
use crate::loader::types::{CatalogDefinition, ResourceCatalog, ResourceDefinition};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a resource catalog from a YAML file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<ResourceCatalog> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config(format!("Catalog file '{}' not found", path.display()))
        } else {
            Error::config(format!(
                "Failed to read catalog file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;

    debug!("Loaded catalog from {}", path.display());
    load_catalog_from_str(&content)
}

/// Load a resource catalog from a YAML string
pub fn load_catalog_from_str(yaml: &str) -> Result<ResourceCatalog> {
    let def = parse_catalog(yaml)?;
    ResourceCatalog::from_definition(&def)
}

/// Parse and validate a catalog definition without building it
pub fn parse_catalog(yaml: &str) -> Result<CatalogDefinition> {
    let def: CatalogDefinition = serde_yaml::from_str(yaml)?;

    validate_catalog(&def)?;
    Ok(def)
}

/// Validate a catalog definition
fn validate_catalog(def: &CatalogDefinition) -> Result<()> {
    if def.resources.is_empty() {
        return Err(Error::config("Catalog must define at least one resource"));
    }

    let types: HashSet<_> = def.resources.iter().map(|r| &r.resource_type).collect();
    if types.len() != def.resources.len() {
        return Err(Error::config("Duplicate resource types found"));
    }

    if let Some(base_url) = &def.base_url {
        url::Url::parse(base_url)?;
    }

    for resource in &def.resources {
        validate_resource(resource)?;
    }

    Ok(())
}

/// Validate a single resource definition
fn validate_resource(resource: &ResourceDefinition) -> Result<()> {
    if resource.resource_type.is_empty() {
        return Err(Error::config("Resource type cannot be empty"));
    }

    if resource.id_column.is_empty() {
        return Err(Error::config(format!(
            "Resource '{}' must have a non-empty id_column",
            resource.resource_type
        )));
    }

    if resource.table_name().is_empty() {
        return Err(Error::config(format!(
            "Resource '{}' must have a non-empty table",
            resource.resource_type
        )));
    }

    Ok(())
}
