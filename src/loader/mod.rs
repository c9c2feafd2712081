//! YAML Loader module
//!
//! Parse resource catalogs from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `CatalogDefinition` - Declarative catalog specification
//! - `ResourceDefinition` - Per-resource table, id column and pagination
//! - `ResourceCatalog` - Validated runtime catalog

mod parser;
mod types;

pub use parser::{load_catalog, load_catalog_from_str, parse_catalog};
pub use types::{
    CatalogDefinition, PaginationDefinition, ParamValue, Resource, ResourceCatalog,
    ResourceDefinition,
};

#[cfg(test)]
mod tests;
