//! Loader types
//!
//! Declarative resource catalog types for YAML parsing, and the runtime
//! catalog built from them.

use crate::error::{Error, Result};
use crate::pagination::{
    MetaCase, PageParams, PaginationConfig, PaginationStrategy, DEFAULT_MAX_PER_PAGE,
    DEFAULT_PER_PAGE,
};
use crate::query::{ResourceSchema, SortSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Catalog Definition
// ============================================================================

/// Top-level catalog definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogDefinition {
    /// Base URL that resource paths are appended to when building links
    #[serde(default)]
    pub base_url: Option<String>,
    /// Pagination settings shared by resources that do not override them
    #[serde(default)]
    pub pagination: PaginationDefinition,
    /// Resource definitions
    pub resources: Vec<ResourceDefinition>,
}

/// One resource type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceDefinition {
    /// JSON:API resource type, e.g. `posts`
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Backing table (defaults to the resource type)
    #[serde(default)]
    pub table: Option<String>,
    /// Unique column used as sort tie-break
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// Field name to column name mapping
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
    /// Sort used when a request has none, in wire format
    #[serde(default)]
    pub default_sort: Option<String>,
    /// Page parameters used when a request has none
    #[serde(default)]
    pub default_pagination: Option<BTreeMap<String, ParamValue>>,
    /// Overrides the catalog pagination settings
    #[serde(default)]
    pub pagination: Option<PaginationDefinition>,
}

impl ResourceDefinition {
    /// Backing table name
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.resource_type)
    }

    /// Build the runtime schema, using `shared` unless overridden
    pub fn to_schema(&self, shared: &PaginationDefinition) -> Result<ResourceSchema> {
        let pagination = self
            .pagination
            .as_ref()
            .unwrap_or(shared)
            .to_config()
            .map_err(|e| {
                Error::config(format!("Resource '{}': {e}", self.resource_type))
            })?;

        let mut schema = ResourceSchema::new(&self.resource_type, &self.id_column)
            .with_pagination(pagination);

        for (field, column) in &self.columns {
            schema = schema.with_column(field, column);
        }
        if let Some(sort) = &self.default_sort {
            let sort = SortSpec::parse(sort).map_err(|e| {
                Error::config(format!(
                    "Resource '{}' has an invalid default sort: {e}",
                    self.resource_type
                ))
            })?;
            schema = schema.with_default_sort(sort);
        }
        if let Some(params) = &self.default_pagination {
            schema = schema.with_default_pagination(
                params
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_string()))
                    .collect::<PageParams>(),
            );
        }

        Ok(schema)
    }
}

/// A YAML scalar given as a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(u64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn default_id_column() -> String {
    "id".to_string()
}

// ============================================================================
// Pagination Definition
// ============================================================================

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginationDefinition {
    #[serde(default)]
    pub strategy: PaginationStrategy,
    /// Outer query parameter, e.g. `page` in `page[number]`
    #[serde(default = "default_page_param")]
    pub page_param: String,
    /// Use top-level `number=..&size=..` parameters instead
    #[serde(default)]
    pub flat: bool,
    #[serde(default = "default_number_key")]
    pub number_key: String,
    #[serde(default = "default_size_key")]
    pub size_key: String,
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,
    #[serde(default = "default_meta_key")]
    pub meta_key: String,
    #[serde(default = "default_true")]
    pub nested_meta: bool,
    #[serde(default)]
    pub meta_case: MetaCase,
}

impl Default for PaginationDefinition {
    fn default() -> Self {
        Self {
            strategy: PaginationStrategy::default(),
            page_param: default_page_param(),
            flat: false,
            number_key: default_number_key(),
            size_key: default_size_key(),
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            meta_key: default_meta_key(),
            nested_meta: true,
            meta_case: MetaCase::default(),
        }
    }
}

impl PaginationDefinition {
    /// Build and validate the runtime configuration
    pub fn to_config(&self) -> Result<PaginationConfig> {
        let builder = PaginationConfig::builder()
            .strategy(self.strategy)
            .with_page_key(&self.number_key)
            .with_per_page_key(&self.size_key)
            .with_default_per_page(self.default_per_page)
            .with_max_per_page(self.max_per_page)
            .with_meta_key(&self.meta_key)
            .with_meta_case(self.meta_case);

        let builder = if self.flat {
            builder.with_flat_page_params()
        } else {
            builder.with_page_param(&self.page_param)
        };

        let builder = if self.nested_meta {
            builder.with_nested_meta()
        } else {
            builder.without_nested_meta()
        };

        builder.build()
    }
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_number_key() -> String {
    "number".to_string()
}

fn default_size_key() -> String {
    "size".to_string()
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_max_per_page() -> u32 {
    DEFAULT_MAX_PER_PAGE
}

fn default_meta_key() -> String {
    "page".to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Runtime Catalog
// ============================================================================

/// A configured resource and its backing table
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub schema: ResourceSchema,
    pub table: String,
}

/// Resources available to the pager, by type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCatalog {
    base_url: Option<String>,
    resources: Vec<Resource>,
}

impl ResourceCatalog {
    /// Build the runtime catalog from a parsed definition
    pub fn from_definition(def: &CatalogDefinition) -> Result<Self> {
        let resources = def
            .resources
            .iter()
            .map(|r| {
                Ok(Resource {
                    schema: r.to_schema(&def.pagination)?,
                    table: r.table_name().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base_url: def.base_url.clone(),
            resources,
        })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Look up a resource by type
    pub fn get(&self, resource_type: &str) -> Result<&Resource> {
        self.resources
            .iter()
            .find(|r| r.schema.resource_type() == resource_type)
            .ok_or_else(|| Error::resource_not_found(resource_type))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Link base for a resource: the catalog base URL joined with the type
    pub fn resource_url(&self, resource_type: &str) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}/{resource_type}", base.trim_end_matches('/')))
    }
}
