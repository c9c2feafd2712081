//! Per-resource query settings

use super::sort::SortSpec;
use crate::pagination::{PageParams, PaginationConfig};
use std::collections::HashMap;

/// Query settings for one resource type
///
/// Built once and shared by every request for the resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSchema {
    resource_type: String,
    id_column: String,
    columns: HashMap<String, String>,
    default_sort: Option<SortSpec>,
    default_pagination: Option<PageParams>,
    pagination: PaginationConfig,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>, id_column: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id_column: id_column.into(),
            columns: HashMap::new(),
            default_sort: None,
            default_pagination: None,
            pagination: PaginationConfig::default(),
        }
    }

    /// Map a resource field name to a storage column
    pub fn with_column(mut self, field: impl Into<String>, column: impl Into<String>) -> Self {
        self.columns.insert(field.into(), column.into());
        self
    }

    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Page parameters used when a request sends none
    pub fn with_default_pagination(mut self, params: PageParams) -> Self {
        self.default_pagination = Some(params);
        self
    }

    pub fn with_pagination(mut self, config: PaginationConfig) -> Self {
        self.pagination = config;
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Unique column used as the final sort tie-break
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn default_sort(&self) -> Option<&SortSpec> {
        self.default_sort.as_ref()
    }

    pub fn default_pagination(&self) -> Option<&PageParams> {
        self.default_pagination.as_ref()
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Storage column for a field; unmapped fields are used verbatim
    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.columns.get(field).map_or(field, String::as_str)
    }
}
