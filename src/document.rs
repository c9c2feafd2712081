//! Top-level response documents
//!
//! Wraps query results in the `{data, meta, links}` shape.

use crate::error::Result;
use crate::links::{build_links, PageLinks};
use crate::meta::build_meta;
use crate::pagination::{Page, Pagination, PaginationConfig};
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;

/// Document for a collection, paginated or not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionDocument<T> {
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<JsonObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PageLinks>,
}

impl<T> CollectionDocument<T> {
    /// Document for one page, with meta and links
    pub fn from_page(page: Page<T>, base_url: &str, config: &PaginationConfig) -> Result<Self> {
        let links = build_links(&page, base_url, config)?;
        let meta = build_meta(&page, config);

        Ok(Self {
            data: page.into_items(),
            meta: Some(meta),
            links: Some(links),
        })
    }

    /// Document for an unbounded result set, without meta or links
    pub fn unbounded(items: Vec<T>) -> Self {
        Self {
            data: items,
            meta: None,
            links: None,
        }
    }

    pub fn from_pagination(
        result: Pagination<T>,
        base_url: &str,
        config: &PaginationConfig,
    ) -> Result<Self> {
        match result {
            Pagination::Page(page) => Self::from_page(page, base_url, config),
            Pagination::Unbounded(items) => Ok(Self::unbounded(items)),
        }
    }
}

impl<T: Serialize> CollectionDocument<T> {
    pub fn to_value(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Document for a single resource; `data` is `null` when not found
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDocument<T> {
    pub data: Option<T>,
}

impl<T: Serialize> ResourceDocument<T> {
    pub fn new(data: Option<T>) -> Self {
        Self { data }
    }

    pub fn to_value(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}
