// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # JSON:API Pager
//!
//! Page-based pagination for JSON:API collection endpoints: parse
//! `page[number]`/`page[size]`, fetch one page in a deterministic order,
//! and render `meta` and `links` for it.
//!
//! ## Features
//!
//! - **Length-aware and simple pagination**: count-backed pages with
//!   `total`/`lastPage`, or a one-row probe for `next`
//! - **Deterministic ordering**: the resource id always breaks sort ties
//! - **Configurable wire format**: custom page keys, flat parameters,
//!   meta key and casing
//! - **Query builders**: `QueryAll` for collections, `QueryOne` for a
//!   single resource with include loading
//! - **DuckDB collaborator**: page over tables of an embedded database
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jsonapi_pager::{CollectionDocument, DatabaseEngine, QueryAll, QueryParameters};
//!
//! let catalog = jsonapi_pager::load_catalog("catalog.yaml")?;
//! let posts = catalog.get("posts")?;
//! let config = posts.schema.pagination();
//!
//! let params = QueryParameters::parse("page[number]=2&page[size]=3", config)?;
//! let engine = DatabaseEngine::open("blog.duckdb")?;
//! let result = QueryAll::new(&posts.schema, engine.query(&posts.table)?)
//!     .using(&params)
//!     .first_or_paginate(params.page())?;
//!
//! let doc = CollectionDocument::from_pagination(result, "http://localhost/api/v1/posts", config)?;
//! println!("{}", doc.to_value()?);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Query Builders                           │
//! │  QueryAll: filter → sort + id tie-break → first_or_paginate     │
//! │  QueryOne: resolved record or id lookup → include loading       │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───────────┬──────────────────────┐
//! │  Pagination  │   Query collaborators     │   Document           │
//! ├──────────────┼───────────────────────────┼──────────────────────┤
//! │ PageRequest  │ MemoryQuery               │ meta (cased, nested) │
//! │ LengthAware  │ DuckDbQuery               │ links first/last/    │
//! │ Simple       │                           │   prev/next          │
//! └──────────────┴───────────────────────────┴──────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Page requests, pages and pagination strategies
pub mod pagination;

/// Pagination links
pub mod links;

/// Pagination meta
pub mod meta;

/// Query builders and collaborators
pub mod query;

/// Top-level response documents
pub mod document;

/// YAML loader for resource catalogs
pub mod loader;

/// Command-line interface
pub mod cli;

/// Database query support via DuckDB
pub mod database;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use database::DatabaseEngine;
pub use document::{CollectionDocument, ResourceDocument};
pub use loader::{load_catalog, load_catalog_from_str, ResourceCatalog};
pub use pagination::{Page, PageRequest, Pagination, PaginationConfig, PaginationStrategy};
pub use query::{QueryAll, QueryOne, QueryParameters, ResourceSchema};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
