//! Query module
//!
//! Bridges an opaque query collaborator to the paginator.
//!
//! # Overview
//!
//! - [`Query`] - Capability the data-store layer provides
//! - [`SortSpec`] - Sort parsing and the identifier tie-break
//! - [`QueryAll`] - Collection queries, paginated or unbounded
//! - [`QueryOne`] - Single resource queries with eager loading
//! - [`MemoryQuery`] - In-memory collaborator over JSON records

mod all;
mod filter;
mod memory;
mod one;
mod params;
mod schema;
mod sort;
mod types;

pub use all::QueryAll;
pub use filter::{Filter, FilterSet};
pub use memory::MemoryQuery;
pub use one::QueryOne;
pub use params::{IncludePaths, QueryParameters};
pub use schema::ResourceSchema;
pub use sort::{SortField, SortSpec};
pub use types::{IncludeLoader, NoIncludes, Query};
