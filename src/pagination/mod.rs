//! Pagination module
//!
//! Supports: length-aware (counted) and simple (probe row) page-number
//! pagination.
//!
//! # Overview
//!
//! A [`PageRequest`] is resolved from raw [`PageParams`] against an
//! immutable [`PaginationConfig`]. The configured [`PaginationStrategy`]
//! then runs a prepared query and returns a [`Page`] carrying the items and
//! their position in the full result set.

mod strategies;
mod types;

pub use strategies::{paginate, LengthAwarePaginator, Paginator, SimplePaginator};
pub use types::{
    MetaCase, Page, PageParamStyle, PageParams, PageRequest, Pagination, PaginationConfig,
    PaginationConfigBuilder, PaginationStrategy, DEFAULT_MAX_PER_PAGE, DEFAULT_PER_PAGE,
};
