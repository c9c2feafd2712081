//! Query collaborator traits
//!
//! The pager never builds SQL itself. It drives an opaque query object
//! through these traits, always in the order filter, sort, then
//! count/fetch.

use super::filter::FilterSet;
use super::params::IncludePaths;
use super::sort::SortSpec;
use crate::error::Result;

/// A query over one resource type, supplied by the data-store layer
pub trait Query {
    /// Record type produced by `fetch`
    type Record;

    /// Narrow the query with a set of predicates
    fn apply_filter(&mut self, filters: &FilterSet) -> Result<()>;

    /// Order the query. Later fields break ties between earlier ones.
    fn apply_sort(&mut self, sort: &SortSpec) -> Result<()>;

    /// Number of rows matching the filters
    fn count(&self) -> Result<u64>;

    /// Fetch rows in sort order, skipping `offset` rows. `None` fetches
    /// every remaining row.
    fn fetch(&self, offset: u64, limit: Option<u64>) -> Result<Vec<Self::Record>>;
}

/// Eager loader for relationships of an already resolved record
pub trait IncludeLoader<R> {
    /// Load the relationships named by `paths` that are not loaded yet
    fn load_related(&self, record: &mut R, paths: &IncludePaths) -> Result<()>;
}

/// Loader that leaves records untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIncludes;

impl<R> IncludeLoader<R> for NoIncludes {
    fn load_related(&self, _record: &mut R, _paths: &IncludePaths) -> Result<()> {
        Ok(())
    }
}

impl<Q: Query + ?Sized> Query for &mut Q {
    type Record = Q::Record;

    fn apply_filter(&mut self, filters: &FilterSet) -> Result<()> {
        (**self).apply_filter(filters)
    }

    fn apply_sort(&mut self, sort: &SortSpec) -> Result<()> {
        (**self).apply_sort(sort)
    }

    fn count(&self) -> Result<u64> {
        (**self).count()
    }

    fn fetch(&self, offset: u64, limit: Option<u64>) -> Result<Vec<Self::Record>> {
        (**self).fetch(offset, limit)
    }
}
