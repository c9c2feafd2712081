//! Pagination strategy implementations
//!
//! Each strategy turns a prepared query and a page request into a page.

use super::types::{Page, PageParams, PageRequest, PaginationConfig, PaginationStrategy};
use crate::error::Result;
use crate::query::Query;
use tracing::{debug, warn};

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Strategy implemented by this paginator
    fn strategy(&self) -> PaginationStrategy;

    /// Execute `query` for the requested page
    ///
    /// The query must already carry its filters and sort.
    fn paginate<Q: Query + ?Sized>(
        &self,
        query: &Q,
        request: &PageRequest,
    ) -> Result<Page<Q::Record>>;
}

// ============================================================================
// Length-Aware Pagination
// ============================================================================

/// Counts the matching rows, then fetches one page
///
/// Pages past the end are not an error: they come back empty with the
/// real total and last page so clients can recover.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthAwarePaginator;

impl Paginator for LengthAwarePaginator {
    fn strategy(&self) -> PaginationStrategy {
        PaginationStrategy::LengthAware
    }

    fn paginate<Q: Query + ?Sized>(
        &self,
        query: &Q,
        request: &PageRequest,
    ) -> Result<Page<Q::Record>> {
        let total = query.count()?;
        let offset = request.offset();
        let size = u64::from(request.size());

        let items = if offset < total {
            query.fetch(offset, Some(size))?
        } else {
            if total > 0 {
                warn!(
                    page = request.number(),
                    total, "Requested page is past the last page, returning empty page"
                );
            }
            Vec::new()
        };

        debug!(
            page = request.number(),
            size,
            total,
            returned = items.len(),
            "Length-aware page resolved"
        );

        Page::length_aware(items, request, total)
    }
}

// ============================================================================
// Simple Pagination
// ============================================================================

/// Fetches one row more than the page size to learn whether a next page
/// exists, without counting
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplePaginator;

impl Paginator for SimplePaginator {
    fn strategy(&self) -> PaginationStrategy {
        PaginationStrategy::Simple
    }

    fn paginate<Q: Query + ?Sized>(
        &self,
        query: &Q,
        request: &PageRequest,
    ) -> Result<Page<Q::Record>> {
        let offset = request.offset();
        let probe = u64::from(request.size()) + 1;
        let items = query.fetch(offset, Some(probe))?;

        debug!(
            page = request.number(),
            size = request.size(),
            fetched = items.len(),
            "Simple page resolved"
        );

        Page::simple(items, request)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

impl PaginationStrategy {
    /// Run the paginator for this strategy
    pub fn paginate<Q: Query + ?Sized>(
        &self,
        query: &Q,
        request: &PageRequest,
    ) -> Result<Page<Q::Record>> {
        match self {
            Self::LengthAware => LengthAwarePaginator.paginate(query, request),
            Self::Simple => SimplePaginator.paginate(query, request),
        }
    }
}

/// Resolve raw page parameters against `config` and paginate `query`
///
/// Fails with `InvalidPageRequest` when the parameters are malformed,
/// non-positive, or exceed the configured maximum size.
pub fn paginate<Q: Query + ?Sized>(
    query: &Q,
    params: &PageParams,
    config: &PaginationConfig,
) -> Result<Page<Q::Record>> {
    let request = PageRequest::from_params(params, config)?;
    config.strategy().paginate(query, &request)
}
