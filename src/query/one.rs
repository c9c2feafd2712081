//! Single resource query builder

use super::filter::{Filter, FilterSet};
use super::params::{IncludePaths, QueryParameters};
use super::schema::ResourceSchema;
use super::types::{IncludeLoader, Query};
use crate::error::Result;
use tracing::debug;

/// Builder for a query returning at most one resource
///
/// When the record was already resolved (for example by route binding)
/// and no filters apply, the query is skipped and only missing
/// relationships are loaded onto the resolved record.
pub struct QueryOne<'s, Q: Query> {
    schema: &'s ResourceSchema,
    query: Q,
    resolved: Option<Q::Record>,
    resource_id: String,
    filters: Option<FilterSet>,
    include: Option<IncludePaths>,
}

impl<'s, Q: Query> QueryOne<'s, Q> {
    pub fn new(
        schema: &'s ResourceSchema,
        query: Q,
        resolved: Option<Q::Record>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            schema,
            query,
            resolved,
            resource_id: resource_id.into(),
            filters: None,
            include: None,
        }
    }

    /// Take filters and include paths from parsed request parameters
    pub fn using(self, params: &QueryParameters) -> Self {
        self.filter(params.filters().cloned())
            .with(params.include().cloned())
    }

    pub fn filter(mut self, filters: Option<FilterSet>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with(mut self, include: Option<IncludePaths>) -> Self {
        self.include = include;
        self
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Resolve the resource, loading requested relationships onto it
    pub fn first<L: IncludeLoader<Q::Record>>(self, loader: &L) -> Result<Option<Q::Record>> {
        let Self {
            schema,
            mut query,
            resolved,
            resource_id,
            filters,
            include,
        } = self;
        let filters = filters.filter(|f| !f.is_empty());

        if let (Some(mut record), None) = (resolved, filters.as_ref()) {
            debug!(
                resource = schema.resource_type(),
                id = %resource_id,
                "Using resolved record"
            );
            load_includes(loader, &mut record, include.as_ref())?;
            return Ok(Some(record));
        }

        let mut predicates =
            FilterSet::new().with(Filter::eq(schema.id_column(), resource_id.as_str()));
        if let Some(filters) = filters {
            predicates.extend(filters.map_fields(|f| schema.column_for(f).to_string()));
        }
        query.apply_filter(&predicates)?;

        let mut record = query.fetch(0, Some(1))?.into_iter().next();
        if let Some(record) = record.as_mut() {
            load_includes(loader, record, include.as_ref())?;
        }

        Ok(record)
    }
}

fn load_includes<R, L: IncludeLoader<R>>(
    loader: &L,
    record: &mut R,
    include: Option<&IncludePaths>,
) -> Result<()> {
    match include {
        Some(paths) if !paths.is_empty() => loader.load_related(record, paths),
        _ => Ok(()),
    }
}
