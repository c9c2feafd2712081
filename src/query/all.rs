//! Collection query builder
//!
//! Sequences clauses on a query collaborator: filter, then sort with the
//! identifier tie-break, then count/fetch through the configured paginator.

use super::filter::FilterSet;
use super::params::QueryParameters;
use super::schema::ResourceSchema;
use super::sort::SortSpec;
use super::types::Query;
use crate::error::Result;
use crate::pagination::{self, Page, PageParams, Pagination};
use tracing::debug;

/// Builder for queries returning many resources of one type
#[derive(Debug)]
pub struct QueryAll<'s, Q> {
    schema: &'s ResourceSchema,
    query: Q,
    filters: Option<FilterSet>,
    sort: Option<SortSpec>,
}

impl<'s, Q: Query> QueryAll<'s, Q> {
    pub fn new(schema: &'s ResourceSchema, query: Q) -> Self {
        Self {
            schema,
            query,
            filters: None,
            sort: None,
        }
    }

    /// Take filters and sort from parsed request parameters
    pub fn using(self, params: &QueryParameters) -> Self {
        self.filter(params.filters().cloned())
            .sort(params.sort().cloned())
    }

    pub fn filter(mut self, filters: Option<FilterSet>) -> Self {
        self.filters = filters;
        self
    }

    pub fn sort(mut self, sort: Option<SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// Every matching record, in deterministic order
    pub fn get(self) -> Result<Vec<Q::Record>> {
        let query = self.prepare()?;
        query.fetch(0, None)
    }

    /// One page of matching records
    pub fn paginate(self, params: &PageParams) -> Result<Page<Q::Record>> {
        let schema = self.schema;
        let query = self.prepare()?;
        pagination::paginate(&query, params, schema.pagination())
    }

    /// Paginate when the request or the schema asks for it, otherwise
    /// return the whole result set
    pub fn first_or_paginate(self, params: Option<&PageParams>) -> Result<Pagination<Q::Record>> {
        let schema = self.schema;
        match params.or_else(|| schema.default_pagination()) {
            Some(params) => self.paginate(params).map(Pagination::Page),
            None => {
                debug!(
                    resource = schema.resource_type(),
                    "No page requested and no default pagination, fetching all"
                );
                self.get().map(Pagination::Unbounded)
            }
        }
    }

    fn prepare(self) -> Result<Q> {
        let Self {
            schema,
            mut query,
            filters,
            sort,
        } = self;

        if let Some(filters) = filters.filter(|f| !f.is_empty()) {
            let filters = filters.map_fields(|f| schema.column_for(f).to_string());
            query.apply_filter(&filters)?;
        }

        let sort = sort
            .or_else(|| schema.default_sort().cloned())
            .unwrap_or_default()
            .map_fields(|f| schema.column_for(f).to_string())
            .with_tie_break(schema.id_column());

        debug!(
            resource = schema.resource_type(),
            sort = %sort,
            "Applying sort"
        );
        query.apply_sort(&sort)?;

        Ok(query)
    }
}
