//! Incoming query parameters
//!
//! Splits a request query string into page parameters, sort, filters and
//! include paths. Filter parsing is shallow: `filter[f]=v`
//! becomes an equality and `filter[f]=a,b` a membership test.

use super::filter::{Filter, FilterSet};
use super::sort::SortSpec;
use crate::error::Result;
use crate::pagination::{PageParamStyle, PageParams, PaginationConfig};

/// Relationship paths to eager-load, e.g. `author,comments.user`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IncludePaths {
    paths: Vec<String>,
}

impl IncludePaths {
    pub fn new<S: Into<String>>(paths: impl IntoIterator<Item = S>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the comma separated wire format, skipping blank entries
    pub fn parse(raw: &str) -> Self {
        Self {
            paths: raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

/// Everything the pager reads from a request query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParameters {
    page: Option<PageParams>,
    sort: Option<SortSpec>,
    filters: Option<FilterSet>,
    include: Option<IncludePaths>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`)
    pub fn parse(query: &str, config: &PaginationConfig) -> Result<Self> {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if let Some(sub) = page_sub_key(&key, config) {
                params
                    .page
                    .get_or_insert_with(PageParams::new)
                    .insert(sub, value.into_owned());
            } else if key == "sort" {
                params.sort = Some(SortSpec::parse(&value)?);
            } else if key == "include" {
                params.include = Some(IncludePaths::parse(&value));
            } else if let Some(field) = bracketed(&key, "filter") {
                let filter = if value.contains(',') {
                    Filter::any_of(field, value.split(',').map(|v| v.trim().to_string()))
                } else {
                    Filter::eq(field, value.into_owned())
                };
                params.filters.get_or_insert_with(FilterSet::new).push(filter);
            }
        }

        Ok(params)
    }

    pub fn with_page(mut self, page: PageParams) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_include(mut self, include: IncludePaths) -> Self {
        self.include = Some(include);
        self
    }

    pub fn page(&self) -> Option<&PageParams> {
        self.page.as_ref()
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn filters(&self) -> Option<&FilterSet> {
        self.filters.as_ref()
    }

    pub fn include(&self) -> Option<&IncludePaths> {
        self.include.as_ref()
    }
}

fn page_sub_key<'a>(key: &'a str, config: &PaginationConfig) -> Option<&'a str> {
    match config.param_style() {
        PageParamStyle::Nested(outer) => bracketed(key, outer),
        PageParamStyle::Flat => {
            (key == config.page_key() || key == config.per_page_key()).then_some(key)
        }
    }
}

/// `outer[inner]` → `inner`
fn bracketed<'a>(key: &'a str, outer: &str) -> Option<&'a str> {
    key.strip_prefix(outer)?
        .strip_prefix('[')?
        .strip_suffix(']')
        .filter(|inner| !inner.is_empty())
}
