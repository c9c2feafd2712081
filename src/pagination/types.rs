//! Pagination types
//!
//! Defines the page request, the resolved page, and the immutable
//! pagination configuration shared by all strategies.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default number of records per page
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Default upper bound for the requested page size
pub const DEFAULT_MAX_PER_PAGE: u32 = 250;

// ============================================================================
// Strategy and formatting options
// ============================================================================

/// Pagination mode, selected once per resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationStrategy {
    /// Count the matching rows and report total and last page
    #[default]
    LengthAware,
    /// Probe one extra row instead of counting
    Simple,
}

impl PaginationStrategy {
    /// Whether total and last page are known for pages of this strategy
    pub fn is_length_aware(&self) -> bool {
        matches!(self, Self::LengthAware)
    }
}

/// Key casing applied to page meta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaCase {
    /// `currentPage`
    #[default]
    Camel,
    /// `current_page`
    Snake,
    /// `current-page`
    Dash,
}

/// How page parameters appear in a query string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageParamStyle {
    /// `page[number]=1&page[size]=3`, nested under the given key
    Nested(String),
    /// `number=1&size=3`, at the top level of the query string
    Flat,
}

impl Default for PageParamStyle {
    fn default() -> Self {
        Self::Nested("page".to_string())
    }
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Immutable pagination settings for one resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    strategy: PaginationStrategy,
    param_style: PageParamStyle,
    page_key: String,
    per_page_key: String,
    meta_key: String,
    nested_meta: bool,
    meta_case: MetaCase,
    default_per_page: u32,
    max_per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            strategy: PaginationStrategy::LengthAware,
            param_style: PageParamStyle::default(),
            page_key: "number".to_string(),
            per_page_key: "size".to_string(),
            meta_key: "page".to_string(),
            nested_meta: true,
            meta_case: MetaCase::Camel,
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: DEFAULT_MAX_PER_PAGE,
        }
    }
}

impl PaginationConfig {
    /// Start building a configuration from the defaults
    pub fn builder() -> PaginationConfigBuilder {
        PaginationConfigBuilder::default()
    }

    pub fn strategy(&self) -> PaginationStrategy {
        self.strategy
    }

    pub fn param_style(&self) -> &PageParamStyle {
        &self.param_style
    }

    /// Sub-key carrying the page number
    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    /// Sub-key carrying the page size
    pub fn per_page_key(&self) -> &str {
        &self.per_page_key
    }

    pub fn meta_key(&self) -> &str {
        &self.meta_key
    }

    pub fn nested_meta(&self) -> bool {
        self.nested_meta
    }

    pub fn meta_case(&self) -> MetaCase {
        self.meta_case
    }

    pub fn default_per_page(&self) -> u32 {
        self.default_per_page
    }

    pub fn max_per_page(&self) -> u32 {
        self.max_per_page
    }

    /// Full query-string name for a page sub-key, e.g. `page[number]`
    pub fn param_name(&self, key: &str) -> String {
        match &self.param_style {
            PageParamStyle::Nested(outer) => format!("{outer}[{key}]"),
            PageParamStyle::Flat => key.to_string(),
        }
    }
}

/// Builder for [`PaginationConfig`]
#[derive(Debug, Clone, Default)]
pub struct PaginationConfigBuilder {
    config: PaginationConfig,
}

impl PaginationConfigBuilder {
    pub fn strategy(mut self, strategy: PaginationStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn length_aware(self) -> Self {
        self.strategy(PaginationStrategy::LengthAware)
    }

    pub fn simple(self) -> Self {
        self.strategy(PaginationStrategy::Simple)
    }

    /// Rename the sub-key carrying the page number
    pub fn with_page_key(mut self, key: impl Into<String>) -> Self {
        self.config.page_key = key.into();
        self
    }

    /// Rename the sub-key carrying the page size
    pub fn with_per_page_key(mut self, key: impl Into<String>) -> Self {
        self.config.per_page_key = key.into();
        self
    }

    /// Nest page parameters under `key` in the query string
    pub fn with_page_param(mut self, key: impl Into<String>) -> Self {
        self.config.param_style = PageParamStyle::Nested(key.into());
        self
    }

    /// Put page parameters at the top level of the query string
    pub fn with_flat_page_params(mut self) -> Self {
        self.config.param_style = PageParamStyle::Flat;
        self
    }

    pub fn with_meta_key(mut self, key: impl Into<String>) -> Self {
        self.config.meta_key = key.into();
        self
    }

    pub fn with_nested_meta(mut self) -> Self {
        self.config.nested_meta = true;
        self
    }

    pub fn without_nested_meta(mut self) -> Self {
        self.config.nested_meta = false;
        self
    }

    pub fn with_meta_case(mut self, case: MetaCase) -> Self {
        self.config.meta_case = case;
        self
    }

    pub fn camel_case_meta(self) -> Self {
        self.with_meta_case(MetaCase::Camel)
    }

    pub fn snake_case_meta(self) -> Self {
        self.with_meta_case(MetaCase::Snake)
    }

    pub fn dash_case_meta(self) -> Self {
        self.with_meta_case(MetaCase::Dash)
    }

    pub fn with_default_per_page(mut self, size: u32) -> Self {
        self.config.default_per_page = size;
        self
    }

    pub fn with_max_per_page(mut self, size: u32) -> Self {
        self.config.max_per_page = size;
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<PaginationConfig> {
        let config = self.config;

        if config.page_key.is_empty() || config.per_page_key.is_empty() {
            return Err(Error::config("Page keys cannot be empty"));
        }
        if config.page_key == config.per_page_key {
            return Err(Error::config(format!(
                "Page number and page size keys must differ, both are '{}'",
                config.page_key
            )));
        }
        if let PageParamStyle::Nested(outer) = &config.param_style {
            if outer.is_empty() {
                return Err(Error::config("Page parameter key cannot be empty"));
            }
        }
        if config.nested_meta && config.meta_key.is_empty() {
            return Err(Error::config("Meta key cannot be empty when meta is nested"));
        }
        if config.default_per_page == 0 {
            return Err(Error::config("Default page size must be at least 1"));
        }
        if config.default_per_page > config.max_per_page {
            return Err(Error::config(format!(
                "Default page size {} exceeds the maximum of {}",
                config.default_per_page, config.max_per_page
            )));
        }

        Ok(config)
    }
}

// ============================================================================
// Page Params
// ============================================================================

/// Raw page parameters as received, keyed by sub-key (e.g. `number`, `size`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    values: HashMap<String, String>,
}

impl PageParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing an existing one with the same key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PageParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Page Request
// ============================================================================

/// A validated page number and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    number: u64,
    size: u32,
}

impl PageRequest {
    /// Create a request, checking it against the configured bounds
    pub fn new(number: u64, size: u32, config: &PaginationConfig) -> Result<Self> {
        if number == 0 {
            return Err(Error::invalid_page(format!(
                "{} must be at least 1",
                config.param_name(config.page_key())
            )));
        }
        if size == 0 {
            return Err(Error::invalid_page(format!(
                "{} must be at least 1",
                config.param_name(config.per_page_key())
            )));
        }
        if size > config.max_per_page() {
            return Err(Error::invalid_page(format!(
                "{} must not exceed {}, got {size}",
                config.param_name(config.per_page_key()),
                config.max_per_page()
            )));
        }

        Ok(Self { number, size })
    }

    /// Resolve raw parameters, applying the configured defaults
    pub fn from_params(params: &PageParams, config: &PaginationConfig) -> Result<Self> {
        let number = match params.get(config.page_key()) {
            Some(raw) => parse_positive(raw, &config.param_name(config.page_key()))?,
            None => 1,
        };
        let size = match params.get(config.per_page_key()) {
            Some(raw) => {
                let name = config.param_name(config.per_page_key());
                let size = parse_positive(raw, &name)?;
                u32::try_from(size).map_err(|_| {
                    Error::invalid_page(format!(
                        "{name} must not exceed {}, got {size}",
                        config.max_per_page()
                    ))
                })?
            }
            None => config.default_per_page(),
        };

        Self::new(number, size, config)
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Zero-based index of the first row of this page, saturating at
    /// `u64::MAX` for pages no collection can reach
    pub fn offset(&self) -> u64 {
        (self.number - 1).saturating_mul(u64::from(self.size))
    }
}

/// Parse a positive integer; values beyond `u64` saturate to `u64::MAX`
fn parse_positive(raw: &str, name: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let value = match digits.parse::<u64>() {
        Ok(value) => value,
        Err(_) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => u64::MAX,
        Err(_) if digits.parse::<i64>().is_ok() => 0,
        Err(_) => {
            return Err(Error::invalid_page(format!(
                "{name} must be an integer, got '{raw}'"
            )))
        }
    };

    if value < 1 {
        return Err(Error::invalid_page(format!(
            "{name} must be at least 1, got '{raw}'"
        )));
    }

    Ok(value)
}

// ============================================================================
// Page
// ============================================================================

/// One resolved page of records plus its positional metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    strategy: PaginationStrategy,
    current_page: u64,
    per_page: u32,
    from: u64,
    to: u64,
    total: Option<u64>,
    last_page: Option<u64>,
    has_more_pages: bool,
}

impl<T> Page<T> {
    /// Build a page for which the total row count is known
    pub fn length_aware(items: Vec<T>, request: &PageRequest, total: u64) -> Result<Self> {
        let offset = request.offset();
        let last_page = total.div_ceil(u64::from(request.size())).max(1);
        let (from, to) = bounds(offset, items.len());

        Ok(Self {
            items,
            strategy: PaginationStrategy::LengthAware,
            current_page: request.number(),
            per_page: request.size(),
            from,
            to,
            total: Some(total),
            last_page: Some(last_page),
            has_more_pages: request.number() < last_page,
        })
    }

    /// Build a page from a probe fetch of up to `size + 1` rows
    pub fn simple(mut items: Vec<T>, request: &PageRequest) -> Result<Self> {
        let offset = request.offset();
        let size = request.size() as usize;
        let has_more_pages = items.len() > size;
        items.truncate(size);
        let (from, to) = bounds(offset, items.len());

        Ok(Self {
            items,
            strategy: PaginationStrategy::Simple,
            current_page: request.number(),
            per_page: request.size(),
            from,
            to,
            total: None,
            last_page: None,
            has_more_pages,
        })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn strategy(&self) -> PaginationStrategy {
        self.strategy
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// 1-based index of the first item, 0 when empty
    pub fn from(&self) -> u64 {
        self.from
    }

    /// 1-based index of the last item, 0 when empty
    pub fn to(&self) -> u64 {
        self.to
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn last_page(&self) -> Option<u64> {
        self.last_page
    }

    pub fn has_more_pages(&self) -> bool {
        self.has_more_pages
    }

    pub fn on_first_page(&self) -> bool {
        self.current_page <= 1
    }

    /// Transform the items while keeping the positional metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            strategy: self.strategy,
            current_page: self.current_page,
            per_page: self.per_page,
            from: self.from,
            to: self.to,
            total: self.total,
            last_page: self.last_page,
            has_more_pages: self.has_more_pages,
        }
    }
}

fn bounds(offset: u64, len: usize) -> (u64, u64) {
    if len == 0 {
        (0, 0)
    } else {
        (offset.saturating_add(1), offset.saturating_add(len as u64))
    }
}

// ============================================================================
// Pagination result
// ============================================================================

/// Either a page or, when no pagination was requested or configured,
/// every matching record
#[derive(Debug, Clone, PartialEq)]
pub enum Pagination<T> {
    /// A bounded page with meta and links
    Page(Page<T>),
    /// The entire result set
    Unbounded(Vec<T>),
}

impl<T> Pagination<T> {
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }

    pub fn as_page(&self) -> Option<&Page<T>> {
        match self {
            Self::Page(page) => Some(page),
            Self::Unbounded(_) => None,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Page(page) => page.items(),
            Self::Unbounded(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Page(page) => page.into_items(),
            Self::Unbounded(items) => items,
        }
    }
}
