//! Link construction
//!
//! Builds page links from a base URL, keeping its non-page query
//! parameters and replacing any page parameters it already carries.

use super::types::{Link, PageLinks};
use crate::error::Result;
use crate::pagination::{Page, PageParamStyle, PaginationConfig};
use url::Url;

/// Builds links to other pages of the same listing
#[derive(Debug, Clone)]
pub struct LinkBuilder<'c> {
    base: Url,
    retained: Vec<(String, String)>,
    config: &'c PaginationConfig,
}

impl<'c> LinkBuilder<'c> {
    /// Parse `base_url` and remember its non-page query parameters
    pub fn new(base_url: &str, config: &'c PaginationConfig) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        let retained = base
            .query_pairs()
            .filter(|(key, _)| !is_page_param(key, config))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        base.set_query(None);
        base.set_fragment(None);

        Ok(Self {
            base,
            retained,
            config,
        })
    }

    /// Link to page `number` with `size` records per page
    pub fn link(&self, number: u64, size: u32) -> Link {
        let mut url = self.base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.retained {
                pairs.append_pair(key, value);
            }
            pairs.append_pair(
                &self.config.param_name(self.config.page_key()),
                &number.to_string(),
            );
            pairs.append_pair(
                &self.config.param_name(self.config.per_page_key()),
                &size.to_string(),
            );
        }
        Link::new(url.to_string())
    }

    /// Links for `page`: first always, last when known, prev/next when
    /// those pages exist
    pub fn build<T>(&self, page: &Page<T>) -> PageLinks {
        let size = page.per_page();
        let current = page.current_page();

        PageLinks {
            first: self.link(1, size),
            last: page.last_page().map(|last| self.link(last, size)),
            prev: (!page.on_first_page()).then(|| self.link(current - 1, size)),
            next: page.has_more_pages().then(|| self.link(current + 1, size)),
        }
    }
}

/// Build navigation links for `page` relative to `base_url`
pub fn build_links<T>(
    page: &Page<T>,
    base_url: &str,
    config: &PaginationConfig,
) -> Result<PageLinks> {
    Ok(LinkBuilder::new(base_url, config)?.build(page))
}

fn is_page_param(key: &str, config: &PaginationConfig) -> bool {
    match config.param_style() {
        PageParamStyle::Nested(outer) => key
            .strip_prefix(outer.as_str())
            .is_some_and(|rest| rest.starts_with('[')),
        PageParamStyle::Flat => key == config.page_key() || key == config.per_page_key(),
    }
}
