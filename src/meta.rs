//! Page meta formatting
//!
//! Renders the positional metadata of a page as a JSON object, with the
//! configured key casing and optional nesting under a meta key.

use crate::pagination::{MetaCase, Page, PaginationConfig};
use crate::types::{JsonObject, JsonValue};
use convert_case::{Case, Casing};

/// Build the meta object for `page`
///
/// Length-aware pages report `currentPage`, `from`, `lastPage`, `perPage`,
/// `to` and `total`. Simple pages omit `lastPage` and `total`.
pub fn build_meta<T>(page: &Page<T>, config: &PaginationConfig) -> JsonObject {
    let case = config.meta_case();
    let mut fields = JsonObject::new();

    let mut put = |key: &str, value: JsonValue| {
        fields.insert(cased(key, case), value);
    };

    put("currentPage", page.current_page().into());
    put("from", page.from().into());
    if let Some(last_page) = page.last_page() {
        put("lastPage", last_page.into());
    }
    put("perPage", page.per_page().into());
    put("to", page.to().into());
    if let Some(total) = page.total() {
        put("total", total.into());
    }

    if config.nested_meta() {
        let mut meta = JsonObject::new();
        meta.insert(config.meta_key().to_string(), JsonValue::Object(fields));
        meta
    } else {
        fields
    }
}

fn cased(key: &str, case: MetaCase) -> String {
    match case {
        MetaCase::Camel => key.to_string(),
        MetaCase::Snake => key.to_case(Case::Snake),
        MetaCase::Dash => key.to_case(Case::Kebab),
    }
}
