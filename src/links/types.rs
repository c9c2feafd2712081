//! Link types

use serde::Serialize;

/// A single link object, `{"href": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    pub fn href(&self) -> &str {
        &self.href
    }
}

/// Navigation links for one page
///
/// Absent links are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub first: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

impl PageLinks {
    /// Names of the links present, in serialization order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = vec!["first"];
        if self.last.is_some() {
            names.push("last");
        }
        if self.prev.is_some() {
            names.push("prev");
        }
        if self.next.is_some() {
            names.push("next");
        }
        names
    }
}
