//! Links module
//!
//! Builds `first`, `last`, `prev` and `next` links for a page from the
//! request's base URL.

mod builder;
mod types;

pub use builder::{build_links, LinkBuilder};
pub use types::{Link, PageLinks};
