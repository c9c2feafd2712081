//! Integration tests against an in-memory DuckDB database
//!
//! Tests the full flow: query string → QueryAll/QueryOne → DuckDB →
//! JSON:API document with meta and links

use jsonapi_pager::database::DatabaseEngine;
use jsonapi_pager::document::{CollectionDocument, ResourceDocument};
use jsonapi_pager::pagination::{PageParams, Pagination, PaginationConfig};
use jsonapi_pager::query::{NoIncludes, QueryAll, QueryOne, QueryParameters, ResourceSchema};
use jsonapi_pager::Error;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

const BASE: &str = "http://localhost/api/v1/posts";

fn engine_with_posts(count: usize) -> DatabaseEngine {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    engine
        .execute_batch("CREATE TABLE posts (id INTEGER, title VARCHAR, published BOOLEAN);")
        .unwrap();
    for id in 1..=count {
        engine
            .execute_batch(&format!(
                "INSERT INTO posts VALUES ({id}, 'Post {id}', {});",
                id % 2 == 1
            ))
            .unwrap();
    }
    engine
}

fn page(number: &str, size: &str) -> PageParams {
    PageParams::new().with("number", number).with("size", size)
}

fn href(number: u64, size: u32) -> String {
    format!("{BASE}?page%5Bnumber%5D={number}&page%5Bsize%5D={size}")
}

fn ids(records: &[Value]) -> Vec<i64> {
    records.iter().filter_map(|r| r["id"].as_i64()).collect()
}

/// Paginate posts and render the document
fn posts_document(
    engine: &DatabaseEngine,
    schema: &ResourceSchema,
    params: &PageParams,
) -> Value {
    let page = QueryAll::new(schema, engine.query("posts").unwrap())
        .paginate(params)
        .unwrap();
    CollectionDocument::from_page(page, BASE, schema.pagination())
        .unwrap()
        .to_value()
        .unwrap()
}

fn posts_schema(config: PaginationConfig) -> ResourceSchema {
    ResourceSchema::new("posts", "id").with_pagination(config)
}

// ============================================================================
// Default Pagination Tests
// ============================================================================

#[test]
fn test_default_pagination() {
    let engine = engine_with_posts(4);
    let schema = ResourceSchema::new("posts", "id")
        .with_default_pagination(PageParams::new().with("number", "1"));

    let result = QueryAll::new(&schema, engine.query("posts").unwrap())
        .first_or_paginate(None)
        .unwrap();
    assert!(result.is_page());

    let doc = CollectionDocument::from_pagination(result, BASE, schema.pagination())
        .unwrap()
        .to_value()
        .unwrap();

    assert_eq!(
        doc["meta"],
        json!({
            "page": {
                "currentPage": 1,
                "from": 1,
                "lastPage": 1,
                "perPage": 15,
                "to": 4,
                "total": 4
            }
        })
    );
    assert_eq!(
        doc["links"],
        json!({
            "first": { "href": href(1, 15) },
            "last": { "href": href(1, 15) }
        })
    );
    assert_eq!(ids(doc["data"].as_array().unwrap()), vec![1, 2, 3, 4]);
}

#[test]
fn test_no_default_pagination() {
    let engine = engine_with_posts(4);
    let schema = ResourceSchema::new("posts", "id");

    let result = QueryAll::new(&schema, engine.query("posts").unwrap())
        .first_or_paginate(None)
        .unwrap();

    let Pagination::Unbounded(records) = result else {
        panic!("Expected an unbounded result");
    };
    assert_eq!(ids(&records), vec![1, 2, 3, 4]);
}

// ============================================================================
// Length-Aware Pagination Tests
// ============================================================================

#[test]
fn test_no_pages() {
    let engine = engine_with_posts(0);
    let schema = posts_schema(PaginationConfig::default());
    let doc = posts_document(&engine, &schema, &page("1", "3"));

    assert_eq!(
        doc,
        json!({
            "data": [],
            "meta": {
                "page": {
                    "currentPage": 1,
                    "from": 0,
                    "lastPage": 1,
                    "perPage": 3,
                    "to": 0,
                    "total": 0
                }
            },
            "links": {
                "first": { "href": href(1, 3) },
                "last": { "href": href(1, 3) }
            }
        })
    );
}

#[test]
fn test_page_1() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::builder().length_aware().build().unwrap());
    let doc = posts_document(&engine, &schema, &page("1", "3"));

    assert_eq!(
        doc["meta"]["page"],
        json!({
            "currentPage": 1,
            "from": 1,
            "lastPage": 2,
            "perPage": 3,
            "to": 3,
            "total": 4
        })
    );
    assert_eq!(
        doc["links"],
        json!({
            "first": { "href": href(1, 3) },
            "last": { "href": href(2, 3) },
            "next": { "href": href(2, 3) }
        })
    );
    assert_eq!(ids(doc["data"].as_array().unwrap()), vec![1, 2, 3]);
}

#[test]
fn test_page_2() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::builder().camel_case_meta().build().unwrap());
    let doc = posts_document(&engine, &schema, &page("2", "3"));

    assert_eq!(
        doc["meta"]["page"],
        json!({
            "currentPage": 2,
            "from": 4,
            "lastPage": 2,
            "perPage": 3,
            "to": 4,
            "total": 4
        })
    );
    assert_eq!(
        doc["links"],
        json!({
            "first": { "href": href(1, 3) },
            "last": { "href": href(2, 3) },
            "prev": { "href": href(1, 3) }
        })
    );
    assert_eq!(ids(doc["data"].as_array().unwrap()), vec![4]);
}

#[test]
fn test_page_past_the_end() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::default());
    let doc = posts_document(&engine, &schema, &page("3", "3"));

    assert_eq!(doc["data"], json!([]));
    assert_eq!(doc["meta"]["page"]["currentPage"], 3);
    assert_eq!(doc["meta"]["page"]["lastPage"], 2);
    assert_eq!(doc["meta"]["page"]["total"], 4);
    assert!(doc["links"].get("next").is_none());
}

#[test]
fn test_page_with_reverse_key() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::default());
    let params = QueryParameters::parse("sort=-id&page[number]=1&page[size]=3", schema.pagination())
        .unwrap();

    let page = QueryAll::new(&schema, engine.query("posts").unwrap())
        .using(&params)
        .paginate(params.page().unwrap())
        .unwrap();

    assert_eq!(ids(page.items()), vec![4, 3, 2]);
}

#[test]
fn test_deterministic_order() {
    let engine = DatabaseEngine::open_in_memory().unwrap();
    engine
        .execute_batch(
            "CREATE TABLE videos (uuid VARCHAR, title VARCHAR, created_at TIMESTAMP);
             INSERT INTO videos VALUES
               ('a5f0e2c1-7d5b-4b43-9d6e-2f1c3b4a5d6e', 'first', TIMESTAMP '2024-03-01 09:00:00'),
               ('f3b3bea3-dca0-4ef9-b06c-43583a7e6118', 'second', TIMESTAMP '2024-03-08 08:00:00'),
               ('d215f35c-feb7-4cc5-9631-61742f00d0b2', 'third', TIMESTAMP '2024-03-08 08:00:00'),
               ('cbe17134-d7e2-4509-ba2c-3b3b5e3b2cbe', 'fourth', TIMESTAMP '2024-03-08 08:00:00');",
        )
        .unwrap();

    let schema = ResourceSchema::new("videos", "uuid").with_column("createdAt", "created_at");
    let params =
        QueryParameters::parse("sort=createdAt", schema.pagination()).unwrap();

    let page = QueryAll::new(&schema, engine.query("videos").unwrap())
        .using(&params)
        .paginate(&page("1", "3"))
        .unwrap();

    let titles: Vec<_> = page.items().iter().map(|r| r["title"].clone()).collect();
    assert_eq!(titles, vec![json!("first"), json!("fourth"), json!("third")]);
}

#[test]
fn test_custom_page_keys() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(
        PaginationConfig::builder()
            .with_page_key("page")
            .with_per_page_key("limit")
            .build()
            .unwrap(),
    );
    let params = PageParams::new().with("page", "1").with("limit", "3");
    let doc = posts_document(&engine, &schema, &params);

    let custom = |number: u64| format!("{BASE}?page%5Bpage%5D={number}&page%5Blimit%5D=3");
    assert_eq!(
        doc["links"],
        json!({
            "first": { "href": custom(1) },
            "last": { "href": custom(2) },
            "next": { "href": custom(2) }
        })
    );
}

// ============================================================================
// Simple Pagination Tests
// ============================================================================

#[test]
fn test_simple_pagination() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::builder().simple().build().unwrap());
    let doc = posts_document(&engine, &schema, &page("1", "3"));

    assert_eq!(
        doc["meta"],
        json!({
            "page": {
                "currentPage": 1,
                "from": 1,
                "perPage": 3,
                "to": 3
            }
        })
    );
    assert_eq!(
        doc["links"],
        json!({
            "first": { "href": href(1, 3) },
            "next": { "href": href(2, 3) }
        })
    );
}

#[test]
fn test_simple_pagination_without_next() {
    let engine = engine_with_posts(3);
    let schema = posts_schema(PaginationConfig::builder().simple().build().unwrap());
    let doc = posts_document(&engine, &schema, &page("1", "3"));

    assert_eq!(doc["meta"]["page"]["to"], 3);
    assert_eq!(doc["links"], json!({ "first": { "href": href(1, 3) } }));
}

#[test]
fn test_simple_page_beyond_offset_range() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::builder().simple().build().unwrap());
    let doc = posts_document(&engine, &schema, &page("1537228672809129303", "3"));

    assert_eq!(doc["data"], json!([]));
    assert_eq!(doc["meta"]["page"]["currentPage"], 1_537_228_672_809_129_303_u64);
    assert_eq!(doc["meta"]["page"]["from"], 0);
    assert_eq!(doc["meta"]["page"]["to"], 0);
    assert_eq!(
        doc["links"],
        json!({
            "first": { "href": href(1, 3) },
            "prev": { "href": href(1_537_228_672_809_129_302, 3) }
        })
    );
}

#[test]
fn test_length_aware_page_beyond_u64() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::default());
    let doc = posts_document(&engine, &schema, &page("100000000000000000000", "3"));

    assert_eq!(doc["data"], json!([]));
    assert_eq!(doc["meta"]["page"]["currentPage"], u64::MAX);
    assert_eq!(doc["meta"]["page"]["lastPage"], 2);
    assert!(doc["links"].get("next").is_none());
}

// ============================================================================
// Meta Formatting Tests
// ============================================================================

#[test]
fn test_snake_case_meta_and_custom_meta_key() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(
        PaginationConfig::builder()
            .with_meta_key("paginator")
            .snake_case_meta()
            .build()
            .unwrap(),
    );
    let doc = posts_document(&engine, &schema, &page("1", "3"));

    assert_eq!(
        doc["meta"],
        json!({
            "paginator": {
                "current_page": 1,
                "from": 1,
                "last_page": 2,
                "per_page": 3,
                "to": 3,
                "total": 4
            }
        })
    );
    assert_eq!(ids(doc["data"].as_array().unwrap()), vec![1, 2, 3]);
}

#[test]
fn test_dash_case_meta() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::builder().dash_case_meta().build().unwrap());
    let doc = posts_document(&engine, &schema, &page("1", "3"));

    assert_eq!(
        doc["meta"],
        json!({
            "page": {
                "current-page": 1,
                "from": 1,
                "last-page": 2,
                "per-page": 3,
                "to": 3,
                "total": 4
            }
        })
    );
}

#[test]
fn test_meta_not_nested() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::builder().without_nested_meta().build().unwrap());
    let doc = posts_document(&engine, &schema, &page("1", "3"));

    assert_eq!(
        doc["meta"],
        json!({
            "currentPage": 1,
            "from": 1,
            "lastPage": 2,
            "perPage": 3,
            "to": 3,
            "total": 4
        })
    );
}

// ============================================================================
// Request Handling Tests
// ============================================================================

#[test]
fn test_filtered_page_keeps_filter_in_links() {
    let engine = engine_with_posts(5);
    let schema = posts_schema(PaginationConfig::default());
    let query = "filter[published]=true&page[number]=1&page[size]=2";
    let params = QueryParameters::parse(query, schema.pagination()).unwrap();

    let result = QueryAll::new(&schema, engine.query("posts").unwrap())
        .using(&params)
        .first_or_paginate(params.page())
        .unwrap();
    let doc = CollectionDocument::from_pagination(
        result,
        &format!("{BASE}?{query}"),
        schema.pagination(),
    )
    .unwrap()
    .to_value()
    .unwrap();

    assert_eq!(ids(doc["data"].as_array().unwrap()), vec![1, 3]);
    assert_eq!(doc["meta"]["page"]["total"], 3);
    assert_eq!(
        doc["links"]["next"]["href"],
        format!("{BASE}?filter%5Bpublished%5D=true&page%5Bnumber%5D=2&page%5Bsize%5D=2")
    );
}

#[test]
fn test_invalid_page_parameters() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::default());

    for (number, size) in [("0", "3"), ("1", "-3"), ("x", "3"), ("1", "1000")] {
        let result = QueryAll::new(&schema, engine.query("posts").unwrap()).paginate(&page(number, size));
        assert!(
            matches!(result, Err(Error::InvalidPageRequest { .. })),
            "page[number]={number}&page[size]={size}"
        );
    }
}

#[test]
fn test_unknown_sort_column() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::default());

    let result = QueryAll::new(&schema, engine.query("posts").unwrap())
        .sort(Some(jsonapi_pager::query::SortSpec::parse("rating").unwrap()))
        .get();
    assert!(matches!(result, Err(Error::InvalidSort { .. })));
}

// ============================================================================
// Single Resource Tests
// ============================================================================

#[test]
fn test_show_resource() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::default());

    let record = QueryOne::new(&schema, engine.query("posts").unwrap(), None, "2")
        .first(&NoIncludes)
        .unwrap();
    let doc = ResourceDocument::new(record).to_value().unwrap();

    assert_eq!(
        doc,
        json!({ "data": { "id": 2, "title": "Post 2", "published": false } })
    );
}

#[test]
fn test_show_resource_hidden_by_filter() {
    let engine = engine_with_posts(4);
    let schema = posts_schema(PaginationConfig::default());
    let params = QueryParameters::parse("filter[published]=true", schema.pagination()).unwrap();

    let record = QueryOne::new(&schema, engine.query("posts").unwrap(), None, "2")
        .using(&params)
        .first(&NoIncludes)
        .unwrap();

    assert_eq!(ResourceDocument::new(record).to_value().unwrap(), json!({ "data": null }));
}
