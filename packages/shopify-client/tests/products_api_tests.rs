//! Product endpoints against a local stub server.

mod common;

use crate::common::{StubResponse, StubServer};
use serde_json::json;
use shopify_client::{NewProduct, NewVariant, ShopifyClient, ShopifyError, ShopifyOptions};
use std::sync::{Arc, OnceLock};

fn client(server: &StubServer) -> ShopifyClient {
    ShopifyClient::new(ShopifyOptions {
        shop_url: "nnc.myshopify.com".to_string(),
        access_token: "shpat_test".to_string(),
        api_version: "2024-01".to_string(),
    })
    .with_base_url(&server.base_url)
}

fn new_product(sku: &str) -> NewProduct {
    NewProduct {
        title: sku.to_string(),
        body_html: format!("<strong>Part number: {}</strong>", sku),
        vendor: "NNC".to_string(),
        product_type: "Phones".to_string(),
        tags: "voip".to_string(),
        variants: vec![NewVariant {
            price: "129.00".to_string(),
            sku: sku.to_string(),
            weight: 900,
            weight_unit: "g".to_string(),
        }],
    }
}

fn product_json(id: i64, sku: &str) -> serde_json::Value {
    json!({"id": id, "title": sku, "variants": [{"id": id * 10, "sku": sku}]})
}

#[tokio::test]
async fn create_product_posts_envelope_and_reads_201() {
    let server = StubServer::start(|_| {
        StubResponse::json(201, json!({"product": product_json(7001, "T46U")}))
    })
    .await;

    let created = client(&server).create_product(&new_product("T46U")).await.unwrap();
    assert_eq!(created.id, 7001);
    assert_eq!(created.primary_sku(), Some("T46U"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/products.json");
    assert_eq!(requests[0].header("X-Shopify-Access-Token"), Some("shpat_test"));

    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["product"]["variants"][0]["sku"], "T46U");
    assert_eq!(body["product"]["variants"][0]["weight_unit"], "g");
}

#[tokio::test]
async fn create_product_treats_200_as_failure() {
    let server = StubServer::start(|_| {
        StubResponse::json(200, json!({"product": product_json(7002, "T46U")}))
    })
    .await;

    let err = client(&server).create_product(&new_product("T46U")).await.unwrap_err();
    assert!(matches!(err, ShopifyError::Api { status: 200, .. }));
}

#[tokio::test]
async fn create_product_surfaces_validation_errors() {
    let server = StubServer::start(|_| {
        StubResponse::json(422, json!({"errors": {"title": ["can't be blank"]}}))
    })
    .await;

    let err = client(&server).create_product(&new_product("")).await.unwrap_err();
    match err {
        ShopifyError::Api { status, message } => {
            assert_eq!(status, 422);
            assert!(message.contains("can't be blank"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn list_products_follows_next_links() {
    let base: Arc<OnceLock<String>> = Arc::new(OnceLock::new());
    let handler_base = base.clone();

    let server = StubServer::start(move |request| {
        let base = handler_base.get().cloned().unwrap_or_default();
        if request.target.contains("page_info=p2") {
            StubResponse::json(200, json!({"products": [product_json(3, "C-3")]}))
                .with_header(
                    "Link",
                    &format!("<{}/products.json?limit=250&page_info=p1>; rel=\"previous\"", base),
                )
        } else {
            StubResponse::json(
                200,
                json!({"products": [product_json(1, "A-1"), product_json(2, "B-2")]}),
            )
            .with_header(
                "Link",
                &format!("<{}/products.json?limit=250&page_info=p2>; rel=\"next\"", base),
            )
        }
    })
    .await;
    base.set(server.base_url.clone()).unwrap();

    let products = client(&server).list_products().await.unwrap();

    let skus: Vec<_> = products.iter().filter_map(|p| p.primary_sku()).collect();
    assert_eq!(skus, vec!["A-1", "B-2", "C-3"]);

    let targets: Vec<_> = server.requests().into_iter().map(|r| r.target).collect();
    assert_eq!(
        targets,
        vec![
            "/products.json?limit=250".to_string(),
            "/products.json?limit=250&page_info=p2".to_string(),
        ]
    );
}

#[tokio::test]
async fn list_products_stops_on_api_error() {
    let server = StubServer::start(|_| StubResponse::text(401, "Invalid API key or access token")).await;

    let err = client(&server).list_products().await.unwrap_err();
    assert!(matches!(err, ShopifyError::Api { status: 401, .. }));
}

#[tokio::test]
async fn find_product_by_sku_matches_primary_variant() {
    let server = StubServer::start(|_| {
        StubResponse::json(
            200,
            json!({"products": [
                product_json(1, "A-1"),
                {"id": 2, "title": "No SKU", "variants": [{"id": 20, "sku": ""}]},
                product_json(3, "T46U"),
            ]}),
        )
    })
    .await;
    let client = client(&server);

    let found = client.find_product_by_sku("T46U").await.unwrap();
    assert_eq!(found.map(|p| p.id), Some(3));

    assert!(client.find_product_by_sku("GHOST").await.unwrap().is_none());
    assert!(client.find_product_by_sku("").await.unwrap().is_none());
}
