use crate::e2e::helpers;

use helpers::{TestContext, INDEX_HTML};
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_index_from_static_root(ctx: &TestContext) {
    let response = ctx.client.get("/").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(String::from_utf8(response.body_bytes.clone()).unwrap(), INDEX_HTML);
    assert!(response
        .header("content-type")
        .is_some_and(|ct| ct.starts_with("text/html")));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_assets(ctx: &TestContext) {
    let response = ctx.client.get("/missing.js").await.unwrap();
    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_answer_cors_preflight_for_tts(ctx: &TestContext) {
    let response = ctx
        .client
        .options(
            "/tts",
            &[
                ("Origin", "http://example.com"),
                ("Access-Control-Request-Method", "POST"),
                ("Access-Control-Request-Headers", "content-type"),
            ],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("access-control-allow-origin", "*");

    let methods = response
        .header("access-control-allow-methods")
        .expect("Missing allowed methods");
    assert!(methods.contains("GET") && methods.contains("POST"));

    let headers = response
        .header("access-control-allow-headers")
        .expect("Missing allowed headers");
    assert!(headers.to_lowercase().contains("content-type"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_allow_any_origin_on_simple_requests(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_headers("/health", &[("Origin", "https://another.site")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("access-control-allow-origin", "*");
}
