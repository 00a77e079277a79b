use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_health_responses(ctx: &TestContext) {
    let first = ctx.client.get("/health").await.unwrap();
    let second = ctx.client.get("/health").await.unwrap();

    first.assert_header_exists("x-request-id");
    second.assert_header_exists("x-request-id");
    assert_ne!(first.header("x-request-id"), second.header("x-request-id"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_handle_concurrent_health_checks(ctx: &TestContext) {
    let mut handles = Vec::new();
    for _ in 0..10 {
        let client = ctx.client.clone();
        handles.push(tokio::spawn(async move { client.get("/health").await }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        response.assert_status(StatusCode::OK);
    }
}
