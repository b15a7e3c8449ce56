mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use microlink::domain::entities::Record;
use microlink::domain::repositories::LinkRepository;
use serde_json::{Value, json};

#[tokio::test]
async fn test_fresh_user_has_no_urls() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::app(ctx.state)).unwrap();

    let (name, value) = common::signed_cookie("user-1");
    let response = server.get("/api/user/urls").add_header(name, value).await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_listing_returns_shortened_urls() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::app(ctx.state)).unwrap();

    let (name, value) = common::signed_cookie("user-1");
    server
        .post("/")
        .add_header(name.clone(), value.clone())
        .text("https://example.com/1")
        .await
        .assert_status(StatusCode::CREATED);
    server
        .post("/")
        .add_header(name.clone(), value.clone())
        .text("https://example.com/2")
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/api/user/urls").add_header(name, value).await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["original_url"], "https://example.com/1");
    assert!(
        items[0]["short_url"]
            .as_str()
            .unwrap()
            .starts_with(&format!("{}/", common::BASE_URL))
    );
}

#[tokio::test]
async fn test_listing_is_per_user() {
    let ctx = common::create_test_context();
    ctx.repo
        .add("AbCdEfGh", &Record::new("someone-else", "https://example.com"))
        .await
        .unwrap();

    let server = TestServer::new(common::app(ctx.state)).unwrap();

    let (name, value) = common::signed_cookie("user-1");
    let response = server.get("/api/user/urls").add_header(name, value).await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_delete_is_accepted_and_eventually_visible() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::app(ctx.state)).unwrap();

    let (name, value) = common::signed_cookie("user-1");
    let created = server
        .post("/")
        .add_header(name.clone(), value.clone())
        .text("https://example.com")
        .await;
    created.assert_status(StatusCode::CREATED);
    let short_id = created.text().rsplit('/').next().unwrap().to_string();

    let response = server
        .delete("/api/user/urls")
        .add_header(name, value)
        .json(&json!([short_id]))
        .await;
    response.assert_status(StatusCode::ACCEPTED);

    // Draining the pipeline forces the pending batch through.
    ctx.pipeline.shutdown().await;

    let resolved = server.get(&format!("/{short_id}")).await;
    resolved.assert_status(StatusCode::GONE);
}

#[tokio::test]
async fn test_delete_of_foreign_url_is_a_noop() {
    let ctx = common::create_test_context();
    ctx.repo
        .add("AbCdEfGh", &Record::new("owner", "https://example.com"))
        .await
        .unwrap();

    let server = TestServer::new(common::app(ctx.state)).unwrap();

    let (name, value) = common::signed_cookie("intruder");
    let response = server
        .delete("/api/user/urls")
        .add_header(name, value)
        .json(&json!(["AbCdEfGh"]))
        .await;
    response.assert_status(StatusCode::ACCEPTED);

    ctx.pipeline.shutdown().await;

    // Still resolvable: the backend skipped the non-matching owner.
    let resolved = server.get("/AbCdEfGh").await;
    resolved.assert_status(StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_delete_empty_list_is_rejected() {
    let ctx = common::create_test_context();
    let server = TestServer::new(common::app(ctx.state)).unwrap();

    let (name, value) = common::signed_cookie("user-1");
    let response = server
        .delete("/api/user/urls")
        .add_header(name, value)
        .json(&json!([]))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
