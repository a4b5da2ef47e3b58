mod common;

use common::{SITE_URL, service_for};
use ruo::{
    client::{ClientError, Environment},
    domain::{LikeAction, PostRef},
    id::PostId,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, body_json, header, method, path, query_param},
};

const COUNTERS: &str = "/1.1/classes/Counter";
const VISITORS: &str = "/1.1/classes/Visitor";

fn post() -> PostRef {
    PostRef {
        id: PostId::new(1001),
        title: "Hello".into(),
    }
}

fn created() -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({
        "objectId": "5c8f0a",
        "createdAt": "2019-03-18T02:00:00.000Z"
    }))
}

async fn expect_no_writes(server: &MockServer, class_path: &str) {
    Mock::given(method("POST"))
        .and(path(class_path))
        .respond_with(created())
        .expect(0)
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn hot_maps_post_ids_to_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COUNTERS))
        .and(query_param("where", r#"{"id":{"$in":[1001,1002]}}"#))
        .and(header("X-LC-Id", "appid-MdYXbMMI"))
        .and(header("X-LC-Key", "appkey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "objectId": "a", "id": 1001, "title": "Hello", "time": 5 },
                { "objectId": "b", "id": 1002, "title": "World", "time": 2 }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server, Environment::Production);
    let hot = service
        .hot(&[PostId::new(1001), PostId::new(1002)])
        .await
        .unwrap();

    assert_eq!(hot.len(), 2);
    assert_eq!(hot[&PostId::new(1001)], 5);
    assert_eq!(hot[&PostId::new(1002)], 2);
}

#[tokio::test]
async fn increase_hot_creates_missing_counter_with_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COUNTERS))
        .and(query_param("where", r#"{"id":1001}"#))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COUNTERS))
        .and(body_json(json!({
            "title": "Hello",
            "id": 1001,
            "time": 1,
            "site": SITE_URL
        })))
        .respond_with(created())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = service_for(&server, Environment::Production);
    assert_eq!(service.increase_hot(&post()).await.unwrap(), 1);
}

#[tokio::test]
async fn increase_hot_increments_existing_counter_by_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COUNTERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "objectId": "abc", "id": 1001, "title": "Hello", "time": 4 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{COUNTERS}/abc")))
        .and(query_param("fetchWhenSave", "true"))
        .and(body_json(json!({ "time": { "__op": "Increment", "amount": 1 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "time": 5,
            "updatedAt": "2019-03-18T02:00:00.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(created())
        .expect(0)
        .mount(&server)
        .await;

    let service = service_for(&server, Environment::Production);
    assert_eq!(service.increase_hot(&post()).await.unwrap(), 5);
}

#[tokio::test]
async fn like_site_reads_without_writing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COUNTERS))
        .and(query_param("where", r#"{"title":"site"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "objectId": "site1", "title": "site", "time": 9 }]
        })))
        .mount(&server)
        .await;
    expect_no_writes(&server, COUNTERS).await;

    let service = service_for(&server, Environment::Production);
    assert_eq!(service.like_site(LikeAction::Read).await.unwrap(), 9);
}

#[tokio::test]
async fn like_site_increment_adds_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COUNTERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "objectId": "site1", "title": "site", "time": 9 }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{COUNTERS}/site1")))
        .and(body_json(json!({ "time": { "__op": "Increment", "amount": 1 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "time": 10 })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server, Environment::Production);
    assert_eq!(service.like_site(LikeAction::Increment).await.unwrap(), 10);
}

#[tokio::test]
async fn like_site_creates_site_counter_when_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COUNTERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COUNTERS))
        .and(body_json(json!({ "title": "site", "time": 1, "site": SITE_URL })))
        .respond_with(created())
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server, Environment::Production);
    assert_eq!(service.like_site(LikeAction::Read).await.unwrap(), 1);
}

#[tokio::test]
async fn visitor_is_created_then_incremented() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VISITORS))
        .and(query_param("where", r#"{"referrer":"https://news.example"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(VISITORS))
        .and(body_json(json!({ "referrer": "https://news.example", "time": 1 })))
        .respond_with(created())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(VISITORS))
        .and(query_param("where", r#"{"referrer":"https://search.example"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "objectId": "v1", "referrer": "https://search.example", "time": 2 }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("{VISITORS}/v1")))
        .and(body_json(json!({ "time": { "__op": "Increment", "amount": 1 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "time": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server, Environment::Production);
    assert_eq!(service.record_visitor("https://news.example").await.unwrap(), 1);
    assert_eq!(service.record_visitor("https://search.example").await.unwrap(), 3);
}

#[tokio::test]
async fn development_environment_never_reaches_leancloud() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let service = service_for(&server, Environment::Development);

    assert!(service.hot(&[PostId::new(1)]).await.unwrap().is_empty());
    assert_eq!(service.increase_hot(&post()).await.unwrap(), 1);
    assert_eq!(service.like_site(LikeAction::Increment).await.unwrap(), 0);
    assert_eq!(service.record_visitor("https://news.example").await.unwrap(), 0);
}

#[tokio::test]
async fn leancloud_errors_carry_their_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VISITORS))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 101,
            "error": "Class or object doesn't exists."
        })))
        .mount(&server)
        .await;

    let service = service_for(&server, Environment::Production);
    let err = service.record_visitor("https://news.example").await.unwrap_err();

    assert!(matches!(err, ClientError::LeanCloud { code: 101, .. }));
}
