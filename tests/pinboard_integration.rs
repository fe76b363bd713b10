//! Integration tests for the bookmarking API client.
//!
//! These tests verify request construction and response decoding against a
//! mock HTTP server.

use chrono::{TimeZone, Utc};
use pindown_core::ApiClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn posts_body() -> serde_json::Value {
    serde_json::json!([
        {
            "href": "https://example.com/article",
            "description": "An article",
            "extended": "worth rereading",
            "tags": "rust reading",
            "time": "2023-01-01T12:00:00Z",
            "hash": "a1b2c3d4"
        },
        {
            "href": "https://example.org/tool",
            "description": "A tool",
            "extended": "",
            "tags": "",
            "time": "2023-02-01T08:30:00Z",
            "hash": "e5f6a7b8"
        }
    ])
}

#[tokio::test]
async fn test_last_update_parses_server_time() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/update"))
        .and(query_param("auth_token", "tok"))
        .and(query_param("format", "json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"update_time": "2023-03-01T10:00:00Z"})),
        )
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_base_url("tok", &mock_server.uri()).unwrap();
    let update = client.last_update().await.unwrap();

    assert_eq!(update, Utc.with_ymd_and_hms(2023, 3, 1, 10, 0, 0).unwrap());
}

#[tokio::test]
async fn test_all_posts_decodes_post_list() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts_body()))
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_base_url("tok", &mock_server.uri()).unwrap();
    let posts = client.all_posts(None, None).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].href, "https://example.com/article");
    assert_eq!(posts[0].tag_list(), vec!["rust", "reading"]);
    assert!(posts[1].tags.is_empty());
}

#[tokio::test]
async fn test_all_posts_forwards_tag_filter() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/all"))
        .and(query_param("tag", "rust cli"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_base_url("tok", &mock_server.uri()).unwrap();
    let posts = client.all_posts(Some("rust cli"), None).await.unwrap();

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_all_posts_forwards_fromdt_in_rfc3339_zulu() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/all"))
        .and(query_param("fromdt", "2023-01-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_base_url("tok", &mock_server.uri()).unwrap();
    let fromdt = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    client.all_posts(None, Some(fromdt)).await.unwrap();
}

#[tokio::test]
async fn test_all_posts_omits_optional_params_when_unset() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_base_url("tok", &mock_server.uri()).unwrap();
    client.all_posts(None, None).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or_default();
    assert!(!query.contains("tag="));
    assert!(!query.contains("fromdt="));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/update"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_base_url("bad-token", &mock_server.uri()).unwrap();
    let result = client.last_update().await;

    assert!(result.is_err(), "401 should surface as an error");
}

#[tokio::test]
async fn test_undecodable_body_is_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/update"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = ApiClient::with_base_url("tok", &mock_server.uri()).unwrap();
    let result = client.last_update().await;

    assert!(result.is_err(), "non-JSON body should surface as an error");
}
