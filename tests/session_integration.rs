//! Integration tests for cookie persistence across requests.
//!
//! Drives the shared client directly so the pipeline's injection/capture
//! stages are exercised over real HTTP against a mock server.

use std::time::Duration;

use reqwest::Method;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use websession::{OutboundRequest, SessionClient, SessionConfig};

fn client_for(server: &MockServer) -> SessionClient {
    let base = Url::parse(&format!("{}/", server.uri())).expect("mock server uri");
    SessionClient::new(SessionConfig::new(base, "sessions@example.com"))
}

async fn get(client: &SessionClient, route: &str) {
    let url = client.endpoint(route).expect("endpoint");
    let response = client
        .execute(OutboundRequest::new(Method::GET, url))
        .await
        .expect("request should succeed");
    assert!(response.status.is_success(), "HTTP {}", response.status);
}

#[tokio::test]
async fn test_first_request_sends_empty_cookie_header() {
    let server = MockServer::start().await;

    // nothing in the jar yet: the header is present but empty, clearing
    // any transport-level default
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("cookie", ""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    get(&client, "page").await;
}

#[tokio::test]
async fn test_captured_cookies_are_replayed_on_next_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "a=1")
                .append_header("set-cookie", "b=2"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/second"))
        .and(header("cookie", "a=1; b=2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    get(&client, "first").await;
    get(&client, "second").await;
}

#[tokio::test]
async fn test_later_responses_merge_and_overwrite_by_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(ResponseTemplate::new(200).append_header("set-cookie", "a=1"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "a=9")
                .append_header("set-cookie", "c=3"),
        )
        .expect(1)
        .mount(&server)
        .await;

    // merged jar: a overwritten in place, c appended
    Mock::given(method("GET"))
        .and(path("/third"))
        .and(header("cookie", "a=9; c=3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    get(&client, "first").await;
    get(&client, "second").await;
    get(&client, "third").await;
}

#[tokio::test]
async fn test_jar_entry_expires_with_its_soonest_cookie() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/grant"))
        .respond_with(
            ResponseTemplate::new(200).append_header("set-cookie", "sid=abc; Max-Age=1"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/while-valid"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    // after the cookie's lifetime the whole jar entry is gone
    Mock::given(method("GET"))
        .and(path("/after-expiry"))
        .and(header("cookie", ""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    get(&client, "grant").await;
    get(&client, "while-valid").await;
    tokio::time::sleep(Duration::from_millis(1500)).await;
    get(&client, "after-expiry").await;
}

#[tokio::test]
async fn test_cookies_do_not_leak_across_origins() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/grant"))
        .respond_with(ResponseTemplate::new(200).append_header("set-cookie", "sid=secret"))
        .expect(1)
        .mount(&server_a)
        .await;

    // the other origin's jar is empty: only the empty header goes out
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header("cookie", ""))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server_b)
        .await;

    let client = client_for(&server_a);
    get(&client, "grant").await;

    let foreign = Url::parse(&format!("{}/page", server_b.uri())).expect("url");
    let response = client
        .execute(OutboundRequest::new(Method::GET, foreign))
        .await
        .expect("cross-origin request should succeed");
    assert!(response.status.is_success());
}

#[tokio::test]
async fn test_diagnostics_toggle_does_not_disturb_the_flow() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    get(&client, "page").await;
    client.set_diagnostics(true);
    // non-JSON body: the response logger must swallow the parse failure
    get(&client, "page").await;
}
