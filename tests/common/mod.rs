#![allow(dead_code)]

use axum::{
    body::to_bytes,
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use santa_tracker_rs::{config::Config, routes, state::AppState};
use tower::ServiceExt;

pub const SCENARIO_FEED: &str = r#"{
  "destinations": [
    { "id": "first", "city": "One", "location": { "lat": 1, "lng": 1 }, "arrival": 100, "presentsDelivered": 2 },
    { "id": "second", "city": "Two", "location": { "lat": 2, "lng": 2 }, "arrival": 200, "presentsDelivered": 0 }
  ]
}"#;

/// Serves `body` with `status` from a throw-away local server and returns its URL.
pub async fn serve_feed(status: StatusCode, body: &'static str) -> String {
    let feed = Router::new().route(
        "/route.json",
        get(move || async move { (status, [(header::CONTENT_TYPE, "application/json")], body) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind feed server");
    let addr = listener.local_addr().expect("feed server addr");
    tokio::spawn(async move {
        axum::serve(listener, feed).await.expect("feed server");
    });
    format!("http://{}/route.json", addr)
}

/// Like `serve_feed`, but answers only after `delay`.
pub async fn serve_slow_feed(delay: std::time::Duration, body: &'static str) -> String {
    let feed = Router::new().route(
        "/route.json",
        get(move || async move {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body)
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind feed server");
    let addr = listener.local_addr().expect("feed server addr");
    tokio::spawn(async move {
        axum::serve(listener, feed).await.expect("feed server");
    });
    format!("http://{}/route.json", addr)
}

/// URL of a port nothing listens on.
pub async fn unreachable_feed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind unused port");
    let addr = listener.local_addr().expect("unused port addr");
    drop(listener);
    format!("http://{}/route.json", addr)
}

pub fn app(feed_url: String) -> Router {
    let config = Config {
        feed_url,
        ..Config::default()
    };
    app_with_config(config)
}

pub fn app_with_config(config: Config) -> Router {
    let state = AppState::new(config);
    Router::new()
        .merge(routes::health::router())
        .merge(routes::progress::router())
        .merge(routes::map::router())
        .with_state(state)
}

pub async fn get_request(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, content_type, body.to_vec())
}
