//! Concurrency tests for the gateway.

use axum::http::StatusCode;
use std::time::Duration;

mod common;

const MOSCOW: &str = r#"[{"code":"MOW","name":"Moscow","country_name":"Russia"}]"#;

async fn slow_upstream() -> (std::net::SocketAddr, common::SeenPaths) {
    common::start_programmable_upstream(|_| async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        (200, MOSCOW.to_string())
    })
    .await
}

async fn burst(gateway: &common::TestGateway, path: &str, concurrency: usize) -> Vec<StatusCode> {
    let client = common::client();
    let url = gateway.url(path);

    let tasks = (0..concurrency).map(|_| {
        let client = client.clone();
        let url = url.clone();
        tokio::spawn(async move { client.get(&url).send().await.map(|res| res.status()) })
    });

    futures_util::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().expect("request failed"))
        .collect()
}

#[tokio::test]
async fn test_single_flight_collapses_concurrent_misses() {
    let (upstream, seen) = slow_upstream().await;
    let gateway = common::start_gateway(upstream, |config| config.cache.single_flight = true).await;

    let statuses = burst(&gateway, "/v2/places.json?term=Moscow", 20).await;

    assert_eq!(statuses.len(), 20);
    assert!(statuses.iter().all(|s| *s == StatusCode::OK));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_without_single_flight_every_miss_fetches() {
    let (upstream, seen) = slow_upstream().await;
    let gateway = common::start_gateway(upstream, |config| config.cache.single_flight = false).await;

    let statuses = burst(&gateway, "/v2/places.json?term=Moscow", 8).await;

    assert!(statuses.iter().all(|s| *s == StatusCode::OK));
    assert_eq!(seen.lock().unwrap().len(), 8);
}

#[tokio::test]
async fn test_every_request_answered_when_upstream_too_slow() {
    let (upstream, _) = slow_upstream().await;
    let gateway = common::start_gateway(upstream, |config| {
        config.timeouts.request_ms = 50;
    })
    .await;

    let statuses = burst(&gateway, "/v2/places.json?term=Moscow", 10).await;

    assert_eq!(statuses.len(), 10);
    assert!(statuses.iter().all(|s| *s == StatusCode::GATEWAY_TIMEOUT));
}
