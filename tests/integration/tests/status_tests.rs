//! Status endpoint and poller integration tests
//!
//! Most tests run against an in-memory counter store. The Redis test
//! requires a running Redis instance and `REDIS_URL`.
//!
//! Run with: cargo test -p integration-tests --test status_tests

use std::sync::Arc;
use std::time::Duration;

use integration_tests::{
    assert_json, assert_status, check_redis_env, test_config, TestServer,
};
use presence_cache::{
    InMemoryCounterStore, RedisCounterStore, RedisPool, RedisPoolConfig, SharedCounterStore,
};
use presence_client::{PollerHandle, PresencePoller, PresenceState};
use presence_core::{StatusResponse, ACTIVE_KEY, STATUS_PATH};
use reqwest::{header, StatusCode};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn memory_store(value: Option<&str>) -> Arc<InMemoryCounterStore> {
    let store = InMemoryCounterStore::new();
    if let Some(value) = value {
        store.set(ACTIVE_KEY, value);
    }
    Arc::new(store)
}

async fn start_server(store: &Arc<InMemoryCounterStore>) -> TestServer {
    let shared: SharedCounterStore = store.clone();
    TestServer::start(shared)
        .await
        .expect("Failed to start server")
}

fn start_poller(server: &TestServer) -> PollerHandle {
    let source = server.status_source().expect("Failed to build source");
    PresencePoller::new(source)
        .with_interval(POLL_INTERVAL)
        .spawn()
}

/// Wait until the poller reports `expected`
async fn wait_for_state(handle: &PollerHandle, expected: PresenceState) {
    let mut changes = handle.subscribe();
    let reached = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if *changes.borrow_and_update() == expected {
                return;
            }
            if changes.changed().await.is_err() {
                return;
            }
        }
    })
    .await;

    assert!(
        reached.is_ok(),
        "Expected {expected:?}, still {:?}",
        handle.state()
    );
    assert_eq!(handle.state(), expected);
}

// ============================================================================
// Status Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_status_reports_counter() {
    let store = memory_store(Some("42"));
    let server = start_server(&store).await;

    let response = server.get(STATUS_PATH).await.expect("Request failed");
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=5, s-maxage=5, stale-while-revalidate=30"
    );
    let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body, StatusResponse::new(42));
}

#[tokio::test]
async fn test_status_missing_counter_is_zero() {
    let store = memory_store(None);
    let server = start_server(&store).await;

    let response = server.get(STATUS_PATH).await.expect("Request failed");
    assert!(response.headers().get(header::CACHE_CONTROL).is_some());
    let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.active, 0);
}

#[tokio::test]
async fn test_status_malformed_counter_is_zero() {
    let store = memory_store(Some("lots"));
    let server = start_server(&store).await;

    let response = server.get(STATUS_PATH).await.expect("Request failed");
    let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.active, 0);
}

#[tokio::test]
async fn test_status_reports_leading_integer() {
    let store = memory_store(Some("12abc"));
    let server = start_server(&store).await;

    let response = server.get(STATUS_PATH).await.expect("Request failed");
    let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.active, 12);
}

#[tokio::test]
async fn test_status_burst_keeps_response_shape() {
    let store = memory_store(Some("9"));
    let server = start_server(&store).await;

    for _ in 0..300 {
        let response = server.get(STATUS_PATH).await.expect("Request failed");
        let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body.active, 9);
    }
}

#[tokio::test]
async fn test_status_store_failure() {
    let store = memory_store(Some("42"));
    store.set_available(false);
    let server = start_server(&store).await;

    let response = server.get(STATUS_PATH).await.expect("Request failed");
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    let body: StatusResponse = assert_json(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();
    assert_eq!(body, StatusResponse::fallback());
}

#[tokio::test]
async fn test_status_without_store() {
    let config = test_config(&[]).unwrap();
    let server = TestServer::start_with_config(None, config)
        .await
        .expect("Failed to start server");

    let response = server.get(STATUS_PATH).await.expect("Request failed");
    let body: StatusResponse = assert_json(response, StatusCode::INTERNAL_SERVER_ERROR)
        .await
        .unwrap();
    assert_eq!(body.active, 0);
}

#[tokio::test]
async fn test_status_rejects_other_methods() {
    let store = memory_store(Some("1"));
    let server = start_server(&store).await;

    let url = format!("{}{}", server.base_url(), STATUS_PATH);
    let response = server.client.post(&url).send().await.expect("Request failed");
    assert_status(response, StatusCode::METHOD_NOT_ALLOWED)
        .await
        .unwrap();
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let store = memory_store(None);
    let server = start_server(&store).await;

    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_follows_store() {
    let store = memory_store(None);
    let server = start_server(&store).await;

    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();

    store.set_available(false);
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::SERVICE_UNAVAILABLE)
        .await
        .unwrap();
}

// ============================================================================
// Poller Tests
// ============================================================================

#[tokio::test]
async fn test_poller_tracks_counter() {
    let store = memory_store(Some("42"));
    let server = start_server(&store).await;
    let handle = start_poller(&server);

    wait_for_state(&handle, PresenceState::Online(42)).await;

    store.set(ACTIVE_KEY, "43");
    wait_for_state(&handle, PresenceState::Online(43)).await;

    store.remove(ACTIVE_KEY);
    wait_for_state(&handle, PresenceState::Online(0)).await;

    handle.shutdown().await;
}

#[tokio::test]
async fn test_poller_reports_offline_on_store_failure() {
    let store = memory_store(Some("42"));
    let server = start_server(&store).await;
    let handle = start_poller(&server);

    wait_for_state(&handle, PresenceState::Online(42)).await;

    store.set_available(false);
    wait_for_state(&handle, PresenceState::Offline).await;

    store.set_available(true);
    wait_for_state(&handle, PresenceState::Online(42)).await;

    handle.shutdown().await;
}

#[tokio::test]
async fn test_poller_reports_unknown_when_server_is_gone() {
    let store = memory_store(Some("7"));
    let mut server = start_server(&store).await;
    let handle = start_poller(&server);

    wait_for_state(&handle, PresenceState::Online(7)).await;

    server.stop().await;
    wait_for_state(&handle, PresenceState::Unknown).await;

    handle.shutdown().await;
}

#[tokio::test]
async fn test_stopped_poller_keeps_last_state() {
    let store = memory_store(Some("5"));
    let server = start_server(&store).await;
    let handle = start_poller(&server);

    wait_for_state(&handle, PresenceState::Online(5)).await;
    handle.stop();

    store.set(ACTIVE_KEY, "6");
    tokio::time::sleep(POLL_INTERVAL * 5).await;
    assert_eq!(handle.state(), PresenceState::Online(5));
}

// ============================================================================
// Redis Tests
// ============================================================================

#[tokio::test]
async fn test_status_with_redis() {
    let Some(url) = check_redis_env() else {
        return;
    };

    let pool = RedisPool::new(RedisPoolConfig {
        url: url.clone(),
        ..RedisPoolConfig::default()
    })
    .expect("Failed to create Redis pool");

    let mut conn = pool.get().await.expect("Failed to get connection");
    let previous: Option<String> = redis::cmd("GET")
        .arg(ACTIVE_KEY)
        .query_async(&mut conn)
        .await
        .unwrap();
    let _: () = redis::cmd("SET")
        .arg(ACTIVE_KEY)
        .arg("17")
        .query_async(&mut conn)
        .await
        .unwrap();

    let config = test_config(&[("REDIS_URL", url.as_str())]).unwrap();
    let store = RedisCounterStore::new(pool.clone()).shared();
    let server = TestServer::start_with_config(Some(store), config)
        .await
        .expect("Failed to start server");

    let response = server.get(STATUS_PATH).await.expect("Request failed");
    let body: StatusResponse = assert_json(response, StatusCode::OK).await.unwrap();

    // Restore whatever was there before
    let _: () = match previous {
        Some(value) => redis::cmd("SET").arg(ACTIVE_KEY).arg(value).query_async(&mut conn).await,
        None => redis::cmd("DEL").arg(ACTIVE_KEY).query_async(&mut conn).await,
    }
    .unwrap();

    assert_eq!(body.active, 17);
}
