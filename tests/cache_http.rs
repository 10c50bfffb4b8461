//! Integration tests for the cached HTTP client against a mock PokeAPI

use std::time::Duration;

use pokedex::cache::{CacheConfig, CachedClient, FetchError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn test_config() -> CacheConfig {
    CacheConfig {
        ttl: Duration::from_secs(60),
        reap_interval: Duration::from_millis(100),
        request_timeout: Duration::from_secs(2),
    }
}

#[tokio::test]
async fn test_identical_requests_reach_server_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/pikachu"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"name":"pikachu"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = CachedClient::new(&test_config());
    let url = format!("{}/api/v2/pokemon/pikachu", server.uri());

    for _ in 0..3 {
        let body = client.fetch_or_serve(&url).await.unwrap();
        assert_eq!(&body[..], br#"{"name":"pikachu"}"#);
    }

    assert_eq!(client.store().keys(), vec![url]);
    client.shutdown().await;
}

#[tokio::test]
async fn test_not_found_is_remote_error_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/pokemon/missingno"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let client = CachedClient::new(&test_config());
    let url = format!("{}/api/v2/pokemon/missingno", server.uri());

    for _ in 0..2 {
        let result = client.fetch_or_serve(&url).await;
        assert!(matches!(result, Err(FetchError::Remote { status: 404 })));
        assert!(client.store().get(&url).is_none());
    }

    client.shutdown().await;
}

#[tokio::test]
async fn test_expired_response_is_fetched_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/location-area/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(2)
        .mount(&server)
        .await;

    let config = CacheConfig {
        ttl: Duration::from_millis(150),
        reap_interval: Duration::from_millis(50),
        request_timeout: Duration::from_secs(2),
    };
    let client = CachedClient::new(&config);
    let url = format!("{}/api/v2/location-area/1", server.uri());

    client.fetch_or_serve(&url).await.unwrap();
    assert_eq!(client.store().len(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(client.store().is_empty(), "reaper should have evicted the entry");

    client.fetch_or_serve(&url).await.unwrap();
    client.shutdown().await;
}

#[tokio::test]
async fn test_slow_server_times_out_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = CacheConfig {
        request_timeout: Duration::from_millis(200),
        ..test_config()
    };
    let client = CachedClient::new(&config);
    let url = format!("{}/api/v2/pokemon/slowpoke", server.uri());

    let result = client.fetch_or_serve(&url).await;
    assert!(matches!(result, Err(FetchError::Network(_))));
    assert!(client.store().is_empty());
    client.shutdown().await;
}

#[tokio::test]
async fn test_truncated_body_is_io_error_and_not_cached() {
    // Announces 100 bytes, sends 5, then hangs up
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = CachedClient::new(&test_config());
    let url = format!("http://{}/api/v2/pokemon/ditto", addr);

    let result = client.fetch_or_serve(&url).await;
    assert!(matches!(result, Err(FetchError::Io(_))), "got {:?}", result);
    assert!(client.store().is_empty());

    server.await.unwrap();
    client.shutdown().await;
}
