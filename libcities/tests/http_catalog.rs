//! HTTP catalog tests against a throwaway local server

use std::time::Duration;

use libcities::app::{CitiesState, StateStore, UNKNOWN_ERROR};
use libcities::catalog::http::HttpCatalog;
use libcities::catalog::CatalogService;
use libcities::config::BackendConfig;
use libcities::error::FetchError;
use libcities::PermissionStatus;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(10);

const SUCCESS_BODY: &str = r#"{
  "status": "success",
  "message": null,
  "cities": [
    {"name": "Uppsala", "lat": 59.8586, "lon": 17.6389, "r": 3000, "points": "17.5 59.8, 17.7 59.8, 17.7 59.9"},
    {"name": "Lund", "lat": 55.7047, "lon": 13.1910, "r": 2000, "points": "13.1 55.6, 13.3 55.6, 13.3 55.8"}
  ]
}"#;

/// Serve one canned response and hand back the request head
async fn serve_once(status_line: &str, body: &str) -> (BackendConfig, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request_head(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    let config = BackendConfig {
        base_url: format!("http://{}/", addr),
        timeout_secs: Some(5),
    };
    (config, server)
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = vec![0u8; 8192];
    let mut len = 0;
    loop {
        let n = socket.read(&mut buf[len..]).await.unwrap();
        len += n;
        if n == 0 || buf[..len].windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf[..len]).to_string()
}

#[tokio::test]
async fn test_success_response() {
    let (config, server) = serve_once("200 OK", SUCCESS_BODY).await;
    let catalog = HttpCatalog::new(&config).unwrap();

    let body = catalog.list_cities().await.unwrap();
    assert!(body.is_success());
    let cities = body.cities.unwrap();
    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0].name, "Uppsala");
    assert_eq!(cities[1].boundary_radius, 2000);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /cities HTTP/1.1"), "{}", request);
}

#[tokio::test]
async fn test_error_body_is_not_a_transport_error() {
    let (config, _server) =
        serve_once("200 OK", r#"{"status":"error","message":"maintenance"}"#).await;
    let catalog = HttpCatalog::new(&config).unwrap();

    let body = catalog.list_cities().await.unwrap();
    assert_eq!(body.status, "error");
    assert_eq!(body.message.as_deref(), Some("maintenance"));
}

#[tokio::test]
async fn test_non_2xx_status() {
    let (config, _server) = serve_once(
        "503 Service Unavailable",
        r#"{"status":"error","message":"overloaded"}"#,
    )
    .await;
    let catalog = HttpCatalog::new(&config).unwrap();

    assert_eq!(catalog.list_cities().await, Err(FetchError::Status(503)));
}

#[tokio::test]
async fn test_malformed_body() {
    let (config, _server) = serve_once("200 OK", "<html>not json</html>").await;
    let catalog = HttpCatalog::new(&config).unwrap();

    assert!(matches!(
        catalog.list_cities().await,
        Err(FetchError::Decode(_))
    ));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = BackendConfig {
        base_url: format!("http://{}/", addr),
        timeout_secs: Some(5),
    };
    let catalog = HttpCatalog::new(&config).unwrap();

    assert!(matches!(
        catalog.list_cities().await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn test_store_fed_by_http_catalog() {
    let (config, _server) = serve_once("200 OK", SUCCESS_BODY).await;
    let mut store = StateStore::new();
    store.fetch_catalog(HttpCatalog::new(&config).unwrap());
    store.on_permission_update(PermissionStatus::Granted);

    let state = timeout(WAIT, store.wait_for(|s| !s.is_loading()))
        .await
        .unwrap()
        .unwrap();
    let names: Vec<&str> = state
        .loaded_cities()
        .unwrap()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["Uppsala", "Lund"]);
}

#[tokio::test]
async fn test_store_fed_by_failing_http_catalog() {
    let (config, _server) = serve_once("500 Internal Server Error", "{}").await;
    let mut store = StateStore::new();
    store.fetch_catalog(HttpCatalog::new(&config).unwrap());

    let state = timeout(WAIT, store.wait_for(|s| s.cities != CitiesState::Loading))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        state.cities,
        CitiesState::Failed {
            message: UNKNOWN_ERROR.to_string()
        }
    );
}

#[tokio::test]
async fn test_success_body_without_cities_fails_the_catalog() {
    let (config, _server) = serve_once("200 OK", r#"{"status":"success","message":null}"#).await;
    let catalog = HttpCatalog::new(&config).unwrap();
    let mut store = StateStore::new();
    store.fetch_catalog(catalog);

    let state = timeout(WAIT, store.wait_for(|s| s.cities != CitiesState::Loading))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        state.cities,
        CitiesState::Failed {
            message: UNKNOWN_ERROR.to_string()
        }
    );
}
