//! Host server tests: mounting, error pipeline and shutdown.

use std::net::SocketAddr;

use axum::{http::header, routing::get, Router};
use resource_proxy::config::loader::parse_config;
use resource_proxy::config::{ProxyConfig, ResourceConfig};
use resource_proxy::http::HttpServer;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

mod common;

fn resource(path: &str, target: String) -> ResourceConfig {
    ResourceConfig {
        path: path.into(),
        target,
        response_headers: None,
        request_headers: None,
    }
}

/// Start the host on an ephemeral port; dropping the sender stops it.
async fn start_server(config: ProxyConfig) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = server
            .run(listener, async move {
                let _ = rx.await;
            })
            .await;
    });

    (addr, tx)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_mounted_resources_relayed() {
    let upstream = Router::new()
        .route(
            "/data",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], "{\"a\":1}") }),
        )
        .route(
            "/page",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<svg/>") }),
        );
    let upstream_addr = common::start_upstream(upstream).await;

    let config = parse_config(&format!(
        r#"
        [[resources]]
        path = "/data.json"
        target = "http://{upstream_addr}/data"

        [[resources]]
        path = "/logo.svg"
        target = "http://{upstream_addr}/page"
        response_headers = "image/svg+xml"
        "#
    ))
    .unwrap();
    let (addr, shutdown) = start_server(config).await;
    let client = client();

    let res = client
        .get(format!("http://{addr}/data.json"))
        .header("Accept", "application/json")
        .send()
        .await
        .expect("Proxy unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: serde_json::Value = serde_json::from_slice(&res.bytes().await.unwrap()).unwrap();
    assert_eq!(body, serde_json::json!({"a": 1}));

    let res = client
        .get(format!("http://{addr}/logo.svg"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["content-type"], "image/svg+xml");
    assert_eq!(res.text().await.unwrap(), "<svg/>");

    let _ = shutdown.send(());
}

#[test]
fn test_route_parameter_path_fails_before_startup() {
    let err = parse_config(
        r#"
        [[resources]]
        path = "/:feed"
        target = "http://upstream.example/feed"
        "#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("/:feed"));

    let mut config = ProxyConfig::default();
    config
        .resources
        .push(resource("/:feed", "http://upstream.example/feed".into()));
    assert!(HttpServer::new(config).is_err());
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let dead = common::closed_addr().await;

    let mut config = ProxyConfig::default();
    config
        .resources
        .push(resource("/feed", format!("http://{dead}/feed")));
    let (addr, shutdown) = start_server(config).await;

    let res = client()
        .get(format!("http://{addr}/feed"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 502);
    assert_eq!(res.text().await.unwrap(), "Upstream request failed");

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_upstream_error_status_relayed() {
    let upstream = Router::new().route(
        "/missing",
        get(|| async { (axum::http::StatusCode::NOT_FOUND, "nope") }),
    );
    let upstream_addr = common::start_upstream(upstream).await;

    let mut config = ProxyConfig::default();
    config
        .resources
        .push(resource("/thing", format!("http://{upstream_addr}/missing")));
    let (addr, shutdown) = start_server(config).await;

    let res = client()
        .get(format!("http://{addr}/thing"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "nope");

    let _ = shutdown.send(());
}
