#![allow(clippy::unwrap_used)]
//! Integration tests for `UrlValidator` against a local HTTP server.
//!
//! The server answers `/ok/*` with 200, `/held/*` with 200 after a short
//! delay, and `/status/<code>` with `<code>`; every other path is a 404.
//! Each request path and the peak number of concurrent requests are
//! recorded so tests can assert what was (and was not) requested.

use std::collections::{BTreeMap, BTreeSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use tfdoc_validator::{UrlCheckConfig, UrlError, UrlValidator};

/// What the local server has seen so far.
#[derive(Default)]
struct Server {
    paths: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Server {
    fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

async fn status_for(path: &str) -> StatusCode {
    if path.starts_with("/ok/") {
        return StatusCode::OK;
    }
    if path.starts_with("/held/") {
        tokio::time::sleep(Duration::from_millis(100)).await;
        return StatusCode::OK;
    }
    if path.starts_with("/slow/") {
        tokio::time::sleep(Duration::from_secs(5)).await;
        return StatusCode::OK;
    }
    path.strip_prefix("/status/")
        .and_then(|code| code.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::NOT_FOUND)
}

async fn respond(State(server): State<Arc<Server>>, uri: Uri) -> StatusCode {
    let path = uri.path().to_owned();
    server.paths.lock().unwrap().push(path.clone());

    let now = server.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    server.max_in_flight.fetch_max(now, Ordering::SeqCst);
    let status = status_for(&path).await;
    server.in_flight.fetch_sub(1, Ordering::SeqCst);
    status
}

async fn spawn_server() -> (SocketAddr, Arc<Server>) {
    let server = Arc::new(Server::default());
    let app = Router::new().fallback(respond).with_state(server.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, server)
}

/// Direct connections only, so proxy settings in the environment cannot
/// intercept requests to the local server.
fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn run(text: &str, config: UrlCheckConfig) -> Vec<UrlError> {
    UrlValidator::with_client(text, local_client(), config)
        .unwrap()
        .validate()
        .await
}

fn statuses(errors: &[UrlError]) -> BTreeMap<String, Option<u16>> {
    errors
        .iter()
        .map(|e| (e.url().to_owned(), e.status()))
        .collect()
}

#[tokio::test]
async fn test_all_reachable_yields_no_errors() {
    let (addr, server) = spawn_server().await;
    let text = format!("[a](http://{addr}/ok/a) and http://{addr}/ok/b.");

    let errors = run(&text, UrlCheckConfig::default()).await;
    assert!(errors.is_empty(), "unexpected: {errors:?}");

    let probed: BTreeSet<String> = server.paths().into_iter().collect();
    assert_eq!(
        probed,
        BTreeSet::from(["/ok/a".to_owned(), "/ok/b".to_owned()])
    );
}

#[tokio::test]
async fn test_non_ok_statuses_are_reported_as_a_set() {
    let (addr, _server) = spawn_server().await;
    let text = format!(
        "http://{addr}/ok/1\nhttp://{addr}/status/404\nhttp://{addr}/ok/2\n\
         http://{addr}/status/500\nhttp://{addr}/status/201\nhttp://{addr}/ok/3\n"
    );

    let errors = run(&text, UrlCheckConfig::default()).await;

    let expected = BTreeMap::from([
        (format!("http://{addr}/status/404"), Some(404)),
        (format!("http://{addr}/status/500"), Some(500)),
        (format!("http://{addr}/status/201"), Some(201)),
    ]);
    assert_eq!(statuses(&errors), expected);
    assert_eq!(errors.len(), 3);
    for err in &errors {
        assert!(matches!(err, UrlError::BadStatus { .. }));
        let status = err.status().unwrap();
        assert!(err.to_string().ends_with(&format!("Status: {status}")));
    }
}

#[tokio::test]
async fn test_registry_listing_is_never_requested() {
    let (addr, server) = spawn_server().await;
    let text = format!(
        "http://{addr}/status/404 and http://{addr}/registry.terraform.io/providers/foo/bar"
    );

    let errors = run(&text, UrlCheckConfig::default()).await;

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].url(), format!("http://{addr}/status/404"));
    assert_eq!(server.paths(), vec!["/status/404".to_owned()]);
}

#[tokio::test]
async fn test_duplicate_urls_are_probed_once() {
    let (addr, server) = spawn_server().await;
    let text = format!(
        "http://{addr}/status/410 [x](http://{addr}/status/410) <http://{addr}/status/410>"
    );

    let errors = run(&text, UrlCheckConfig::default()).await;

    assert_eq!(errors.len(), 1);
    assert_eq!(server.paths().len(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}/gone");
    let errors = run(&url, UrlCheckConfig::default()).await;

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], UrlError::TransportError { .. }));
    assert_eq!(errors[0].status(), None);
    assert!(
        errors[0]
            .to_string()
            .starts_with(&format!("error accessing URL: {url}: "))
    );
}

#[tokio::test]
async fn test_unsupported_scheme_is_transport_error() {
    let errors = run("ftp://files.example.org/pub", UrlCheckConfig::default()).await;
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], UrlError::TransportError { .. }));
}

#[tokio::test]
async fn test_timeout_bounds_slow_probe() {
    let (addr, _server) = spawn_server().await;
    let mut config = UrlCheckConfig::default();
    config.timeout = Some(Duration::from_millis(200));

    let started = std::time::Instant::now();
    let errors = run(&format!("http://{addr}/slow/x http://{addr}/ok/y"), config).await;

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], UrlError::TransportError { .. }));
    assert_eq!(errors[0].url(), format!("http://{addr}/slow/x"));
}

#[tokio::test]
async fn test_bounded_concurrency_still_collects_everything() {
    let (addr, server) = spawn_server().await;
    let text: String = (0..20)
        .map(|i| {
            if i % 4 == 0 {
                format!("http://{addr}/status/503?n={i}\n")
            } else {
                format!("http://{addr}/ok/{i}\n")
            }
        })
        .collect();
    let mut config = UrlCheckConfig::default();
    config.max_concurrency = Some(2);

    let errors = run(&text, config).await;

    assert_eq!(errors.len(), 5);
    assert!(errors.iter().all(|e| e.status() == Some(503)));
    assert_eq!(server.paths().len(), 20);
}

#[tokio::test]
async fn test_custom_exemption_is_not_probed() {
    let (addr, server) = spawn_server().await;
    let mut config = UrlCheckConfig::default();
    config.exempt_patterns.push("/internal/".to_owned());

    let text = format!("http://{addr}/internal/wiki http://{addr}/ok/z");
    let errors = run(&text, config).await;

    assert!(errors.is_empty());
    assert_eq!(server.paths(), vec!["/ok/z".to_owned()]);
}

#[tokio::test]
async fn test_repeat_runs_yield_same_error_set() {
    let (addr, _server) = spawn_server().await;
    let text = format!("http://{addr}/status/404 http://{addr}/status/502 http://{addr}/ok/a");
    let validator =
        UrlValidator::with_client(text.as_str(), local_client(), UrlCheckConfig::default())
            .unwrap();

    let first = statuses(&validator.validate().await);
    let second = statuses(&validator.validate().await);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

fn held_urls(addr: SocketAddr, count: usize) -> String {
    (0..count)
        .map(|i| format!("http://{addr}/held/{i}\n"))
        .collect()
}

#[tokio::test]
async fn test_max_concurrency_bounds_requests_in_flight() {
    let (addr, server) = spawn_server().await;
    let mut config = UrlCheckConfig::default();
    config.max_concurrency = Some(2);

    let errors = run(&held_urls(addr, 12), config).await;

    assert!(errors.is_empty(), "unexpected: {errors:?}");
    assert_eq!(server.paths().len(), 12);
    let peak = server.max_in_flight();
    assert!(peak <= 2, "peak in-flight requests {peak} exceeds the bound");
}

#[tokio::test]
async fn test_unbounded_requests_run_in_parallel() {
    let (addr, server) = spawn_server().await;

    let errors = run(&held_urls(addr, 12), UrlCheckConfig::default()).await;

    assert!(errors.is_empty(), "unexpected: {errors:?}");
    assert!(server.max_in_flight() > 2, "peak: {}", server.max_in_flight());
}
