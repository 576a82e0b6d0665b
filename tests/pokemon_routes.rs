//! Integration tests for the listing and detail routes against a stub
//! upstream served by axum on a random local port.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use pokeproxy::api::pagination::PokemonListPage;
use pokeproxy::api::pokemon::{MSG_LIST_FAILED, MSG_MISSING_ID};
use pokeproxy::api::response::ErrorEnvelope;
use pokeproxy::api::MSG_ROUTE_NOT_FOUND;
use pokeproxy::client::ApiClient;
use pokeproxy::error::PokeProxyError;
use pokeproxy::server::{self, AppState};
use pokeproxy::upstream::PokeApiClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

const PIKACHU: &str = r#"{"id":25,"name":"pikachu","height":4,"weight":60,"types":[{"slot":1,"type":{"name":"electric","url":"x"}}]}"#;
const TOTAL: u64 = 1302;

async fn spawn(router: Router) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

/// Answers the listing by echoing `limit`/`offset` into synthetic entries,
/// and the detail route for `pikachu` only. Every call bumps `hits`.
fn stub_upstream(hits: Arc<AtomicUsize>) -> Router {
    let list_hits = Arc::clone(&hits);
    let detail_hits = hits;
    Router::new()
        .route(
            "/pokemon",
            get(move |uri: Uri| {
                list_hits.fetch_add(1, Ordering::SeqCst);
                async move { list_body(&uri) }
            }),
        )
        .route(
            "/pokemon/{name}",
            get(
                move |axum::extract::Path(name): axum::extract::Path<String>| {
                    detail_hits.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if name == "pikachu" {
                            ([("content-type", "application/json")], PIKACHU).into_response()
                        } else {
                            (StatusCode::NOT_FOUND, "Not Found").into_response()
                        }
                    }
                },
            ),
        )
}

fn list_body(uri: &Uri) -> axum::response::Response {
    let mut limit = 0u64;
    let mut offset = 0u64;
    for (k, v) in url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes()) {
        match k.as_ref() {
            "limit" => limit = v.parse().unwrap_or(0),
            "offset" => offset = v.parse().unwrap_or(0),
            _ => {}
        }
    }
    let results: Vec<serde_json::Value> = (0..limit)
        .map(|i| {
            let id = offset + i + 1;
            serde_json::json!({
                "name": format!("mon-{id}"),
                "url": format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            })
        })
        .collect();
    let next = (offset + limit < TOTAL).then(|| "https://next".to_string());
    let previous = (offset > 0).then(|| "https://prev".to_string());
    axum::Json(serde_json::json!({
        "count": TOTAL,
        "next": next,
        "previous": previous,
        "results": results,
    }))
    .into_response()
}

/// Accepts one connection, reads whatever is sent and never answers.
/// Reports how long the peer kept the connection open.
async fn silent_upstream() -> (SocketAddr, oneshot::Receiver<Duration>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let opened = Instant::now();
        let mut buf = [0u8; 1024];
        while socket.read(&mut buf).await.is_ok_and(|n| n > 0) {}
        let _ = closed_tx.send(opened.elapsed());
    });

    (addr, closed_rx)
}

async fn start_proxy(upstream: SocketAddr, timeout: Duration) -> (SocketAddr, oneshot::Sender<()>) {
    let base_url = url::Url::parse(&format!("http://{upstream}")).unwrap();
    let state = Arc::new(AppState {
        pokeapi: PokeApiClient::new(
            server::build_http_client(Duration::from_secs(30)),
            base_url,
            timeout,
        ),
    });
    spawn(server::build_router(state, 1_048_576)).await
}

struct StubbedProxy {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    shutdown: Vec<oneshot::Sender<()>>,
}

impl StubbedProxy {
    async fn start() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let (upstream, stop_upstream) = spawn(stub_upstream(Arc::clone(&hits))).await;
        let (addr, stop_proxy) = start_proxy(upstream, Duration::from_secs(5)).await;
        Self {
            addr,
            hits,
            shutdown: vec![stop_proxy, stop_upstream],
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    fn stop(self) {
        for tx in self.shutdown {
            let _ = tx.send(());
        }
    }
}

/// Send `GET {target}` verbatim, bypassing client-side path normalization.
async fn raw_get(addr: SocketAddr, target: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let text = String::from_utf8_lossy(&raw).into_owned();

    let status = text.split_whitespace().nth(1).unwrap().parse().unwrap();
    let body = text
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

#[tokio::test]
async fn detail_body_is_forwarded_verbatim() {
    let proxy = StubbedProxy::start().await;

    let resp = reqwest::get(proxy.url("/api/pokemon/Pikachu")).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.text().await.unwrap(), PIKACHU);

    proxy.stop();
}

#[tokio::test]
async fn percent_encoded_identifier_is_decoded() {
    let proxy = StubbedProxy::start().await;

    let resp = reqwest::get(proxy.url("/api/pokemon/%20pikachu%20/extra"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    proxy.stop();
}

#[tokio::test]
async fn unknown_pokemon_is_404_with_message() {
    let proxy = StubbedProxy::start().await;

    let resp = reqwest::get(proxy.url("/api/pokemon/doesnotexist123"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let envelope: ErrorEnvelope = resp.json().await.unwrap();
    assert_eq!(
        envelope.error.message,
        "Pok\u{e9}mon no encontrado. Verifica el nombre o ID."
    );
    assert_eq!(envelope.error.status_code, 404);

    proxy.stop();
}

#[tokio::test]
async fn empty_identifier_is_400_without_upstream_call() {
    let proxy = StubbedProxy::start().await;

    for path in ["/api/pokemon/", "/api/pokemon/%20%20"] {
        let resp = reqwest::get(proxy.url(path)).await.unwrap();
        assert_eq!(resp.status(), 400);
        let envelope: ErrorEnvelope = resp.json().await.unwrap();
        assert_eq!(envelope.error.message, MSG_MISSING_ID);
    }
    assert_eq!(proxy.hits.load(Ordering::SeqCst), 0);

    proxy.stop();
}

#[tokio::test]
async fn dot_segments_never_reach_the_listing() {
    let proxy = StubbedProxy::start().await;

    for target in ["/api/pokemon/..", "/api/pokemon/%2E%2E", "/api/pokemon/%2e."] {
        let (status, body) = raw_get(proxy.addr, target).await;
        assert_eq!(status, 404, "{target}");
        let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap();
        assert_eq!(envelope.error.message, MSG_ROUTE_NOT_FOUND);
    }

    for target in ["/api/pokemon/.", "/api/pokemon/%2E"] {
        let (status, body) = raw_get(proxy.addr, target).await;
        assert_eq!(status, 400, "{target}");
        let envelope: ErrorEnvelope = serde_json::from_str(&body).unwrap();
        assert_eq!(envelope.error.message, MSG_MISSING_ID);
    }

    assert_eq!(proxy.hits.load(Ordering::SeqCst), 0);

    proxy.stop();
}

#[tokio::test]
async fn listing_defaults_and_shapes_the_page() {
    let proxy = StubbedProxy::start().await;

    let page: PokemonListPage = reqwest::get(proxy.url("/api/pokemon"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.limit, 20);
    assert_eq!(page.total, TOTAL);
    assert!(page.has_next_page);
    assert!(!page.has_prev_page);
    assert_eq!(page.results.len(), 20);
    assert_eq!(page.results[0].id, 1);
    assert_eq!(page.results[0].name, "mon-1");

    proxy.stop();
}

#[tokio::test]
async fn listing_offset_follows_page_and_limit() {
    let proxy = StubbedProxy::start().await;

    let value: serde_json::Value = reqwest::get(proxy.url("/api/pokemon?limit=10&page=3"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(value["page"], 3);
    assert_eq!(value["limit"], 10);
    assert_eq!(value["hasPrevPage"], true);
    assert_eq!(value["hasNextPage"], true);
    assert_eq!(value["results"][0]["id"], 21);
    assert_eq!(value["results"][9]["id"], 30);

    proxy.stop();
}

#[tokio::test]
async fn out_of_range_limit_behaves_like_default() {
    let proxy = StubbedProxy::start().await;
    let addr = proxy.addr;

    let get_page = move |query: &'static str| async move {
        reqwest::get(format!("http://{addr}/api/pokemon{query}"))
            .await
            .unwrap()
            .json::<PokemonListPage>()
            .await
            .unwrap()
    };

    let oversized = get_page("?limit=500").await;
    let default = get_page("?limit=20").await;
    assert_eq!(oversized.limit, default.limit);
    assert_eq!(oversized.results, default.results);

    let garbage = get_page("?limit=abc&page=-2").await;
    assert_eq!(garbage.limit, 20);
    assert_eq!(garbage.page, 1);

    proxy.stop();
}

#[tokio::test]
async fn upstream_status_is_mirrored_on_listing_failure() {
    let (upstream, stop_upstream) = spawn(Router::new().route(
        "/pokemon",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    ))
    .await;
    let (proxy, stop_proxy) = start_proxy(upstream, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("http://{proxy}/api/pokemon")).await.unwrap();
    assert_eq!(resp.status(), 503);
    let envelope: ErrorEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope.error.message, MSG_LIST_FAILED);
    assert_eq!(envelope.error.status_code, 503);

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn malformed_upstream_json_is_500() {
    let (upstream, stop_upstream) = spawn(Router::new().route(
        "/pokemon/{name}",
        get(|| async { ([("content-type", "application/json")], "{not json") }),
    ))
    .await;
    let (proxy, stop_proxy) = start_proxy(upstream, Duration::from_secs(5)).await;

    let resp = reqwest::get(format!("http://{proxy}/api/pokemon/pikachu"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let envelope: ErrorEnvelope = resp.json().await.unwrap();
    assert_eq!(
        envelope.error.message,
        "Error al obtener los datos del Pok\u{e9}mon. Int\u{e9}ntalo m\u{e1}s tarde."
    );

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn slow_detail_times_out_with_504() {
    let (upstream, stop_upstream) = spawn(Router::new().route(
        "/pokemon/{name}",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            PIKACHU
        }),
    ))
    .await;
    let (proxy, stop_proxy) = start_proxy(upstream, Duration::from_millis(100)).await;

    let resp = reqwest::get(format!("http://{proxy}/api/pokemon/pikachu"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 504);

    let _ = stop_proxy.send(());
    let _ = stop_upstream.send(());
}

#[tokio::test]
async fn detail_timeout_closes_the_upstream_connection() {
    let (upstream, closed) = silent_upstream().await;
    let (proxy, stop_proxy) = start_proxy(upstream, Duration::from_millis(200)).await;

    let resp = reqwest::get(format!("http://{proxy}/api/pokemon/pikachu"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 504);

    // The upstream never answers, so only an aborted request ends the connection.
    let held = tokio::time::timeout(Duration::from_secs(3), closed)
        .await
        .expect("upstream connection still open after the deadline")
        .unwrap();
    assert!(held < Duration::from_secs(3));

    let _ = stop_proxy.send(());
}

#[tokio::test]
async fn listing_timeout_is_504_and_closes_the_upstream_connection() {
    let (upstream, closed) = silent_upstream().await;
    let (proxy, stop_proxy) = start_proxy(upstream, Duration::from_millis(200)).await;

    let started = Instant::now();
    let resp = reqwest::get(format!("http://{proxy}/api/pokemon?limit=5"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 504);
    assert!(started.elapsed() < Duration::from_secs(2));

    let envelope: ErrorEnvelope = resp.json().await.unwrap();
    assert_eq!(envelope.error.message, MSG_LIST_FAILED);
    assert_eq!(envelope.error.status_code, 504);

    let held = tokio::time::timeout(Duration::from_secs(3), closed)
        .await
        .expect("upstream connection still open after the deadline")
        .unwrap();
    assert!(held < Duration::from_secs(3));

    let _ = stop_proxy.send(());
}

#[tokio::test]
async fn unreachable_upstream_is_502() {
    // Bind then drop to obtain a port with nothing listening.
    let closed = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (proxy, stop_proxy) = start_proxy(closed, Duration::from_secs(2)).await;

    let resp = reqwest::get(format!("http://{proxy}/api/pokemon?page=2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);

    let _ = stop_proxy.send(());
}

#[tokio::test]
async fn api_client_reads_pages_and_details() {
    let proxy = StubbedProxy::start().await;
    let client = ApiClient::new(&proxy.url("/"));

    let page = client.list(2, 5).await.unwrap();
    assert_eq!(page.page, 2);
    assert_eq!(page.results[0].id, 6);

    let detail = client.pokemon("pikachu").await.unwrap();
    assert_eq!(detail["id"], 25);

    match client.pokemon("missingno").await {
        Err(PokeProxyError::Api { status, message }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(message.starts_with("Pok\u{e9}mon no encontrado"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(proxy.hits.load(Ordering::SeqCst), 3);

    proxy.stop();
}
