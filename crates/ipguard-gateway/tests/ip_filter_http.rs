//! Drives the router in-process and checks the HTTP contract of the filter.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use ipguard_core::policy::{Evaluator, PolicyConfig};
use ipguard_gateway::{app_state::AppState, config, context::ClientAddrs, router};

const STANDARD: &str = r#"
version: 1
ip_filter:
  allowed_ips: ["192.168.1.100", "10.0.0.0/24", "2001:db8::/32"]
"#;

fn state(yaml: &str) -> AppState {
    AppState::new(&config::load_from_str(yaml).unwrap()).unwrap()
}

fn request(path: &str, peer: Option<&str>, xff: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().uri(path);
    if let Some(v) = xff {
        b = b.header("x-forwarded-for", v);
    }
    let mut req = b.body(Body::empty()).unwrap();
    if let Some(p) = peer {
        let addr: SocketAddr = p.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
    }
    req
}

async fn call(state: AppState, req: Request<Body>) -> (StatusCode, String) {
    let resp = router::build_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn exact_peer_reaches_handler() {
    let req = request("/", Some("192.168.1.100:1234"), None);
    let (status, body) = call(state(STANDARD), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello world");
}

#[tokio::test]
async fn range_peers_reach_handler() {
    let (status, _) = call(state(STANDARD), request("/", Some("10.0.0.50:1234"), None)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(state(STANDARD), request("/", Some("[2001:db8::1]:1234"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unlisted_peer_is_forbidden() {
    let req = request("/", Some("192.168.1.101:1234"), None);
    let (status, body) = call(state(STANDARD), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "Forbidden access");
}

#[tokio::test]
async fn forwarded_header_is_honored() {
    let req = request("/", Some("1.2.3.4:1234"), Some("192.168.1.100, 1.2.3.4"));
    let (status, body) = call(state(STANDARD), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello world");
}

#[tokio::test]
async fn forwarded_header_ignored_when_untrusted() {
    let yaml = r#"
version: 1
ip_filter:
  allowed_ips: ["192.168.1.100"]
  trust_forwarded_header: false
"#;
    let req = request("/", Some("1.2.3.4:1234"), Some("192.168.1.100"));
    let (status, _) = call(state(yaml), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn no_peer_and_garbage_header_is_forbidden() {
    let req = request("/", None, Some("not.an.ip.address"));
    let (status, body) = call(state(STANDARD), req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "Forbidden access");
}

#[tokio::test]
async fn empty_allowlist_denies() {
    let yaml = "version: 1\nip_filter:\n  allowed_ips: []\n";
    let (status, _) = call(state(yaml), request("/", Some("192.168.1.1:80"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bad_cidr_entry_keeps_exact_entry_working() {
    let yaml = r#"
version: 1
ip_filter:
  allowed_ips: ["192.168.1.100", "invalid.cidr/24"]
"#;
    let (status, _) = call(state(yaml), request("/", Some("192.168.1.100:80"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bypass_path_skips_matching() {
    let yaml = r#"
version: 1
ip_filter:
  allowed_ips: []
  bypass_paths: ["/healthz"]
"#;
    let (status, body) = call(state(yaml), request("/healthz", Some("8.8.8.8:80"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = call(state(yaml), request("/", Some("8.8.8.8:80"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn custom_bypass_predicate() {
    let policy: PolicyConfig<ClientAddrs> = PolicyConfig::new(Vec::<String>::new())
        .with_bypass(|ctx: &ClientAddrs| ctx.primary.starts_with("127."));
    let st = AppState::with_evaluator(Evaluator::compile(policy), None);

    let (status, _) = call(st.clone(), request("/", Some("127.0.0.1:9000"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(st, request("/", Some("10.1.1.1:9000"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn first_colon_mode_over_http() {
    let yaml = r#"
version: 1
ip_filter:
  allowed_ips: ["2001:db8::/32", "10.0.0.0/24"]
  port_strip: first_colon
"#;
    // peer IP is rendered without a port, so the bare v6 form is truncated
    let (status, _) = call(state(yaml), request("/", Some("[2001:db8::1]:443"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(state(yaml), request("/", None, Some("10.0.0.1:5555"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn denied_peer_gets_403_on_unknown_path() {
    let yaml = "version: 1\nip_filter:\n  allowed_ips: []\n";
    for path in ["/nope", "/admin"] {
        let (status, body) = call(state(yaml), request(path, Some("8.8.8.8:80"), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(body, "Forbidden access");
    }
}

#[tokio::test]
async fn allowed_peer_still_sees_404_on_unknown_path() {
    let (status, _) = call(state(STANDARD), request("/nope", Some("10.0.0.1:80"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
