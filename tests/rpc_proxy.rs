//! RPC endpoint behaviour through a running proxy.

use serde_json::{json, Value};

mod common;

const RPC: &str = "/transmission/rpc";

async fn post_rpc(addr: std::net::SocketAddr, body: impl Into<reqwest::Body>) -> (u16, Value) {
    let res = common::client()
        .post(format!("http://{addr}{RPC}"))
        .header("x-transmission-session-id", "session-1")
        .body(body)
        .send()
        .await
        .expect("Proxy unreachable");
    let status = res.status().as_u16();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn test_unknown_method_is_not_forwarded() {
    let (upstream, log) = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::proxy_config(upstream, true)).await;

    let (status, body) =
        post_rpc(proxy, json!({"method": "session-evil", "tag": 4}).to_string()).await;

    assert_eq!(status, 400);
    assert_eq!(body["tag"], 4);
    assert!(body["result"].as_str().unwrap().starts_with("Unknown method"));
    assert!(log.lock().unwrap().is_empty(), "upstream must not be called");

    shutdown.trigger();
}

#[tokio::test]
async fn test_forbidden_location_is_not_forwarded() {
    let (upstream, log) = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::proxy_config(upstream, true)).await;

    let (status, body) = post_rpc(
        proxy,
        json!({
            "method": "torrent-set",
            "arguments": {"ids": [1], "location": "/etc/passwd"}
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, 400);
    assert!(body.get("tag").is_none());
    assert!(body["result"].as_str().unwrap().starts_with("Forbidden location"));
    assert!(log.lock().unwrap().is_empty(), "upstream must not be called");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_argument_is_dropped() {
    let (upstream, log) = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::proxy_config(upstream, false)).await;

    let (status, body) = post_rpc(
        proxy,
        json!({
            "method": "torrent-set",
            "arguments": {
                "ids": [1],
                "location": "/downloads/movies",
                "peer-port-random-on-start": true
            },
            "tag": 12
        })
        .to_string(),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["result"], "success");

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].uri.path(), RPC);
    assert_eq!(
        log[0].json(),
        json!({
            "method": "torrent-set",
            "arguments": {"ids": [1], "location": "/downloads/movies"},
            "tag": 12
        })
    );
    let content_length: usize = log[0].headers["content-length"].to_str().unwrap().parse().unwrap();
    assert_eq!(content_length, log[0].body.len());

    shutdown.trigger();
}

#[tokio::test]
async fn test_session_set_is_forwarded_unchanged() {
    let (upstream, log) = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::proxy_config(upstream, false)).await;

    let request = json!({
        "method": "session-set",
        "arguments": {
            "download-dir": "/downloads/complete",
            "speed-limit-up": 50,
            "speed-limit-up-enabled": true
        },
        "tag": 3
    });
    let (status, _) = post_rpc(proxy, request.to_string()).await;

    assert_eq!(status, 200);
    let log = log.lock().unwrap();
    assert_eq!(log[0].json(), request);
    assert_eq!(log[0].headers["x-transmission-session-id"], "session-1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_null_tag_is_treated_as_absent() {
    let (upstream, log) = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::proxy_config(upstream, true)).await;

    let (status, _) = post_rpc(proxy, r#"{"method":"session-get","tag":null}"#).await;
    assert_eq!(status, 200);
    assert_eq!(log.lock().unwrap()[0].json(), json!({"method": "session-get"}));

    let (status, body) = post_rpc(proxy, r#"{"method":null,"tag":6}"#).await;
    assert_eq!(status, 400);
    assert_eq!(body["tag"], 6);
    assert!(body["result"].as_str().unwrap().starts_with("Unknown method"));
    assert_eq!(log.lock().unwrap().len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_headers_are_relayed() {
    let (upstream, _log) = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::proxy_config(upstream, false)).await;

    let res = common::client()
        .post(format!("http://{proxy}{RPC}"))
        .body(json!({"method": "session-stats"}).to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-transmission-session-id"], "session-1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_debug_mode_wrong_type() {
    let (upstream, log) = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::proxy_config(upstream, true)).await;

    let (status, body) = post_rpc(
        proxy,
        json!({"method": "torrent-set", "arguments": {"location": 123}, "tag": 8}).to_string(),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["tag"], 8);
    let result = body["result"].as_str().unwrap();
    assert!(result.starts_with("Must be string"), "{result}");
    assert!(result.contains("argument: location"));
    assert!(log.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_json_is_bad_request_in_both_modes() {
    let (upstream, log) = common::start_mock_upstream().await;

    for debug_mode in [true, false] {
        let (proxy, shutdown) =
            common::start_proxy(common::proxy_config(upstream, debug_mode)).await;

        let res = common::client()
            .post(format!("http://{proxy}{RPC}"))
            .body("{\"method\": ")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 400);
        assert_eq!(res.headers()["content-type"], "application/json");
        assert_eq!(res.headers()["x-content-type-options"], "nosniff");

        let body: Value = res.json().await.unwrap();
        let result = body["result"].as_str().unwrap();
        if debug_mode {
            assert!(result.starts_with("Cannot unmarshal RPC request"), "{result}");
        } else {
            assert!(result.starts_with("Unknown error occurred"), "{result}");
        }

        shutdown.trigger();
    }

    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_production_errors_have_distinct_ids() {
    let (upstream, _log) = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::proxy_config(upstream, false)).await;

    let (_, first) = post_rpc(proxy, json!({"method": "nope"}).to_string()).await;
    let (_, second) = post_rpc(
        proxy,
        json!({"method": "torrent-add", "arguments": {"download-dir": "/tmp/"}}).to_string(),
    )
    .await;

    let first = first["result"].as_str().unwrap().to_string();
    let second = second["result"].as_str().unwrap().to_string();
    assert!(first.contains("Error ID: "));
    assert_ne!(first, second);
    assert!(!second.contains("/tmp/"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_size_limit() {
    let (upstream, log) = common::start_mock_upstream().await;
    let mut config = common::proxy_config(upstream, false);
    config.limits.max_rpc_body_bytes = 64;
    let (proxy, shutdown) = common::start_proxy(config).await;

    let huge = json!({"method": "torrent-add", "arguments": {"metainfo": "A".repeat(1024)}});
    let (status, _) = post_rpc(proxy, huge.to_string()).await;

    assert_eq!(status, 400);
    assert!(log.lock().unwrap().is_empty());

    shutdown.trigger();
}
