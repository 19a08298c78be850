mod common;

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use common::{UNREACHABLE, spawn_relay, spawn_stalling_relay};
use wxnotice_core::config::{HttpConfig, ServerChanConfig};
use wxnotice_core::notify::entity::{DEFAULT_TITLE, FailureKind, MessageContent};
use wxnotice_core::notify::port::Notifier;
use wxnotice_notify::serverchan::{MAX_TITLE_CHARS, ServerChanNotifier};

const OK_REPLY: &str = r#"{"errno":0,"errmsg":""}"#;

fn notifier(sckey: Option<&str>, base_url: &str) -> ServerChanNotifier {
    ServerChanNotifier::new(sckey.map(str::to_string))
        .unwrap()
        .with_base_url(base_url)
}

#[tokio::test]
async fn test_send_success() {
    let (base_url, requests) = spawn_relay(StatusCode::OK, OK_REPLY).await;
    let notifier = notifier(Some("SCT123"), &base_url);

    let result = notifier
        .send("服务器告警", &MessageContent::from("CPU 使用率 95%"), &[])
        .await;

    assert!(result.is_success(), "unexpected failure: {:?}", result);
    assert_eq!(result.msg(), "");

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/SCT123.send");
    assert_eq!(requests[0].query["text"], "服务器告警");
    assert_eq!(requests[0].query["desp"], "CPU 使用率 95%");
}

#[tokio::test]
async fn test_receivers_override_default_key() {
    let (base_url, requests) = spawn_relay(StatusCode::OK, OK_REPLY).await;
    let notifier = notifier(Some("SCT_DEFAULT"), &base_url);

    let result = notifier
        .send("t", &MessageContent::from("c"), &["SCT_OTHER".to_string()])
        .await;

    assert!(result.is_success());
    assert_eq!(requests.lock().unwrap()[0].path, "/SCT_OTHER.send");
}

#[tokio::test]
async fn test_missing_key_makes_no_request() {
    let (base_url, requests) = spawn_relay(StatusCode::OK, OK_REPLY).await;
    let notifier = notifier(None, &base_url);

    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(!result.is_success());
    assert_eq!(result.msg(), "sckey 不能为空！");
    assert_eq!(result.kind(), Some(FailureKind::MissingKey));
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_long_title_truncated_to_256_chars() {
    let (base_url, requests) = spawn_relay(StatusCode::OK, OK_REPLY).await;
    let notifier = notifier(Some("SCT123"), &base_url);
    let title = "a".repeat(300);

    let result = notifier.send(&title, &MessageContent::default(), &[]).await;

    assert!(result.is_success());
    let sent = requests.lock().unwrap()[0].query["text"].clone();
    assert_eq!(sent.chars().count(), MAX_TITLE_CHARS);
    assert_eq!(sent, "a".repeat(256));
}

#[tokio::test]
async fn test_blank_title_replaced() {
    let (base_url, requests) = spawn_relay(StatusCode::OK, OK_REPLY).await;
    let notifier = notifier(Some("SCT123"), &base_url);

    let result = notifier.send("   ", &MessageContent::from("c"), &[]).await;

    assert!(result.is_success());
    assert_eq!(requests.lock().unwrap()[0].query["text"], DEFAULT_TITLE);
}

#[tokio::test]
async fn test_backend_error_message_returned() {
    let (base_url, _requests) =
        spawn_relay(StatusCode::OK, r#"{"errno":1,"errmsg":"invalid key"}"#).await;
    let notifier = notifier(Some("SCT123"), &base_url);

    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(!result.is_success());
    assert_eq!(result.msg(), "invalid key");
    assert_eq!(result.kind(), Some(FailureKind::BackendRejected));
}

#[tokio::test]
async fn test_current_api_schema_accepted() {
    let (base_url, _requests) = spawn_relay(
        StatusCode::OK,
        r#"{"code":0,"message":"","data":{"pushid":"1","readkey":"x"}}"#,
    )
    .await;
    let notifier = notifier(Some("SCT123"), &base_url);

    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(result.is_success());
}

#[tokio::test]
async fn test_malformed_reply_is_rejected() {
    let (base_url, _requests) = spawn_relay(StatusCode::OK, "<html>oops</html>").await;
    let notifier = notifier(Some("SCT123"), &base_url);

    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(!result.is_success());
    assert_eq!(result.msg(), "响应解析失败");
    assert_eq!(result.kind(), Some(FailureKind::BackendRejected));
}

#[tokio::test]
async fn test_non_200_is_network_failure() {
    let (base_url, _requests) = spawn_relay(StatusCode::BAD_GATEWAY, OK_REPLY).await;
    let notifier = notifier(Some("SCT123"), &base_url);

    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(!result.is_success());
    assert_eq!(result.msg(), "网络请求失败");
    assert_eq!(result.kind(), Some(FailureKind::NetworkFailure));
}

#[tokio::test]
async fn test_connection_refused_is_caught() {
    let notifier = notifier(Some("SCT123"), UNREACHABLE);

    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(!result.is_success());
    assert!(!result.msg().is_empty());
    assert_eq!(result.kind(), Some(FailureKind::NetworkFailure));
}

#[tokio::test]
async fn test_failure_message_never_contains_sckey() {
    let notifier = notifier(Some("SCTSECRET42"), UNREACHABLE);

    let result = notifier
        .send("t", &MessageContent::from("机密内容"), &[])
        .await;

    assert!(!result.is_success());
    assert!(!result.msg().is_empty());
    assert!(!result.msg().contains("SCTSECRET42"), "leaked: {}", result.msg());
}

#[tokio::test]
async fn test_slow_relay_times_out() {
    let base_url = spawn_stalling_relay(Duration::from_secs(5), OK_REPLY).await;
    let notifier = ServerChanNotifier::from_config(
        &ServerChanConfig {
            sckey: Some("SCT123".to_string()),
            base_url,
        },
        &HttpConfig { timeout_secs: 1 },
    )
    .unwrap();

    let started = Instant::now();
    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(!result.is_success());
    assert!(!result.msg().is_empty());
    assert_eq!(result.kind(), Some(FailureKind::NetworkFailure));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_zero_timeout_means_no_timeout() {
    let (base_url, requests) = spawn_relay(StatusCode::OK, OK_REPLY).await;
    let notifier = ServerChanNotifier::from_config(
        &ServerChanConfig {
            sckey: Some("SCT123".to_string()),
            base_url,
        },
        &HttpConfig { timeout_secs: 0 },
    )
    .unwrap();

    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(result.is_success(), "unexpected failure: {:?}", result);
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_key_with_path_characters_rejected() {
    let (base_url, requests) = spawn_relay(StatusCode::OK, OK_REPLY).await;
    let notifier = notifier(Some("SCT123"), &base_url);

    for key in ["../admin", "SCT1?text=x", "SCT1#x", "a/b"] {
        let result = notifier
            .send("t", &MessageContent::from("c"), &[key.to_string()])
            .await;
        assert!(!result.is_success());
        assert_eq!(result.msg(), "sckey 格式非法");
        assert_eq!(result.kind(), Some(FailureKind::Misconfigured));
    }
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_error_code_without_message_reports_unknown() {
    let (base_url, _requests) = spawn_relay(StatusCode::OK, r#"{"errno":5}"#).await;
    let notifier = notifier(Some("SCT123"), &base_url);

    let result = notifier.send("t", &MessageContent::from("c"), &[]).await;

    assert!(!result.is_success());
    assert_eq!(result.msg(), "未知");
    assert_eq!(result.kind(), Some(FailureKind::BackendRejected));
}
