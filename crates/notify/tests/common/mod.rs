#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use tokio::net::TcpListener;
use wxnotice_core::notify::error::NotifyError;
use wxnotice_notify::email::MailSession;

/// 中继收到的一次请求
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

pub type Requests = Arc<Mutex<Vec<RecordedRequest>>>;

#[derive(Clone)]
struct RelayState {
    requests: Requests,
    status: StatusCode,
    body: String,
}

async fn record(
    State(state): State<RelayState>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_string(),
        query,
    });
    (state.status, state.body.clone())
}

// 帮助函数：在随机端口启动一个固定应答的中继服务，记录所有收到的请求
pub async fn spawn_relay(status: StatusCode, body: &str) -> (String, Requests) {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));
    let state = RelayState {
        requests: requests.clone(),
        status,
        body: body.to_string(),
    };
    let router = Router::new().fallback(record).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, requests)
}

// 帮助函数：启动一个在 `delay` 之后才应答的中继服务，用于触发客户端超时
pub async fn spawn_stalling_relay(delay: Duration, body: &str) -> String {
    let body = body.to_string();
    let router = Router::new().fallback(move || {
        let body = body.clone();
        async move {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, body)
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// 一个必然拒绝连接的地址
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// 记录每次投递的邮件会话
#[derive(Clone, Default)]
pub struct RecordingSession {
    pub sent: Arc<Mutex<Vec<(Vec<String>, String, String)>>>,
}

#[async_trait]
impl MailSession for RecordingSession {
    async fn send_mail(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_vec(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// 每次投递都返回传输错误的邮件会话
pub struct FailingSession;

#[async_trait]
impl MailSession for FailingSession {
    async fn send_mail(
        &self,
        _to: &[String],
        _subject: &str,
        _body: &str,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Network(
            "SMTP error: Connection refused (os error 111)".to_string(),
        ))
    }
}
