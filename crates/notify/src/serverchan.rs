use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use wxnotice_core::config::{HttpConfig, SERVERCHAN_BASE_URL, ServerChanConfig};
use wxnotice_core::notify::entity::{MessageContent, normalize_title, resolve_single};
use wxnotice_core::notify::error::NotifyError;
use wxnotice_core::notify::port::Notifier;

use crate::http::{NETWORK_FAILED, build_client, transport_error};

/// 标题最大字符数，超出部分截断。
pub const MAX_TITLE_CHARS: usize = 256;

const MISSING_KEY: &str = "sckey 不能为空！";
const INVALID_KEY: &str = "sckey 格式非法";
const PARSE_FAILED: &str = "响应解析失败";

/// # Summary
/// Server 酱通知渠道：以 sckey 为凭据，通过一次 GET 请求推送到微信。
///
/// # Invariants
/// * 请求地址为 `{base_url}/{sckey}.send`，sckey 不写入日志。
/// * 标题至多 256 个字符。
pub struct ServerChanNotifier {
    /// 默认 sckey，可被每次调用的 `receivers` 覆盖
    sckey: Option<String>,
    /// 接口根地址
    base_url: String,
    /// 复用的 HTTP 客户端
    client: Client,
}

/// # Summary
/// Server 酱响应体，同时兼容旧版 `errno/errmsg` 与新版 `code/message` 字段名。
#[derive(Deserialize, Debug)]
struct ServerChanReply {
    #[serde(alias = "code")]
    errno: i64,
    #[serde(default, alias = "message")]
    errmsg: String,
}

impl ServerChanNotifier {
    /// # Summary
    /// 使用官方接口地址创建 `ServerChanNotifier`。
    ///
    /// # Arguments
    /// * `sckey` - 默认 sckey，可为空，届时每次发送必须通过 `receivers` 提供。
    ///
    /// # Returns
    /// * 新实例或 `NotifyError::Config`。
    pub fn new(sckey: Option<String>) -> Result<Self, NotifyError> {
        Self::from_config(
            &ServerChanConfig {
                sckey,
                base_url: SERVERCHAN_BASE_URL.to_string(),
            },
            &HttpConfig::default(),
        )
    }

    /// # Summary
    /// 根据配置创建 `ServerChanNotifier`。
    ///
    /// # Logic
    /// 1. 按 `http.timeout_secs` 构建 HTTP 客户端，0 表示不设超时。
    /// 2. 记录默认 sckey 与接口根地址。
    ///
    /// # Arguments
    /// * `config` - Server 酱渠道配置。
    /// * `http` - HTTP 客户端配置。
    ///
    /// # Returns
    /// * 新实例或 `NotifyError::Config`。
    pub fn from_config(config: &ServerChanConfig, http: &HttpConfig) -> Result<Self, NotifyError> {
        Ok(Self {
            sckey: config.sckey.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: build_client(Duration::from_secs(http.timeout_secs))?,
        })
    }

    /// # Summary
    /// 替换接口根地址 (自建转发或测试)。
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, sckey: &str) -> String {
        format!("{}/{}.send", self.base_url, sckey)
    }
}

/// sckey 作为 URL 路径段拼接，只允许字母、数字与 `_`、`-`。
fn is_valid_sckey(sckey: &str) -> bool {
    sckey
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[async_trait]
impl Notifier for ServerChanNotifier {
    fn name(&self) -> &'static str {
        "serverchan"
    }

    /// # Summary
    /// 推送一条 Server 酱消息。
    ///
    /// # Logic
    /// 1. 解析 sckey：`receivers` 优先，其次默认值，均缺失则返回 `MissingKey`；
    ///    含路径或查询分隔符等非法字符时返回 `Config`。
    /// 2. 规范化标题：空白替换为 "无标题"，超长截断到 256 个字符。
    /// 3. 发起 GET 请求，参数为 `text` 与 `desp`。
    /// 4. 非 200 视为网络失败；响应无法解析或 `errno != 0` 视为平台拒绝。
    ///
    /// # Arguments
    /// * `title` - 消息标题。
    /// * `content` - 消息内容，支持 Markdown，结构化内容渲染为多行文本。
    /// * `receivers` - 覆盖默认 sckey。
    ///
    /// # Returns
    /// * `Ok(())` 表示平台返回 `errno == 0`。
    async fn deliver(
        &self,
        title: &str,
        content: &MessageContent,
        receivers: &[String],
    ) -> Result<(), NotifyError> {
        let sckey = resolve_single(receivers, self.sckey.as_deref())
            .ok_or_else(|| NotifyError::MissingKey(MISSING_KEY.to_string()))?;
        if !is_valid_sckey(sckey) {
            return Err(NotifyError::Config(INVALID_KEY.to_string()));
        }
        let title = normalize_title(title, Some(MAX_TITLE_CHARS));
        let desp = content.render_text();

        tracing::debug!("[serverchan] sending \"{}\"", title);
        let response = self
            .client
            .get(self.endpoint(sckey))
            .query(&[("text", title.as_str()), ("desp", desp.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() != StatusCode::OK {
            tracing::debug!("[serverchan] HTTP {}", response.status());
            return Err(NotifyError::Network(NETWORK_FAILED.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(transport_error)?;
        let reply: ServerChanReply = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("[serverchan] unexpected reply {:?}: {}", body, e);
            NotifyError::Rejected(PARSE_FAILED.to_string())
        })?;

        if reply.errno != 0 {
            return Err(NotifyError::Rejected(reply.errmsg));
        }
        Ok(())
    }
}
