use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use wxnotice_core::config::{HttpConfig, NIUCODATA_URL, NiucodataConfig};
use wxnotice_core::notify::entity::{MessageContent, normalize_title, resolve_single};
use wxnotice_core::notify::error::NotifyError;
use wxnotice_core::notify::port::Notifier;

use crate::http::{NETWORK_FAILED, build_client, transport_error};

/// 纯文本正文在表单中的键名。
pub const BODY_KEY: &str = "正文";

/// 平台受理成功时响应体中包含的标记。
const SUCCESS_MARKER: &str = "提交成功";

const MISSING_OPENID: &str = "openid 不能为空！";
const REQUEST_FAILED: &str = "请求失败";

/// # Summary
/// 推了噜通知渠道：以 openid 指定接收者，通过一次 GET 请求把表单推送到微信。
///
/// # Invariants
/// * 标题不做长度截断。
/// * 结构化正文的字段原样并入查询参数，与 `title`/`openid` 同名时覆盖后者。
pub struct NiucodataNotifier {
    /// 默认 openid，可被每次调用的 `receivers` 覆盖
    openid: Option<String>,
    /// 接口地址
    url: String,
    client: Client,
}

impl NiucodataNotifier {
    /// # Summary
    /// 使用官方接口地址创建 `NiucodataNotifier`。
    ///
    /// # Arguments
    /// * `openid` - 默认接收者，可为空。
    pub fn new(openid: Option<String>) -> Result<Self, NotifyError> {
        Self::from_config(
            &NiucodataConfig {
                openid,
                base_url: NIUCODATA_URL.to_string(),
            },
            &HttpConfig::default(),
        )
    }

    /// # Summary
    /// 根据配置创建 `NiucodataNotifier`。
    ///
    /// # Logic
    /// 1. 按 `http.timeout_secs` 构建 HTTP 客户端，0 表示不设超时。
    /// 2. 记录默认 openid 与接口地址。
    ///
    /// # Arguments
    /// * `config` - 推了噜渠道配置。
    /// * `http` - HTTP 客户端配置。
    ///
    /// # Returns
    /// * 新实例或 `NotifyError::Config`。
    pub fn from_config(config: &NiucodataConfig, http: &HttpConfig) -> Result<Self, NotifyError> {
        Ok(Self {
            openid: config.openid.clone(),
            url: config.base_url.clone(),
            client: build_client(Duration::from_secs(http.timeout_secs))?,
        })
    }

    /// # Summary
    /// 替换接口地址 (测试或自建转发)。
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

/// # Summary
/// 组装查询参数。
///
/// # Logic
/// 1. 先放入 `title` 与 `openid`。
/// 2. 纯文本正文包装为 `{"正文": text}`，结构化正文原样使用。
/// 3. 逐个并入字段，同名键覆盖已有值。
fn build_params(title: String, openid: &str, content: &MessageContent) -> Vec<(String, String)> {
    let mut params = vec![
        ("title".to_string(), title),
        ("openid".to_string(), openid.to_string()),
    ];
    for (key, value) in content.to_fields(BODY_KEY) {
        match params.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => params.push((key, value)),
        }
    }
    params
}

#[async_trait]
impl Notifier for NiucodataNotifier {
    fn name(&self) -> &'static str {
        "niucodata"
    }

    /// # Summary
    /// 推送一条推了噜表单消息。
    ///
    /// # Logic
    /// 1. 解析 openid，缺失返回 `MissingRecipient`。
    /// 2. 空白标题替换为 "无标题"。
    /// 3. 组装参数并发起 GET 请求。
    /// 4. 非 200 视为网络失败；响应体含 "提交成功" 视为成功，否则为 "请求失败"。
    async fn deliver(
        &self,
        title: &str,
        content: &MessageContent,
        receivers: &[String],
    ) -> Result<(), NotifyError> {
        let openid = resolve_single(receivers, self.openid.as_deref())
            .ok_or_else(|| NotifyError::MissingRecipient(MISSING_OPENID.to_string()))?;
        let params = build_params(normalize_title(title, None), openid, content);

        tracing::debug!("[niucodata] sending {} params", params.len());
        let response = self
            .client
            .get(&self.url)
            .query(&params)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() != StatusCode::OK {
            tracing::debug!("[niucodata] HTTP {}", response.status());
            return Err(NotifyError::Network(NETWORK_FAILED.to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(transport_error)?;
        if body.contains(SUCCESS_MARKER) {
            Ok(())
        } else {
            tracing::debug!("[niucodata] unexpected reply {:?}", body);
            Err(NotifyError::Rejected(REQUEST_FAILED.to_string()))
        }
    }
}
