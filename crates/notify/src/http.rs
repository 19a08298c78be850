use std::time::Duration;

use reqwest::Client;
use wxnotice_core::notify::error::NotifyError;

/// 非 200 响应的统一失败原因。
pub(crate) const NETWORK_FAILED: &str = "网络请求失败";

/// # Summary
/// 构建中继渠道共用的 HTTP 客户端。
///
/// # Logic
/// 1. reqwest 以 `rustls-no-provider` 方式编译，首次使用前安装 ring 作为进程级 crypto provider。
/// 2. 超时非零时配置单次请求超时，为零表示不设超时。
/// 3. 构建客户端。
///
/// # Arguments
/// * `timeout` - 单次请求超时。
///
/// # Returns
/// * 成功返回 `Client`，失败返回 `NotifyError::Config`。
pub(crate) fn build_client(timeout: Duration) -> Result<Client, NotifyError> {
    if rustls::crypto::CryptoProvider::get_default().is_none()
        && rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
    {
        // 并发安装时另一方已成功
        tracing::debug!("rustls crypto provider already installed");
    }

    let mut builder = Client::builder();
    if !timeout.is_zero() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| NotifyError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// # Summary
/// 将传输层错误映射为 `NotifyError::Network`。
///
/// # Logic
/// 1. 去掉错误中携带的请求 URL，URL 中含 sckey、openid 与消息内容。
///
/// # Arguments
/// * `err` - reqwest 错误。
///
/// # Returns
/// * 不含 URL 的网络错误。
pub(crate) fn transport_error(err: reqwest::Error) -> NotifyError {
    NotifyError::Network(err.without_url().to_string())
}
