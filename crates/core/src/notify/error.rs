use thiserror::Error;

use crate::notify::entity::FailureKind;

/// # Summary
/// 通知服务错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 每个变体携带的字符串即面向调用方的失败原因，`reason()` 原样返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// 调用方与配置均未提供接收者 (邮箱、openid)
    #[error("Missing recipient: {0}")]
    MissingRecipient(String),

    /// 调用方与配置均未提供推送密钥 (sckey)
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// 网络连接、传输错误或非 200 响应
    #[error("Network error: {0}")]
    Network(String),

    /// 推送平台明确返回的错误 (如 errno != 0)
    #[error("Rejected by backend: {0}")]
    Rejected(String),

    /// 配置错误 (如 SMTP 主机或邮箱地址非法)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotifyError {
    /// # Summary
    /// 返回不带分类前缀的失败原因。
    ///
    /// # Arguments
    /// * None
    ///
    /// # Returns
    /// * 变体内部携带的原因文本。
    pub fn reason(&self) -> &str {
        match self {
            NotifyError::MissingRecipient(msg)
            | NotifyError::MissingKey(msg)
            | NotifyError::Network(msg)
            | NotifyError::Rejected(msg)
            | NotifyError::Config(msg) => msg,
        }
    }

    /// # Summary
    /// 将错误映射为对外暴露的失败分类。
    ///
    /// # Arguments
    /// * None
    ///
    /// # Returns
    /// * 对应的 `FailureKind`。
    pub fn kind(&self) -> FailureKind {
        match self {
            NotifyError::MissingRecipient(_) => FailureKind::MissingRecipient,
            NotifyError::MissingKey(_) => FailureKind::MissingKey,
            NotifyError::Network(_) => FailureKind::NetworkFailure,
            NotifyError::Rejected(_) => FailureKind::BackendRejected,
            NotifyError::Config(_) => FailureKind::Misconfigured,
        }
    }
}
