use crate::notify::entity::{MessageContent, NoticeResult};
use crate::notify::error::NotifyError;
use async_trait::async_trait;

/// # Summary
/// 发送通知到外部系统的接口定义。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持并发调用。
/// - 每次 `send` 至多发起一次外部调用，校验失败时不发起调用。
/// - `send` 永远返回 `NoticeResult`，任何传输错误都不会越过此边界。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Summary
    /// 渠道名称，用于日志。
    fn name(&self) -> &'static str;

    /// # Summary
    /// 执行一次投递。
    ///
    /// # Logic
    /// 1. 解析接收者，缺失时直接返回错误。
    /// 2. 根据目标平台要求格式化消息。
    /// 3. 通过底层传输协议发送消息并映射响应。
    ///
    /// # Arguments
    /// * `title` - 通知标题。
    /// * `content` - 通知正文。
    /// * `receivers` - 覆盖默认接收者，空切片表示使用构造时的配置。
    ///
    /// # Returns
    /// * 成功返回 `Ok(())`。
    /// * 失败返回 `Err(NotifyError)`。
    async fn deliver(
        &self,
        title: &str,
        content: &MessageContent,
        receivers: &[String],
    ) -> Result<(), NotifyError>;

    /// # Summary
    /// 发送通知并返回统一的结果结构。
    ///
    /// # Logic
    /// 1. 调用 `deliver`。
    /// 2. 记录投递结果日志。
    /// 3. 将 `Result` 转换为新构造的 `NoticeResult`。
    ///
    /// # Arguments
    /// * `title` - 通知标题。
    /// * `content` - 通知正文。
    /// * `receivers` - 覆盖默认接收者。
    ///
    /// # Returns
    /// * `NoticeResult`，失败时 `msg` 为失败原因。
    async fn send(
        &self,
        title: &str,
        content: &MessageContent,
        receivers: &[String],
    ) -> NoticeResult {
        let outcome = self.deliver(title, content, receivers).await;
        match &outcome {
            Ok(()) => tracing::info!("[{}] 通知发送成功", self.name()),
            Err(e) => tracing::warn!("[{}] 通知发送失败: {}", self.name(), e),
        }
        NoticeResult::from(outcome)
    }
}
