//! # `wxnotice-core` - 领域模型与端口
//!
//! 定义通知发送的统一契约 (`Notifier`)、结果结构 (`NoticeResult`)、
//! 错误分类 (`NotifyError`) 以及全局配置结构。具体渠道实现位于 `wxnotice-notify`。

pub mod config;
pub mod notify;
