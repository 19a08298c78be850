//! # `wxnotice-notify` - 通知渠道实现
//!
//! 实现 `wxnotice_core::notify::port::Notifier` 的三个渠道：
//! - [`email::EmailNotifier`]：SMTP 邮件
//! - [`serverchan::ServerChanNotifier`]：Server 酱，按 sckey 推送到微信
//! - [`niucodata::NiucodataNotifier`]：推了噜，按 openid 推送表单消息到微信

pub mod email;
pub mod factory;
pub mod niucodata;
pub mod serverchan;

mod http;
