use wxnotice_core::config::NoticeConfig;
use wxnotice_core::notify::error::NotifyError;
use wxnotice_core::notify::port::Notifier;

use crate::email::EmailNotifier;
use crate::niucodata::NiucodataNotifier;
use crate::serverchan::ServerChanNotifier;

/// # Summary
/// 根据配置构建全部已启用的通知渠道。
///
/// # Logic
/// 1. 依次检查 email、serverchan、niucodata 配置段。
/// 2. 为每个存在的配置段构建对应的 `Notifier`。
///
/// # Arguments
/// * `config` - 全局配置。
///
/// # Returns
/// * 渠道列表，顺序固定为 email、serverchan、niucodata；任一渠道构建失败则返回 `NotifyError::Config`。
pub fn build_notifiers(config: &NoticeConfig) -> Result<Vec<Box<dyn Notifier>>, NotifyError> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();

    if let Some(email) = &config.email {
        notifiers.push(Box::new(EmailNotifier::new(email)?));
    }
    if let Some(serverchan) = &config.serverchan {
        notifiers.push(Box::new(ServerChanNotifier::from_config(
            serverchan,
            &config.http,
        )?));
    }
    if let Some(niucodata) = &config.niucodata {
        notifiers.push(Box::new(NiucodataNotifier::from_config(
            niucodata,
            &config.http,
        )?));
    }

    tracing::debug!("built {} notifier(s)", notifiers.len());
    Ok(notifiers)
}
