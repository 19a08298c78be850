use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wxnotice_core::config::NoticeConfig;
use wxnotice_core::notify::entity::MessageContent;
use wxnotice_notify::factory::build_notifiers;

/// 未设置 `WXNOTICE_CONFIG` 时读取的配置文件
const DEFAULT_CONFIG_PATH: &str = "wxnotice.toml";

/// # Summary
/// 加载配置：可选的 TOML 文件叠加 `WXNOTICE__` 前缀的环境变量。
///
/// # Logic
/// 1. 读取 `WXNOTICE_CONFIG` 指定的文件，缺省为 `wxnotice.toml`，文件不存在时跳过。
/// 2. 叠加环境变量，`__` 作为层级分隔符，例如 `WXNOTICE__SERVERCHAN__SCKEY`。
/// 3. `WXNOTICE__EMAIL__TO` 按逗号拆分为列表。
///
/// # Returns
/// * 反序列化后的 `NoticeConfig`。
fn load_config() -> Result<NoticeConfig, config::ConfigError> {
    let path =
        std::env::var("WXNOTICE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    config::Config::builder()
        .add_source(config::File::with_name(&path).required(false))
        .add_source(
            config::Environment::with_prefix("WXNOTICE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("email.to"),
        )
        .build()?
        .try_deserialize()
}

/// JSON 对象作为结构化正文，其余原样作为纯文本。
fn parse_content(raw: String) -> MessageContent {
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(value @ serde_json::Value::Object(_)) => MessageContent::from(value),
        _ => MessageContent::Text(raw),
    }
}

/// # Summary
/// 命令行入口：`wxnotice <title> [content]`。
///
/// # Logic
/// 1. 初始化全局日志，默认级别 info，可由 `RUST_LOG` 覆盖。
/// 2. 加载配置并构建所有已启用的渠道。
/// 3. 依次向每个渠道发送同一条消息并记录结果。
/// 4. 未配置任何渠道或任一渠道失败时以非零状态退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(title) = args.next() else {
        error!("用法: wxnotice <title> [content]");
        return Err("missing title".into());
    };
    let content = parse_content(args.next().unwrap_or_default());

    // 2. 加载配置并构建渠道
    let config = load_config()?;
    let notifiers = build_notifiers(&config)?;
    if notifiers.is_empty() {
        error!("未配置任何通知渠道，请检查 {} 或 WXNOTICE__* 环境变量", DEFAULT_CONFIG_PATH);
        return Err("no channel configured".into());
    }

    // 3. 逐个渠道发送
    let mut failed = 0usize;
    for notifier in &notifiers {
        let result = notifier.send(&title, &content, &[]).await;
        if !result.is_success() {
            failed += 1;
        }
        info!("{} => {}", notifier.name(), serde_json::to_string(&result)?);
    }

    if failed > 0 {
        return Err(format!("{} of {} channel(s) failed", failed, notifiers.len()).into());
    }
    Ok(())
}
