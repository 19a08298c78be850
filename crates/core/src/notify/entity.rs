use std::collections::BTreeMap;

use serde::Serialize;

use crate::notify::error::NotifyError;

/// 标题为空时使用的默认标题。
pub const DEFAULT_TITLE: &str = "无标题";

/// 失败原因为空时使用的兜底文本。
pub const UNKNOWN_REASON: &str = "未知";

/// # Summary
/// 对外暴露的失败分类，与 `NotifyError` 的变体一一对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// 未提供接收者
    MissingRecipient,
    /// 未提供推送密钥
    MissingKey,
    /// 传输层失败或非 200 响应
    NetworkFailure,
    /// 推送平台拒绝
    BackendRejected,
    /// 配置或参数非法
    Misconfigured,
}

/// # Summary
/// 单次发送的结果，序列化形态为 `{"isSuccess": bool, "msg": string}`。
///
/// # Invariants
/// - `is_success == true` 时 `msg` 必为空串。
/// - `is_success == false` 时 `msg` 必非空，空原因会被替换为 `"未知"`。
/// - 每次调用都构造新的值，调用方拿到后不可修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeResult {
    is_success: bool,
    msg: String,
    #[serde(skip)]
    kind: Option<FailureKind>,
}

impl NoticeResult {
    /// # Summary
    /// 构造成功结果。
    pub fn success() -> Self {
        Self {
            is_success: true,
            msg: String::new(),
            kind: None,
        }
    }

    /// # Summary
    /// 构造失败结果。
    ///
    /// # Arguments
    /// * `kind` - 失败分类。
    /// * `msg` - 失败原因，空白时替换为 `"未知"`。
    ///
    /// # Returns
    /// * `is_success == false` 的结果。
    pub fn failure(kind: FailureKind, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let msg = if msg.trim().is_empty() {
            UNKNOWN_REASON.to_string()
        } else {
            msg
        };
        Self {
            is_success: false,
            msg,
            kind: Some(kind),
        }
    }

    /// # Summary
    /// 是否发送成功。
    ///
    /// # Returns
    /// * 成功为 `true`，此时 `msg()` 为空串。
    pub fn is_success(&self) -> bool {
        self.is_success
    }

    /// # Summary
    /// 失败原因。
    ///
    /// # Returns
    /// * 成功时为空串，失败时非空。
    pub fn msg(&self) -> &str {
        &self.msg
    }

    /// # Summary
    /// 失败分类。
    ///
    /// # Returns
    /// * 成功时为 `None`，失败时为对应的 `FailureKind`。
    pub fn kind(&self) -> Option<FailureKind> {
        self.kind
    }
}

impl From<NotifyError> for NoticeResult {
    fn from(err: NotifyError) -> Self {
        NoticeResult::failure(err.kind(), err.reason())
    }
}

impl From<Result<(), NotifyError>> for NoticeResult {
    fn from(result: Result<(), NotifyError>) -> Self {
        match result {
            Ok(()) => NoticeResult::success(),
            Err(err) => err.into(),
        }
    }
}

/// # Summary
/// 消息正文：纯文本或结构化的键值对。
///
/// # Invariants
/// - `Fields` 使用有序映射，保证渲染与请求参数顺序稳定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// 纯文本 (可为 Markdown)
    Text(String),
    /// 键值对形式的表单字段
    Fields(BTreeMap<String, String>),
}

impl MessageContent {
    /// # Summary
    /// 渲染为纯文本，供只接受字符串正文的渠道 (邮件、Server 酱) 使用。
    ///
    /// # Logic
    /// 1. `Text` 原样返回。
    /// 2. `Fields` 渲染为逐行的 `key: value`。
    pub fn render_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Fields(fields) => fields
                .iter()
                .map(|(k, v)| format!("{}: {}", k, v))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// # Summary
    /// 转换为表单字段，纯文本包装在 `text_key` 之下。
    ///
    /// # Arguments
    /// * `text_key` - 包装纯文本时使用的键名。
    ///
    /// # Returns
    /// * 字段映射；`Fields` 原样返回，不附加包装键。
    pub fn to_fields(&self, text_key: &str) -> BTreeMap<String, String> {
        match self {
            MessageContent::Text(text) => {
                BTreeMap::from([(text_key.to_string(), text.clone())])
            }
            MessageContent::Fields(fields) => fields.clone(),
        }
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<BTreeMap<String, String>> for MessageContent {
    fn from(fields: BTreeMap<String, String>) -> Self {
        MessageContent::Fields(fields)
    }
}

/// JSON 字符串成为 `Text`，对象成为 `Fields`，其余类型字符串化后成为 `Text`。
impl From<serde_json::Value> for MessageContent {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => MessageContent::Text(text),
            serde_json::Value::Object(map) => MessageContent::Fields(
                map.into_iter()
                    .map(|(k, v)| {
                        let v = match v {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        };
                        (k, v)
                    })
                    .collect(),
            ),
            other => MessageContent::Text(other.to_string()),
        }
    }
}

/// # Summary
/// 标题规范化。
///
/// # Logic
/// 1. 空白标题替换为 `"无标题"`。
/// 2. 给定 `max_chars` 且字符数达到上限时，按字符截断到前 `max_chars` 个。
///
/// # Arguments
/// * `title` - 原始标题。
/// * `max_chars` - 可选的字符数上限。
///
/// # Returns
/// * 规范化后的标题。
pub fn normalize_title(title: &str, max_chars: Option<usize>) -> String {
    if title.trim().is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    match max_chars {
        Some(limit) => title.chars().take(limit).collect(),
        None => title.to_string(),
    }
}

/// # Summary
/// 解析单值接收者：取第一个非空白项，否则回退到默认值。
///
/// # Arguments
/// * `receivers` - 调用方传入的覆盖值。
/// * `default` - 构造时配置的默认值。
///
/// # Returns
/// * 最终使用的接收者；二者皆空时为 `None`。
pub fn resolve_single<'a>(receivers: &'a [String], default: Option<&'a str>) -> Option<&'a str> {
    receivers
        .iter()
        .map(|r| r.trim())
        .find(|r| !r.is_empty())
        .or_else(|| default.map(str::trim).filter(|d| !d.is_empty()))
}
