use serde::{Deserialize, Serialize};

/// Server 酱默认接口地址，最终请求地址为 `{base_url}/{sckey}.send`。
pub const SERVERCHAN_BASE_URL: &str = "https://sctapi.ftqq.com";

/// 推了噜默认接口地址。
pub const NIUCODATA_URL: &str = "https://m.niucodata.com/yo";

/// # Summary
/// 全局应用配置，未出现的渠道视为未启用。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    pub http: HttpConfig,
    pub email: Option<EmailConfig>,
    pub serverchan: Option<ServerChanConfig>,
    pub niucodata: Option<NiucodataConfig>,
}

/// # Summary
/// 中继渠道共用的 HTTP 客户端配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 单次 HTTP 请求超时 (秒)，0 表示不设超时
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// # Summary
/// SMTP 连接的加密方式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// 隐式 TLS (SMTPS)
    #[default]
    Tls,
    /// 明文连接后升级 TLS
    StartTls,
    /// 不加密，仅用于本地中继或测试
    Plain,
}

impl SmtpSecurity {
    /// # Summary
    /// 加密方式对应的默认端口：465 / 587 / 25。
    pub fn default_port(self) -> u16 {
        match self {
            SmtpSecurity::Tls => 465,
            SmtpSecurity::StartTls => 587,
            SmtpSecurity::Plain => 25,
        }
    }
}

/// # Summary
/// 邮件渠道配置。
///
/// # Invariants
/// - `from` 缺省时使用 `user` 作为发件人。
/// - `Debug` 输出中不包含密码。
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub host: String,
    /// 缺省时按 `security` 取默认端口
    pub port: Option<u16>,
    pub security: SmtpSecurity,
    pub user: String,
    pub password: String,
    pub from: Option<String>,
    /// 默认收件人列表
    pub to: Vec<String>,
}

impl EmailConfig {
    /// # Summary
    /// 实际使用的 SMTP 端口。
    ///
    /// # Returns
    /// * 显式配置的 `port`，缺省时为 `security` 对应的默认端口。
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.security.default_port())
    }

    /// # Summary
    /// 发件人地址。
    ///
    /// # Returns
    /// * `from`，缺省时为 `user`。
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.user)
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("user", &self.user)
            .field("password", &"***")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

/// # Summary
/// Server 酱渠道配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerChanConfig {
    /// 默认 sckey，可在每次发送时覆盖
    pub sckey: Option<String>,
    pub base_url: String,
}

impl Default for ServerChanConfig {
    fn default() -> Self {
        Self {
            sckey: None,
            base_url: SERVERCHAN_BASE_URL.to_string(),
        }
    }
}

/// # Summary
/// 推了噜渠道配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NiucodataConfig {
    /// 默认 openid，可在每次发送时覆盖
    pub openid: Option<String>,
    pub base_url: String,
}

impl Default for NiucodataConfig {
    fn default() -> Self {
        Self {
            openid: None,
            base_url: NIUCODATA_URL.to_string(),
        }
    }
}
