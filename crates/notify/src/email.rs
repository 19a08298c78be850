use async_trait::async_trait;
use lettre::message::{Mailbox, Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use wxnotice_core::config::{EmailConfig, SmtpSecurity};
use wxnotice_core::notify::entity::MessageContent;
use wxnotice_core::notify::error::NotifyError;
use wxnotice_core::notify::port::Notifier;

const MISSING_MAILBOX: &str = "请输入要发送的邮箱";

/// # Summary
/// 邮件会话能力：把一封邮件投递给一组收件人。
///
/// # Invariants
/// - 一次调用对应一封邮件，全部收件人位于同一信封。
/// - 所有错误以 `NotifyError` 返回，不得 panic。
#[async_trait]
pub trait MailSession: Send + Sync {
    async fn send_mail(&self, to: &[String], subject: &str, body: &str)
    -> Result<(), NotifyError>;
}

/// # Summary
/// 基于 lettre 异步 SMTP 传输的邮件会话。
///
/// # Invariants
/// - `AsyncSmtpTransport` 在多次发送之间复用。
pub struct SmtpSession {
    /// 异步 SMTP 传输
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    /// 发件人
    from: Mailbox,
}

impl SmtpSession {
    /// # Summary
    /// 根据配置建立 SMTP 会话 (不立即连接)。
    ///
    /// # Logic
    /// 1. 按 `security` 选择隐式 TLS、STARTTLS 或明文传输，并设置端口。
    /// 2. `user` 非空时附加认证凭据。
    /// 3. 解析发件人地址，缺省为 `user`。
    ///
    /// # Arguments
    /// * `config` - 邮件渠道配置。
    ///
    /// # Returns
    /// * 新会话或 `NotifyError::Config`。
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let builder = match config.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| NotifyError::Config(format!("Invalid SMTP host: {}", e)))?,
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| NotifyError::Config(format!("Invalid SMTP host: {}", e)))?
            }
            SmtpSecurity::Plain => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        }
        .port(config.port());

        let mailer = if config.user.is_empty() {
            builder.build()
        } else {
            builder
                .credentials(Credentials::new(
                    config.user.clone(),
                    config.password.clone(),
                ))
                .build()
        };

        let from = config
            .sender()
            .parse()
            .map_err(|e| NotifyError::Config(format!("Invalid from address: {}", e)))?;

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl MailSession for SmtpSession {
    /// # Summary
    /// 构建纯文本邮件并通过 SMTP 发送。
    ///
    /// # Logic
    /// 1. 逐个解析收件人地址。
    /// 2. 构建 `text/plain` 邮件。
    /// 3. 发送；服务器明确拒绝 (4xx/5xx) 视为平台拒绝，其余视为网络错误。
    async fn send_mail(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let mut builder = Message::builder().from(self.from.clone());
        for address in to {
            let mailbox: Mailbox = address.parse().map_err(|e| {
                NotifyError::Config(format!("Invalid to address {}: {}", address, e))
            })?;
            builder = builder.to(mailbox);
        }

        let email = builder
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Config(format!("Failed to build email: {}", e)))?;

        self.mailer.send(email).await.map_err(|e| {
            if e.is_permanent() || e.is_transient() {
                NotifyError::Rejected(format!("SMTP error: {}", e))
            } else {
                NotifyError::Network(format!("SMTP error: {}", e))
            }
        })?;

        Ok(())
    }
}

/// # Summary
/// 邮件通知渠道。
///
/// # Invariants
/// - 默认收件人列表在构造后不可变。
/// - 底层会话的任何错误都会被转换为失败结果，不会传播给调用方。
pub struct EmailNotifier {
    session: Box<dyn MailSession>,
    /// 默认收件人
    to_emails: Vec<String>,
}

impl EmailNotifier {
    /// # Summary
    /// 根据配置创建 SMTP 邮件渠道。
    ///
    /// # Arguments
    /// * `config` - 主机、账号、密码及默认收件人。
    ///
    /// # Returns
    /// * 新实例或 `NotifyError::Config`。
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        Ok(Self::with_session(
            SmtpSession::new(config)?,
            config.to.clone(),
        ))
    }

    /// # Summary
    /// 使用自定义邮件会话创建渠道。
    pub fn with_session(session: impl MailSession + 'static, to_emails: Vec<String>) -> Self {
        Self {
            session: Box::new(session),
            to_emails,
        }
    }

    /// 非空白的 `receivers` 优先，其次默认收件人。
    fn resolve_recipients(&self, receivers: &[String]) -> Vec<String> {
        let pick = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|r| r.trim())
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect()
        };
        let overrides = pick(receivers);
        if overrides.is_empty() {
            pick(&self.to_emails)
        } else {
            overrides
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    /// # Summary
    /// 发送一封通知邮件。
    ///
    /// # Logic
    /// 1. 解析收件人，均缺失时返回 `MissingRecipient`，不发起连接。
    /// 2. 以标题为主题、正文渲染为纯文本，交给邮件会话发送。
    async fn deliver(
        &self,
        title: &str,
        content: &MessageContent,
        receivers: &[String],
    ) -> Result<(), NotifyError> {
        let recipients = self.resolve_recipients(receivers);
        if recipients.is_empty() {
            return Err(NotifyError::MissingRecipient(MISSING_MAILBOX.to_string()));
        }

        tracing::debug!("[email] sending to {} recipient(s)", recipients.len());
        self.session
            .send_mail(&recipients, title, &content.render_text())
            .await
    }
}
