use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// Outbound transactional mail. Injected as a trait object so flows never
/// touch the transport directly.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: String) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from = config.from.parse::<Mailbox>()?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html_body: String) -> anyhow::Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body)?;
        self.transport.send(email).await?;
        Ok(())
    }
}

pub const VERIFICATION_SUBJECT: &str = "Verify your email";
pub const RESET_SUBJECT: &str = "Password Reset Link";

pub fn verification_email(name: &str, link: &str) -> String {
    format!(
        "<p>Hello {name},</p><p>Click the link to verify your account:</p>\
         <a href=\"{link}\">{link}</a>"
    )
}

pub fn reset_email(link: &str) -> String {
    format!("<p>Click the link to reset your password: <a href=\"{link}\">{link}</a></p>")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_email_embeds_the_link_and_greets_by_name() {
        let body = verification_email("Ada", "http://localhost:8080/verify/abc123");
        assert!(body.contains("Hello Ada"));
        assert!(body.contains("href=\"http://localhost:8080/verify/abc123\""));
    }

    #[test]
    fn reset_email_embeds_the_link() {
        let body = reset_email("http://localhost:8080/reset-password/tok");
        assert!(body.contains("href=\"http://localhost:8080/reset-password/tok\""));
        assert!(body.contains("reset your password"));
    }
}
