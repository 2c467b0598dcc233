//! Mailer backed by the Resend HTTP API.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::ports::mailer::MailerPort;
use crate::infra::mail::template;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
    from_email: String,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, from_email: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            from_email: from_email.into(),
        }
    }
}

#[async_trait]
impl MailerPort for ResendMailer {
    async fn send_invitation(
        &self,
        recipient_email: &str,
        inviter_name: &str,
        accept_url: &str,
        decline_url: &str,
    ) -> Result<(), DomainError> {
        let subject = template::invite_email_subject(inviter_name);
        let html = template::invite_email_html(inviter_name, accept_url, decline_url);
        let body = SendEmailRequest {
            from: &self.from_email,
            to: recipient_email,
            subject: &subject,
            html: &html,
        };

        let resp = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::notification(format!("mail provider unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            debug!(%status, %detail, "mail provider rejected send");
            return Err(DomainError::notification(format!(
                "mail provider returned {status}"
            )));
        }
        Ok(())
    }
}
