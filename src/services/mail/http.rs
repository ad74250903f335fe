use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use super::MailTransport;

/// Sends mail through an HTTP mail API (form post with basic auth), using the
/// account user as the sender address.
pub struct HttpMailer {
    api_url: String,
    user: String,
    password: String,
    client: reqwest::Client,
}

/// Upper bound on one mail API call, connect included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl HttpMailer {
    pub fn new(api_url: String, user: String, password: String) -> anyhow::Result<Self> {
        Self::with_timeout(api_url, user, password, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_url: String,
        user: String,
        password: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build mail HTTP client")?;
        Ok(Self {
            api_url,
            user,
            password,
            client,
        })
    }
}

#[async_trait]
impl MailTransport for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.user.is_empty() && !self.password.is_empty(),
            "email credentials not configured"
        );
        anyhow::ensure!(!self.api_url.is_empty(), "email API URL not configured");

        self.client
            .post(&self.api_url)
            .basic_auth(&self.user, Some(&self.password))
            .form(&[
                ("from", self.user.as_str()),
                ("to", to),
                ("subject", subject),
                ("text", body),
            ])
            .send()
            .await
            .context("failed to reach mail API")?
            .error_for_status()
            .context("mail API returned error")?;

        Ok(())
    }
}
