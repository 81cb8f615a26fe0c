//! studyhub-mailer — Mail transport implementations.
//!
//! The core only knows the `Mailer` trait; this crate provides the
//! config-driven dev transport and a scriptable mock for tests. Delivery is
//! best-effort by contract: a send reports success or failure and the caller
//! counts, it never propagates.

pub mod config;
pub mod mock;

pub use config::{load_config, load_config_from, MailConfig};
pub use mock::MockMailer;

use async_trait::async_trait;

use studyhub_core::traits::Mailer;

/// Development transport: logs every message instead of speaking SMTP.
///
/// Mirrors the configured-server guard of a real transport: with no mail
/// server set, every send reports failure, so fan-out counts stay honest in
/// environments without mail.
pub struct LogMailer {
    config: MailConfig,
}

impl LogMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> bool {
        if self.config.server.is_empty() || to.is_empty() {
            return false;
        }
        tracing::info!(
            to,
            subject,
            from = %self.config.from_email,
            server = %self.config.server,
            bytes = body.len(),
            "mail delivered (log transport)"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sends_succeed_when_server_configured() {
        let mailer = LogMailer::new(MailConfig {
            server: "smtp.example.edu".into(),
            ..Default::default()
        });
        assert!(mailer.send("a@x.edu", "hi", "body").await);
    }

    #[tokio::test]
    async fn sends_fail_without_server_or_recipient() {
        let unconfigured = LogMailer::new(MailConfig::default());
        assert!(!unconfigured.send("a@x.edu", "hi", "body").await);

        let configured = LogMailer::new(MailConfig {
            server: "smtp.example.edu".into(),
            ..Default::default()
        });
        assert!(!configured.send("", "hi", "body").await);
    }
}
