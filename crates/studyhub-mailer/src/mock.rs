//! Mock mailer for testing fan-out behavior.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use studyhub_core::traits::Mailer;

/// A sent message captured by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// A mock mail transport that records every send and can be scripted to
/// fail for specific recipients.
#[derive(Default)]
pub struct MockMailer {
    /// Recipients whose sends report failure.
    failing: HashSet<String>,
    /// Number of send calls made.
    call_count: AtomicU32,
    /// Every message that reported success.
    sent: Mutex<Vec<SentMail>>,
}

impl MockMailer {
    /// A mock where every send succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that fails sends to the given recipients.
    pub fn failing_for<I, S>(recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing: recipients.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Total send calls, successes and failures alike.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Messages that reported success, in send order.
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> bool {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(to) {
            return false;
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        true
    }
}
