//! Shared helpers for integration tests.

use async_trait::async_trait;
use jobnotify::core::{Notification, TopicPublisher};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

/// A mock publisher that records every publish instead of sending it.
#[derive(Clone, Debug, Default)]
pub struct MockPublisher {
    published: Arc<Mutex<Vec<(String, Notification)>>>,
    fail: Arc<AtomicBool>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent publish call fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// A test helper to get the notifications that were "published".
    pub fn published(&self) -> Vec<(String, Notification)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl TopicPublisher for MockPublisher {
    async fn publish(&self, topic: &str, notification: &Notification) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("simulated delivery failure");
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), notification.clone()));
        Ok(())
    }
}
