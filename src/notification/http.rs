//! An HTTP client for publishing notifications to the fan-out topic.

use crate::core::{Notification, TopicPublisher};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::task;
use tracing::{error, info, instrument};

/// Publishes notifications over the delivery service's HTTP bridge.
pub struct HttpPublisher {
    endpoint_url: String,
    timeout: std::time::Duration,
}

impl HttpPublisher {
    /// Creates a new `HttpPublisher` pointed at the bridge endpoint.
    pub fn new(endpoint_url: String, timeout: std::time::Duration) -> Self {
        Self {
            endpoint_url,
            timeout,
        }
    }

    /// Sends the request in a blocking manner.
    fn send_request(
        client: &reqwest::blocking::Client,
        endpoint_url: &str,
        payload: &Value,
    ) -> anyhow::Result<()> {
        let response = client.post(endpoint_url).json(payload).send();

        match response {
            Ok(res) => {
                if res.status().is_success() {
                    Ok(())
                } else {
                    let status = res.status();
                    let text = res.text().unwrap_or_default();
                    error!(
                        status = %status,
                        body = %text,
                        "Delivery service rejected the publish"
                    );
                    anyhow::bail!(
                        "failed to publish notification: status {}, body: {}",
                        status,
                        text
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "HTTP request to delivery service failed");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl TopicPublisher for HttpPublisher {
    /// Publishes a single subject/message pair to the configured topic.
    #[instrument(skip(self, notification))]
    async fn publish(&self, topic: &str, notification: &Notification) -> anyhow::Result<()> {
        let payload = json!({
            "topic": topic,
            "subject": notification.subject,
            "message": notification.body,
        });

        let endpoint_url = self.endpoint_url.clone();
        let timeout = self.timeout;
        let result = task::spawn_blocking(move || {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()?;
            Self::send_request(&client, &endpoint_url, &payload)
        })
        .await;

        match result {
            Ok(Ok(())) => {
                info!("Notification published to topic.");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(e) => {
                error!(error = %e, "Publish task failed");
                Err(e.into())
            }
        }
    }
}
