//! The notification handler: parse an event, render it, publish it.
//!
//! The topic identifier, formatter, and publisher client are constructed
//! once at startup and injected here; the handler holds no global state.

use crate::core::{JobOutcome, JobStatusEvent, MessageFormatter, TopicPublisher};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors a single invocation can surface. Nothing is caught or retried
/// locally; the ingress layer decides how to report them.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The inbound payload is missing required fields or is otherwise not a
    /// job status-change event.
    #[error("malformed job status event: {0}")]
    InvalidEvent(#[from] serde_json::Error),
    /// The delivery service rejected or failed the publish call.
    #[error("failed to publish notification: {0}")]
    Delivery(#[source] anyhow::Error),
}

/// The handler's acknowledgement, serialized as `{"statusCode": 200}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Formats job status-change events and dispatches them to the topic.
pub struct NotificationHandler {
    topic: String,
    formatter: Box<dyn MessageFormatter>,
    publisher: Arc<dyn TopicPublisher>,
}

impl NotificationHandler {
    pub fn new(
        topic: String,
        formatter: Box<dyn MessageFormatter>,
        publisher: Arc<dyn TopicPublisher>,
    ) -> Self {
        Self {
            topic,
            formatter,
            publisher,
        }
    }

    /// Parses a raw JSON payload and handles it.
    ///
    /// Parsing happens before anything else: a malformed event never
    /// reaches the publisher.
    pub async fn handle_value(&self, payload: Value) -> Result<HandlerResponse, HandlerError> {
        let event: JobStatusEvent = serde_json::from_value(payload)?;
        self.handle(&event).await
    }

    /// Renders the event and publishes exactly one notification.
    ///
    /// The success response is only reached once the delivery service has
    /// acknowledged the publish; any failure propagates to the caller.
    pub async fn handle(&self, event: &JobStatusEvent) -> Result<HandlerResponse, HandlerError> {
        metrics::counter!("events_received").increment(1);

        if event.outcome() == JobOutcome::Unrecognized {
            metrics::counter!("unrecognized_status").increment(1);
            warn!(
                status = %event.detail.status,
                job_id = %event.detail.job_id,
                "Unrecognized job status, sending failure-style notification"
            );
        }

        let notification = self.formatter.format(event);
        self.publisher
            .publish(&self.topic, &notification)
            .await
            .map_err(|e| {
                metrics::counter!("publish_failures").increment(1);
                HandlerError::Delivery(e)
            })?;

        metrics::counter!("notifications_published").increment(1);
        info!(
            job_name = %event.detail.job_name,
            job_id = %event.detail.job_id,
            status = %event.detail.status,
            "Published job status notification"
        );

        Ok(HandlerResponse { status_code: 200 })
    }
}
