//! Core domain types and service traits for JobNotify
//!
//! This module defines the fundamental data structures and trait contracts
//! that govern component interactions throughout the application.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sentinel shown in place of an exit code the event did not carry.
pub const EXIT_CODE_UNKNOWN: &str = "N/A";
/// Sentinel shown in place of a status reason the event did not carry.
pub const STATUS_REASON_UNKNOWN: &str = "Unknown";

/// A job status-change event as emitted by the job-scheduling service.
///
/// The event is consumed, not owned: unknown fields are ignored, but the
/// required fields must be present or deserialization fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobStatusEvent {
    /// Region the job ran in, interpolated into the log-console link.
    pub region: String,
    /// ISO 8601 timestamp of the status change, passed through verbatim.
    pub time: String,
    /// Job-specific details.
    pub detail: JobDetail,
}

/// The nested `detail` object of a job status-change event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    /// Raw status string, e.g. "SUCCEEDED" or "FAILED".
    pub status: String,
    /// Human-readable job name.
    pub job_name: String,
    /// Unique job identifier.
    pub job_id: String,
    /// Why the job ended up in this status. Only present on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    /// Container-level details, if the scheduler reported any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerDetail>,
}

/// Container-level details of a finished job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// The closed set of outcomes a status string maps to.
///
/// The upstream scheduler may grow new status values; anything that is not
/// recognized is kept distinct from `Failed` so the handler can flag it
/// instead of silently treating it as a known failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
    Unrecognized,
}

impl JobOutcome {
    pub fn from_status(status: &str) -> Self {
        match status {
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            _ => Self::Unrecognized,
        }
    }
}

impl JobStatusEvent {
    pub fn outcome(&self) -> JobOutcome {
        JobOutcome::from_status(&self.detail.status)
    }

    /// The container exit code as display text, or `"N/A"` when absent.
    pub fn exit_code_label(&self) -> String {
        self.detail
            .container
            .as_ref()
            .and_then(|c| c.exit_code)
            .map(|code| code.to_string())
            .unwrap_or_else(|| EXIT_CODE_UNKNOWN.to_string())
    }

    /// The status reason, or `"Unknown"` when the event did not carry one.
    pub fn status_reason_label(&self) -> &str {
        self.detail
            .status_reason
            .as_deref()
            .unwrap_or(STATUS_REASON_UNKNOWN)
    }
}

/// A rendered notification: an email subject line and a multi-line body.
///
/// Plain text with embedded newlines; discarded once the publish call
/// returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

// =============================================================================
// Service Traits
// =============================================================================

/// Renders a job status-change event into a notification.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, event: &JobStatusEvent) -> Notification;
}

/// Publishes notifications to the fan-out delivery service.
#[async_trait]
pub trait TopicPublisher: Send + Sync {
    /// Publishes a notification to the given topic.
    ///
    /// # Returns
    /// * `Ok(())` once the delivery service acknowledged the publish
    /// * `Err` if the service rejected the call or was unreachable
    async fn publish(&self, topic: &str, notification: &Notification) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(JobOutcome::from_status("SUCCEEDED"), JobOutcome::Succeeded);
        assert_eq!(JobOutcome::from_status("FAILED"), JobOutcome::Failed);
        assert_eq!(JobOutcome::from_status("RUNNING"), JobOutcome::Unrecognized);
        assert_eq!(JobOutcome::from_status("CANCELLED"), JobOutcome::Unrecognized);
        assert_eq!(JobOutcome::from_status(""), JobOutcome::Unrecognized);
    }

    #[test]
    fn test_full_event_parses() {
        let event: JobStatusEvent = serde_json::from_value(json!({
            "region": "us-east-1",
            "time": "2024-01-01T00:00:00Z",
            "detail": {
                "status": "SUCCEEDED",
                "jobName": "job-42",
                "jobId": "abc-123",
                "container": { "exitCode": 0 }
            }
        }))
        .unwrap();

        assert_eq!(event.region, "us-east-1");
        assert_eq!(event.detail.job_name, "job-42");
        assert_eq!(event.detail.job_id, "abc-123");
        assert_eq!(event.outcome(), JobOutcome::Succeeded);
        assert_eq!(event.exit_code_label(), "0");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let event: JobStatusEvent = serde_json::from_value(json!({
            "region": "eu-west-1",
            "time": "2024-01-01T00:00:00Z",
            "account": "123456789012",
            "detail-type": "Batch Job State Change",
            "detail": {
                "status": "FAILED",
                "jobName": "job-7",
                "jobId": "def-456",
                "statusReason": "Essential container in task exited",
                "jobQueue": "arn:aws:batch:eu-west-1:123456789012:job-queue/default"
            }
        }))
        .unwrap();

        assert_eq!(event.outcome(), JobOutcome::Failed);
        assert_eq!(
            event.status_reason_label(),
            "Essential container in task exited"
        );
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        // No jobName: the event must be rejected, never partially defaulted.
        let result = serde_json::from_value::<JobStatusEvent>(json!({
            "region": "us-east-1",
            "time": "2024-01-01T00:00:00Z",
            "detail": { "status": "SUCCEEDED", "jobId": "abc-123" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_sentinels_for_absent_optional_fields() {
        let event: JobStatusEvent = serde_json::from_value(json!({
            "region": "us-east-1",
            "time": "2024-01-01T00:00:00Z",
            "detail": { "status": "FAILED", "jobName": "j", "jobId": "i" }
        }))
        .unwrap();

        assert_eq!(event.exit_code_label(), EXIT_CODE_UNKNOWN);
        assert_eq!(event.status_reason_label(), STATUS_REASON_UNKNOWN);

        // An empty container object carries no exit code either.
        let event: JobStatusEvent = serde_json::from_value(json!({
            "region": "us-east-1",
            "time": "2024-01-01T00:00:00Z",
            "detail": { "status": "FAILED", "jobName": "j", "jobId": "i", "container": {} }
        }))
        .unwrap();
        assert_eq!(event.exit_code_label(), EXIT_CODE_UNKNOWN);
    }
}
