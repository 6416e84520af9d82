// src/formatting.rs

use crate::config::LinksConfig;
use crate::core::{JobOutcome, JobStatusEvent, MessageFormatter, Notification};

/// Renders job status events into plain-text email notifications with the
/// line breaks already in place for the delivery service.
pub struct EmailFormatter {
    links: LinksConfig,
}

impl EmailFormatter {
    pub fn new(links: LinksConfig) -> Self {
        Self { links }
    }

    /// Deep link into the log console, scoped to the configured log group.
    fn console_log_url(&self, region: &str) -> String {
        format!(
            "https://console.aws.amazon.com/cloudwatch/home?region={}#logsV2:log-groups/log-group/{}",
            region,
            encode_log_group(&self.links.log_group)
        )
    }

    /// CLI one-liner to re-query the job status.
    fn describe_jobs_hint(&self, event: &JobStatusEvent) -> String {
        format!(
            "aws batch describe-jobs --jobs {} --region {}",
            event.detail.job_id, event.region
        )
    }

    fn success_notification(&self, event: &JobStatusEvent) -> Notification {
        let subject = format!("✅ Batch Job Completed: {}", event.detail.job_name);
        let body = format!(
            "✅ Batch Job Completed Successfully\n\
             \n\
             Job Name: {job_name}\n\
             Job ID: {job_id}\n\
             Status: {status}\n\
             Exit Code: {exit_code}\n\
             Region: {region}\n\
             Completed At: {time}\n\
             \n\
             View logs:\n\
             {log_url}\n\
             \n\
             Check job status:\n\
             {status_cmd}\n",
            job_name = event.detail.job_name,
            job_id = event.detail.job_id,
            status = event.detail.status,
            exit_code = event.exit_code_label(),
            region = event.region,
            time = event.time,
            log_url = self.console_log_url(&event.region),
            status_cmd = self.describe_jobs_hint(event),
        );
        Notification { subject, body }
    }

    fn failure_notification(&self, event: &JobStatusEvent) -> Notification {
        let subject = format!("❌ Batch Job Failed: {}", event.detail.job_name);
        let body = format!(
            "❌ Batch Job Failed\n\
             \n\
             Job Name: {job_name}\n\
             Job ID: {job_id}\n\
             Status: {status}\n\
             Exit Code: {exit_code}\n\
             Reason: {reason}\n\
             Region: {region}\n\
             Failed At: {time}\n\
             \n\
             View logs:\n\
             {log_url}\n\
             \n\
             Check job status:\n\
             {status_cmd}\n\
             \n\
             Troubleshooting:\n\
             {troubleshooting_url}\n",
            job_name = event.detail.job_name,
            job_id = event.detail.job_id,
            status = event.detail.status,
            exit_code = event.exit_code_label(),
            reason = event.status_reason_label(),
            region = event.region,
            time = event.time,
            log_url = self.console_log_url(&event.region),
            status_cmd = self.describe_jobs_hint(event),
            troubleshooting_url = self.links.troubleshooting_url,
        );
        Notification { subject, body }
    }
}

impl MessageFormatter for EmailFormatter {
    fn format(&self, event: &JobStatusEvent) -> Notification {
        match event.outcome() {
            JobOutcome::Succeeded => self.success_notification(event),
            // Unrecognized statuses get the failure rendition as a
            // best-effort notification; the handler flags them separately.
            JobOutcome::Failed | JobOutcome::Unrecognized => self.failure_notification(event),
        }
    }
}

/// Encodes a log-group path for the console URL fragment, where each slash
/// must appear double-encoded as `$252F`.
fn encode_log_group(log_group: &str) -> String {
    log_group.replace('/', "$252F")
}
