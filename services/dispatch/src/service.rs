//! Delivery Service
//!
//! The send loop: merge, render and deliver one recipient at a time, stopping at
//! the first failure.

use chrono::Utc;
use mailshot_models::{DeliveryReport, RecipientEntry, SenderConfig, RECIPIENT_EMAIL, RECIPIENT_NAME};
use mailshot_utils::{DeliveryAborted, MailshotError, MailshotResult};
use tracing::{info, warn};
use uuid::Uuid;

use crate::merger;
use crate::smtp_client::{envelope_for, MailTransport};
use crate::template_engine::TemplateEngine;

/// Receives the operator-facing progress of a run.
pub trait ProgressReporter {
    fn sending(&self, index: usize, recipient: &str);
    fn sent(&self, index: usize, recipient: &str);
}

/// Prints progress lines to stdout.
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn sending(&self, _index: usize, recipient: &str) {
        println!("Sending email to: {recipient}...");
    }

    fn sent(&self, _index: usize, _recipient: &str) {
        println!("Email sent!");
        println!();
    }
}

/// Delivery service
pub struct DeliveryService<'a, T> {
    sender: &'a SenderConfig,
    template_engine: &'a TemplateEngine,
    transport: &'a T,
    progress: &'a dyn ProgressReporter,
}

impl<'a, T: MailTransport> DeliveryService<'a, T> {
    pub fn new(sender: &'a SenderConfig, template_engine: &'a TemplateEngine, transport: &'a T) -> Self {
        Self {
            sender,
            template_engine,
            transport,
            progress: &ConsoleProgress,
        }
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Deliver to every recipient in order.
    ///
    /// Returns at the first failure; later recipients are never attempted.
    pub async fn run(&self, recipients: &[RecipientEntry]) -> Result<DeliveryReport, DeliveryAborted> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, recipients = recipients.len(), "Starting delivery run");

        for (index, entry) in recipients.iter().enumerate() {
            if let Err(error) = self.deliver_one(index, entry).await {
                warn!(%run_id, index, code = error.error_code(), %error, "Delivery aborted");
                return Err(DeliveryAborted::new(index, error));
            }
        }

        let report = DeliveryReport {
            run_id,
            sent: recipients.len(),
            started_at,
            finished_at: Utc::now(),
        };
        info!(%run_id, sent = report.sent, elapsed_ms = report.elapsed_ms(), "Delivery run complete");
        Ok(report)
    }

    async fn deliver_one(&self, index: usize, entry: &RecipientEntry) -> MailshotResult<()> {
        let outcome = merger::merge_with_report(self.sender, entry);
        for key in &outcome.dropped {
            warn!(index, key = %key, "Skipping non-string recipient variable");
        }
        let variables = outcome.variables;

        let message = self.template_engine.render(&variables)?;

        let recipient = variables
            .get(RECIPIENT_EMAIL)
            .ok_or_else(|| MailshotError::missing_recipient(RECIPIENT_EMAIL))?;
        let envelope = envelope_for(self.sender, recipient)?;

        self.progress.sending(index, recipient);
        self.transport.deliver(&envelope, &message).await?;
        self.progress.sent(index, recipient);

        let name = variables.get(RECIPIENT_NAME);
        info!(index, recipient, name, bytes = message.len(), "Email sent");
        Ok(())
    }
}
