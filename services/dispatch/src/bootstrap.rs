//! Run orchestration: load the three resources, connect, deliver.

use anyhow::{Context, Result};
use mailshot_models::{DeliveryReport, SenderConfig};
use mailshot_utils::{MailshotResult, PathsConfig};

use crate::config_store;
use crate::service::{DeliveryService, ProgressReporter};
use crate::smtp_client::MailTransport;
use crate::template_engine::TemplateEngine;

/// Runs one complete dispatch. `connect` builds the transport from the loaded
/// sender configuration.
///
/// Errors carry the failing stage as context.
pub async fn run_pipeline<T, F>(
    paths: &PathsConfig,
    connect: F,
    progress: &dyn ProgressReporter,
) -> Result<DeliveryReport>
where
    T: MailTransport,
    F: FnOnce(&SenderConfig) -> MailshotResult<T>,
{
    let sender = config_store::load(&paths.sender_config)
        .context("Error reading email configuration")?;

    let recipients = config_store::load_recipients(&paths.recipients)
        .context("Error reading variable configuration")?;

    let template_engine =
        TemplateEngine::load(&paths.template).context("Error loading email template")?;

    let transport = connect(&sender).context("Error configuring mail transport")?;

    let report = DeliveryService::new(&sender, &template_engine, &transport)
        .with_progress(progress)
        .run(&recipients)
        .await
        .context("Error sending email")?;

    Ok(report)
}
