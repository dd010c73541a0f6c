//! Config Store
//!
//! Reads the sender configuration and the recipient list from JSON files.

use mailshot_models::{RecipientEntry, RecipientList, SenderConfig};
use mailshot_utils::{MailshotError, MailshotResult};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Load the sender configuration at `path`.
pub fn load(path: impl AsRef<Path>) -> MailshotResult<SenderConfig> {
    let config: SenderConfig = read_json(path.as_ref())?;
    debug!(host = %config.host, port = %config.port, "Loaded sender configuration");
    Ok(config)
}

/// Load the recipient list at `path`, in file order.
pub fn load_recipients(path: impl AsRef<Path>) -> MailshotResult<Vec<RecipientEntry>> {
    let list: RecipientList = read_json(path.as_ref())?;
    debug!(recipients = list.len(), "Loaded recipient list");
    Ok(list.into_entries())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> MailshotResult<T> {
    let data = std::fs::read(path).map_err(|e| MailshotError::from_read(path, &e))?;
    serde_json::from_slice(&data).map_err(|e| MailshotError::parse(path, e.to_string()))
}
