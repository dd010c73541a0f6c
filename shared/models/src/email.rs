use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Key under which the sender display name is exposed to templates.
pub const SENDER_NAME: &str = "SenderName";

/// Key under which the sender address is exposed to templates.
pub const SENDER_EMAIL: &str = "SenderEmail";

/// The string-only mapping handed to the template for one recipient.
///
/// Ordered by key so that two merges of the same inputs compare and serialize
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectiveVariables(BTreeMap<String, String>);

impl EffectiveVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` under `key`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A fully rendered message: headers and body exactly as they go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage(Vec<u8>);

impl RenderedMessage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for RenderedMessage {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

/// Summary of a run that delivered to every recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub run_id: Uuid,
    pub sent: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeliveryReport {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_write_wins() {
        let mut vars = EffectiveVariables::new();
        vars.insert(SENDER_NAME, "From Config");
        vars.insert(SENDER_NAME, "From Recipient");
        assert_eq!(vars.get(SENDER_NAME), Some("From Recipient"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut vars = EffectiveVariables::new();
        vars.insert("b", "2");
        vars.insert("a", "1");
        assert_eq!(serde_json::to_string(&vars).unwrap(), r#"{"a":"1","b":"2"}"#);
    }

    #[test]
    fn test_rendered_message_keeps_bytes() {
        let message = RenderedMessage::from("Subject: hi\r\n\r\nbody".to_string());
        assert_eq!(message.as_bytes(), b"Subject: hi\r\n\r\nbody");
        assert_eq!(message.len(), 19);
    }
}
