//! Variable Merger
//!
//! Builds the per-recipient variable mapping: sender fields first, then every
//! string-valued recipient field.

use mailshot_models::{EffectiveVariables, RecipientEntry, SenderConfig, SENDER_EMAIL, SENDER_NAME};
use serde_json::Value;

/// Only string values take part in rendering.
pub fn is_string(value: &Value) -> bool {
    string_value(value).is_some()
}

fn string_value(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text),
        _ => None,
    }
}

/// Merge result plus the recipient keys that were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub variables: EffectiveVariables,
    pub dropped: Vec<String>,
}

/// Build the effective variables for one recipient.
pub fn merge(sender: &SenderConfig, entry: &RecipientEntry) -> EffectiveVariables {
    merge_with_report(sender, entry).variables
}

/// Like [`merge`], also naming every key skipped for holding a non-string value.
pub fn merge_with_report(sender: &SenderConfig, entry: &RecipientEntry) -> MergeOutcome {
    let mut variables = EffectiveVariables::new();
    variables.insert(SENDER_NAME, sender.sender_name.as_str());
    variables.insert(SENDER_EMAIL, sender.sender_email.as_str());

    let mut dropped = Vec::new();
    for (key, value) in entry {
        match string_value(value) {
            Some(text) => variables.insert(key.as_str(), text),
            None => dropped.push(key.clone()),
        }
    }

    MergeOutcome { variables, dropped }
}
