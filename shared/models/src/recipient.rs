use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recipient's variables as found in the recipient-data resource.
///
/// Values are loosely typed at rest; only strings reach the template.
pub type RecipientEntry = Map<String, Value>;

/// Key holding the destination address of a recipient.
pub const RECIPIENT_EMAIL: &str = "RecipientEmail";

/// Key conventionally holding the display name of a recipient.
pub const RECIPIENT_NAME: &str = "RecipientName";

/// The decoded recipient-data resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipientList {
    pub variables: Vec<RecipientEntry>,
}

impl RecipientList {
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn into_entries(self) -> Vec<RecipientEntry> {
        self.variables
    }
}
