use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport credentials and sender identity, read once per run.
///
/// Every field is a string in the configuration resource, `port` included.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: String,
    #[serde(rename = "sender-name")]
    pub sender_name: String,
    #[serde(rename = "sender-email")]
    pub sender_email: String,
}

impl SenderConfig {
    /// `host:port`, the connection target of every send in the run.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for SenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender_name", &self.sender_name)
            .field("sender_email", &self.sender_email)
            .finish()
    }
}
