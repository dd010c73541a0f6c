use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailshotError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Parse error in {resource}: {message}")]
    Parse { resource: String, message: String },

    #[error("I/O error on {resource}: {message}")]
    Io { resource: String, message: String },

    #[error("Template load error: {message}")]
    TemplateLoad { message: String },

    #[error("Template execution error: {message}")]
    TemplateExec { message: String },

    #[error("Missing recipient address: no string value for {key}")]
    MissingRecipient { key: String },

    #[error("Invalid address: {message}")]
    Address { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl MailshotError {
    pub fn not_found(resource: impl AsRef<Path>) -> Self {
        Self::NotFound {
            resource: resource.as_ref().display().to_string(),
        }
    }

    pub fn parse(resource: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            resource: resource.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    pub fn io(resource: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Io {
            resource: resource.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    pub fn template_load(message: impl Into<String>) -> Self {
        Self::TemplateLoad {
            message: message.into(),
        }
    }

    pub fn template_exec(message: impl Into<String>) -> Self {
        Self::TemplateExec {
            message: message.into(),
        }
    }

    pub fn missing_recipient(key: impl Into<String>) -> Self {
        Self::MissingRecipient { key: key.into() }
    }

    pub fn address(message: impl Into<String>) -> Self {
        Self::Address {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Classifies a failed read of `resource`: a missing file is `NotFound`,
    /// anything else is reported as-is.
    pub fn from_read(resource: impl AsRef<Path>, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(resource),
            _ => Self::io(resource, error.to_string()),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::TemplateLoad { .. } => "TEMPLATE_LOAD_ERROR",
            Self::TemplateExec { .. } => "TEMPLATE_EXEC_ERROR",
            Self::MissingRecipient { .. } => "MISSING_RECIPIENT_ERROR",
            Self::Address { .. } => "ADDRESS_ERROR",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }
}

pub type MailshotResult<T> = Result<T, MailshotError>;

/// A per-recipient failure that stopped the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("delivery aborted at recipient #{index}")]
pub struct DeliveryAborted {
    pub index: usize,
    #[source]
    pub source: MailshotError,
}

impl DeliveryAborted {
    pub fn new(index: usize, source: MailshotError) -> Self {
        Self { index, source }
    }
}

// Conversion from common error types
impl From<handlebars::TemplateError> for MailshotError {
    fn from(error: handlebars::TemplateError) -> Self {
        Self::template_load(error.to_string())
    }
}

impl From<handlebars::RenderError> for MailshotError {
    fn from(error: handlebars::RenderError) -> Self {
        Self::template_exec(error.to_string())
    }
}

impl From<lettre::address::AddressError> for MailshotError {
    fn from(error: lettre::address::AddressError) -> Self {
        Self::address(error.to_string())
    }
}

impl From<lettre::error::Error> for MailshotError {
    fn from(error: lettre::error::Error) -> Self {
        Self::address(error.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailshotError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        Self::transport(error.to_string())
    }
}
