//! Mailshot Dispatch
//!
//! Renders one message template per recipient and delivers each message over
//! SMTP, strictly in order, stopping at the first failure.

pub mod bootstrap;
pub mod config_store;
pub mod merger;
pub mod service;
pub mod smtp_client;
pub mod template_engine;

pub use bootstrap::run_pipeline;
pub use service::{ConsoleProgress, DeliveryService, ProgressReporter};
pub use smtp_client::{envelope_for, MailTransport, SmtpMailer, TlsPolicy};
pub use template_engine::TemplateEngine;
