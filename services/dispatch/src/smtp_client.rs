//! SMTP Client
//!
//! Delivers rendered messages via SMTP using lettre.

use lettre::{
    address::Envelope,
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{Tls, TlsParameters},
    },
    Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
};
use mailshot_models::{RenderedMessage, SenderConfig};
use mailshot_utils::{MailshotError, MailshotResult};
use tracing::debug;

/// Something that can put a rendered message on the wire.
#[allow(async_fn_in_trait)]
pub trait MailTransport {
    async fn deliver(&self, envelope: &Envelope, message: &RenderedMessage) -> MailshotResult<()>;
}

/// Envelope for one message: `MAIL FROM` is the authenticated user, the only
/// `RCPT TO` is `recipient`.
pub fn envelope_for(sender: &SenderConfig, recipient: &str) -> MailshotResult<Envelope> {
    let from: Address = sender.user.parse()?;
    let to: Address = recipient.parse()?;
    Ok(Envelope::new(Some(from), vec![to])?)
}

/// How the connection is secured before credentials are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    /// STARTTLS must succeed, otherwise the send fails before `AUTH`.
    Required,
    /// Upgrade when offered. Only used for loopback hosts.
    Opportunistic,
}

impl TlsPolicy {
    /// Credentials may travel unencrypted only to the local machine.
    pub fn for_host(host: &str) -> Self {
        match host {
            "localhost" | "127.0.0.1" | "::1" => Self::Opportunistic,
            _ => Self::Required,
        }
    }
}

/// SMTP client for sending emails
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    tls_policy: TlsPolicy,
}

impl SmtpMailer {
    /// PLAIN authentication against `host:port` over STARTTLS. Loopback hosts
    /// may skip TLS when the server does not offer it.
    pub fn from_sender_config(config: &SenderConfig) -> MailshotResult<Self> {
        let port: u16 = config.port.parse().map_err(|_| {
            MailshotError::configuration(format!("invalid port {:?}", config.port))
        })?;

        let creds = Credentials::new(config.user.clone(), config.password.clone());
        let tls_policy = TlsPolicy::for_host(&config.host);

        let builder = match tls_policy {
            TlsPolicy::Required => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?,
            TlsPolicy::Opportunistic => {
                let tls = TlsParameters::new(config.host.clone())?;
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                    .tls(Tls::Opportunistic(tls))
            }
        };

        let transport = builder
            .port(port)
            .credentials(creds)
            .authentication(vec![Mechanism::Plain])
            .build();

        debug!(target_addr = %config.address(), ?tls_policy, "Configured SMTP transport");
        Ok(Self { transport, tls_policy })
    }

    pub fn tls_policy(&self) -> TlsPolicy {
        self.tls_policy
    }
}

impl MailTransport for SmtpMailer {
    async fn deliver(&self, envelope: &Envelope, message: &RenderedMessage) -> MailshotResult<()> {
        let response = self
            .transport
            .send_raw(envelope, &to_crlf(message.as_bytes()))
            .await?;
        debug!(code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}

/// SMTP wants CRLF line endings; template files usually carry bare LF.
fn to_crlf(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + bytes.len() / 32);
    let mut previous = None;
    for &byte in bytes {
        if byte == b'\n' && previous != Some(b'\r') {
            out.push(b'\r');
        }
        out.push(byte);
        previous = Some(byte);
    }
    out
}
