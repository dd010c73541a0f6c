//! End-to-end dispatch runs against an in-memory transport.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use lettre::address::Envelope;
use mailshot_dispatch::{run_pipeline, MailTransport, ProgressReporter};
use mailshot_models::{RenderedMessage, SenderConfig};
use mailshot_utils::{DeliveryAborted, MailshotError, MailshotResult, PathsConfig};

/// One `deliver` call as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
struct Delivery {
    target: String,
    from: String,
    to: Vec<String>,
    message: Vec<u8>,
}

type Log = Rc<RefCell<Vec<Delivery>>>;

struct MemoryTransport {
    target: String,
    fail_at: Option<usize>,
    log: Log,
}

impl MailTransport for MemoryTransport {
    async fn deliver(&self, envelope: &Envelope, message: &RenderedMessage) -> MailshotResult<()> {
        let attempt = self.log.borrow().len();
        self.log.borrow_mut().push(Delivery {
            target: self.target.clone(),
            from: envelope.from().map(ToString::to_string).unwrap_or_default(),
            to: envelope.to().iter().map(ToString::to_string).collect(),
            message: message.as_bytes().to_vec(),
        });
        if self.fail_at == Some(attempt) {
            return Err(MailshotError::transport("421 service not available"));
        }
        Ok(())
    }
}

fn connector(
    log: &Log,
    fail_at: Option<usize>,
) -> impl FnOnce(&SenderConfig) -> MailshotResult<MemoryTransport> {
    let log = Rc::clone(log);
    move |sender: &SenderConfig| {
        Ok(MemoryTransport {
            target: sender.address(),
            fail_at,
            log,
        })
    }
}

struct Silent;

impl ProgressReporter for Silent {
    fn sending(&self, _index: usize, _recipient: &str) {}
    fn sent(&self, _index: usize, _recipient: &str) {}
}

const SCENARIO_CONFIG: &str = r#"{
    "user": "a@x.com",
    "password": "p",
    "host": "mail.x.com",
    "port": "587",
    "sender-name": "S",
    "sender-email": "s@x.com"
}"#;

const SCENARIO_TEMPLATE: &str = "From: {{SenderName}} {{emailAddressStructure SenderEmail}}
To: {{RecipientName}} {{emailAddressStructure RecipientEmail}}
Subject: Hello

{{Variable1}}
";

fn write_inputs(dir: &Path, config: &str, data: &str, template: &str) -> PathsConfig {
    let paths = PathsConfig {
        sender_config: dir.join("email-config.json"),
        recipients: dir.join("email-data.json"),
        template: dir.join("email.tmpl"),
    };
    std::fs::write(&paths.sender_config, config).unwrap();
    std::fs::write(&paths.recipients, data).unwrap();
    std::fs::write(&paths.template, template).unwrap();
    paths
}

fn fixtures() -> PathsConfig {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    PathsConfig {
        sender_config: dir.join("email-config.example.json"),
        recipients: dir.join("email-data.example.json"),
        template: dir.join("email.tmpl"),
    }
}

#[tokio::test]
async fn single_recipient_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(
        dir.path(),
        SCENARIO_CONFIG,
        r#"{"variables": [{"RecipientName": "R", "RecipientEmail": "r@y.com", "Variable1": "V1"}]}"#,
        SCENARIO_TEMPLATE,
    );
    let log = Log::default();

    let report = run_pipeline(&paths, connector(&log, None), &Silent).await.unwrap();

    assert_eq!(report.sent, 1);
    let deliveries = log.borrow();
    assert_eq!(
        *deliveries,
        vec![Delivery {
            target: "mail.x.com:587".to_string(),
            from: "a@x.com".to_string(),
            to: vec!["r@y.com".to_string()],
            message: b"From: S <s@x.com>\nTo: R <r@y.com>\nSubject: Hello\n\nV1\n".to_vec(),
        }]
    );
}

#[tokio::test]
async fn first_failure_aborts_remaining_recipients() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(
        dir.path(),
        SCENARIO_CONFIG,
        r#"{"variables": [
            {"RecipientName": "R1", "RecipientEmail": "r1@y.com", "Variable1": "V1"},
            {"RecipientName": "R2", "RecipientEmail": "r2@y.com", "Variable1": "V1"}
        ]}"#,
        SCENARIO_TEMPLATE,
    );
    let log = Log::default();

    let err = run_pipeline(&paths, connector(&log, Some(0)), &Silent).await.unwrap_err();

    let aborted = err.downcast_ref::<DeliveryAborted>().unwrap();
    assert_eq!(aborted.index, 0);
    assert!(matches!(aborted.source, MailshotError::Transport { .. }));
    assert_eq!(log.borrow().len(), 1);
    assert_eq!(
        format!("{err:#}"),
        "Error sending email: delivery aborted at recipient #0: Transport error: 421 service not available"
    );
}

#[tokio::test]
async fn missing_recipient_address_is_reported_without_sending() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_inputs(
        dir.path(),
        SCENARIO_CONFIG,
        r#"{"variables": [{"RecipientName": "R", "Variable1": "V1"}]}"#,
        "Subject: Hello {{RecipientName}}\n\n{{Variable1}}\n",
    );
    let log = Log::default();

    let err = run_pipeline(&paths, connector(&log, None), &Silent).await.unwrap_err();

    let aborted = err.downcast_ref::<DeliveryAborted>().unwrap();
    assert_eq!(aborted.source, MailshotError::missing_recipient("RecipientEmail"));
    assert!(log.borrow().is_empty());
}

#[tokio::test]
async fn repeated_runs_render_identical_bytes() {
    let first = Log::default();
    let second = Log::default();

    run_pipeline(&fixtures(), connector(&first, None), &Silent).await.unwrap();
    run_pipeline(&fixtures(), connector(&second, None), &Silent).await.unwrap();

    assert_eq!(first.borrow().len(), 3);
    assert_eq!(*first.borrow(), *second.borrow());
}

#[tokio::test]
async fn example_fixtures_render_every_field() {
    let log = Log::default();

    run_pipeline(&fixtures(), connector(&log, None), &Silent).await.unwrap();

    let deliveries = log.borrow();
    for (i, delivery) in deliveries.iter().enumerate() {
        let recipient = format!("receiver-{}@another-address.com", i + 1);
        let text = String::from_utf8(delivery.message.clone()).unwrap();
        assert_eq!(delivery.target, "mail.host.com:587");
        assert_eq!(delivery.from, "someone@address.com");
        assert_eq!(delivery.to, vec![recipient.clone()]);
        assert!(text.starts_with("From: Email Sender <sender@address.com>\n"));
        assert!(text.contains(&format!("To: Email Receiver <{recipient}>\n")));
        assert!(text.contains("Variable1 is Value1 and Variable2 is Value2."));
    }
}

#[tokio::test]
async fn load_failures_name_their_stage() {
    let dir = tempfile::tempdir().unwrap();
    let log = Log::default();

    let mut paths = write_inputs(dir.path(), SCENARIO_CONFIG, r#"{"variables": []}"#, SCENARIO_TEMPLATE);
    paths.sender_config = dir.path().join("absent.json");
    let err = run_pipeline(&paths, connector(&log, None), &Silent).await.unwrap_err();
    assert!(format!("{err:#}").starts_with("Error reading email configuration: Not found: "));

    let paths = write_inputs(dir.path(), SCENARIO_CONFIG, "", SCENARIO_TEMPLATE);
    let err = run_pipeline(&paths, connector(&log, None), &Silent).await.unwrap_err();
    assert!(format!("{err:#}").starts_with("Error reading variable configuration: Parse error in "));

    let paths = write_inputs(dir.path(), SCENARIO_CONFIG, r#"{"variables": []}"#, "{{#each Items}}x{{/if}}");
    let err = run_pipeline(&paths, connector(&log, None), &Silent).await.unwrap_err();
    assert!(format!("{err:#}").starts_with("Error loading email template: Template load error: "));

    assert!(log.borrow().is_empty());
}
