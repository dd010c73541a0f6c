//! Mailshot
//!
//! Sends `email.tmpl` to every recipient listed in `email-data.json`, using the
//! account in `email-config.json`.

use std::process::ExitCode;

use mailshot_dispatch::{run_pipeline, ConsoleProgress, SmtpMailer};
use mailshot_utils::{init_logging, log_error, AppConfig};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => return fail("Error loading settings: ", &err),
    };

    if let Err(err) = init_logging(&config.logging) {
        return fail("Error initializing logging: ", &*err);
    }

    match run_pipeline(&config.paths, SmtpMailer::from_sender_config, &ConsoleProgress).await {
        Ok(report) => {
            info!(run_id = %report.run_id, sent = report.sent, "All emails sent");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log_error!(format!("{err:#}"), "Dispatch failed");
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn fail(description: &str, err: &dyn std::error::Error) -> ExitCode {
    println!("{description}{err}");
    ExitCode::FAILURE
}
