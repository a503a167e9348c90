//! Closure notices and material requests.
//!
//! Drafts are plain subject/body pairs. They are delivered either as a
//! pre-filled webmail compose page (the operator picks the recipient) or
//! straight through an SMTP relay.

use super::config::{Config, NotifyTransport, SmtpConfig};
use super::equipment::{Equipment, ExitCondition};
use super::filing::launch;
use super::formatter::format_hours;
use super::messages::Message;
use super::secret::Secret;
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message as Email, SmtpTransport, Transport};
use std::ffi::OsStr;
use std::str::FromStr;

const COMPOSE_BASE_URL: &str = "https://mail.google.com/mail/?view=cm&fs=1";

const SIGNATURE: &str = "---\nThis message was generated automatically by the equipment control system.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRequest {
    pub part_name: String,
    pub part_number: Option<String>,
    pub serial_number: Option<String>,
    pub quantity: u32,
}

/// Notice for a closed record. The destination line only appears for
/// Repairable units, where it says where the unit goes next.
pub fn closure_notice(record: &Equipment) -> Result<Draft> {
    if !record.closed {
        msg_bail_anyhow!(Message::ClosureNoticeRequiresClosed);
    }

    let subject = format!("Equipment closure - OT {} - SN {}", record.order_number, record.serial_number);

    let mut lines = vec![
        "Hello,".to_string(),
        String::new(),
        "Please find below the closure details of the following unit:".to_string(),
        String::new(),
        format!("  - Technical order: {}", record.order_number),
        format!("  - Equipment name: {}", record.name),
        format!("  - PN / SN: {} / {}", record.part_number, record.serial_number),
        format!("  - Work hours: {}", format_hours(record.hours)),
        format!("  - Exit condition: {}", record.exit_condition.map(|c| c.label()).unwrap_or("")),
        format!("  - Closure remarks: {}", record.closure_remarks.as_deref().unwrap_or("None")),
    ];
    if record.exit_condition == Some(ExitCondition::Repairable) {
        lines.push(format!("  - Destination: {}", record.destination.as_deref().unwrap_or("Not specified")));
    }
    lines.extend([String::new(), "Regards.".to_string(), String::new(), SIGNATURE.to_string()]);

    Ok(Draft {
        subject,
        body: lines.join("\n"),
    })
}

pub fn material_request(record: &Equipment, request: &MaterialRequest) -> Draft {
    let or_na = |value: &Option<String>| value.as_deref().map(str::trim).filter(|v| !v.is_empty()).unwrap_or("N/A").to_string();

    let subject = format!("Material request for OT {} (SN: {})", record.order_number, record.serial_number);
    let body = format!(
        "Hello,\n\n\
         The following material is requested for the unit with OT {} (PN/SN: {} / {}).\n\n\
         Request details:\n\
         -------------------------\n\
         - Part name: {}\n\
         - Part PN: {}\n\
         - Part SN: {}\n\
         - Quantity: {}\n\n\
         Regards.\n\n{}",
        record.order_number,
        record.part_number,
        record.serial_number,
        request.part_name.trim(),
        or_na(&request.part_number),
        or_na(&request.serial_number),
        request.quantity,
        SIGNATURE,
    );

    Draft { subject, body }
}

/// Webmail compose link. The recipient is left empty on purpose: the
/// operator fills it in.
pub fn compose_url(draft: &Draft) -> String {
    format!(
        "{}&su={}&body={}",
        COMPOSE_BASE_URL,
        urlencoding::encode(&draft.subject),
        urlencoding::encode(&draft.body)
    )
}

pub enum Notifier {
    WebCompose,
    Smtp { settings: SmtpConfig, password: String },
}

impl Notifier {
    /// Picks the configured transport. SMTP needs complete settings and a
    /// password (environment, stored secret or prompt).
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.notify_transport {
            NotifyTransport::Web => Ok(Notifier::WebCompose),
            NotifyTransport::Smtp => {
                let settings = match &config.smtp {
                    Some(settings) if settings.is_complete() => settings.clone(),
                    _ => msg_bail_anyhow!(Message::SmtpNotConfigured),
                };
                let password = Secret::smtp(&Message::PromptSmtpPassword.to_string()).get_or_prompt()?;
                Ok(Notifier::Smtp { settings, password })
            }
        }
    }

    /// Returns the message to show once the draft left.
    pub fn deliver(&self, draft: &Draft) -> Result<Message> {
        match self {
            Notifier::WebCompose => {
                let url = compose_url(draft);
                if let Err(e) = launch(OsStr::new(&url)) {
                    tracing::warn!(error = %e, "no browser available for the compose link");
                    return Err(msg_error_anyhow!(Message::BrowserOpenFailed(url)));
                }
                tracing::info!(subject = %draft.subject, "compose window opened");
                Ok(Message::OpeningComposeWindow)
            }
            Notifier::Smtp { settings, password } => {
                send_smtp(settings, password, draft)?;
                tracing::info!(subject = %draft.subject, recipient = %settings.recipient, "notice sent");
                Ok(Message::MailSent(settings.recipient.clone()))
            }
        }
    }
}

fn send_smtp(settings: &SmtpConfig, password: &str, draft: &Draft) -> Result<()> {
    let from = settings.from.as_deref().unwrap_or(&settings.user);
    let from = Mailbox::from_str(from).map_err(|e| anyhow::anyhow!("invalid sender address {}: {}", from, e))?;
    let to = Mailbox::from_str(&settings.recipient).map_err(|e| anyhow::anyhow!("invalid recipient address {}: {}", settings.recipient, e))?;

    let email = Email::builder()
        .from(from)
        .to(to)
        .subject(draft.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(draft.body.clone())?;

    let mailer = SmtpTransport::starttls_relay(&settings.server)?
        .port(settings.port)
        .credentials(Credentials::new(settings.user.clone(), password.to_string()))
        .build();

    mailer.send(&email)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_url_encodes_subject_and_body() {
        let draft = Draft {
            subject: "Closure OT 1 & 2".to_string(),
            body: "line one\nline two".to_string(),
        };
        let url = compose_url(&draft);
        assert!(url.starts_with("https://mail.google.com/mail/?view=cm&fs=1&su="));
        assert!(url.contains("su=Closure%20OT%201%20%26%202"));
        assert!(url.contains("body=line%20one%0Aline%20two"));
        assert!(!url.contains("to="));
    }
}
