// src/email_sender/mod.rs
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::SmtpConfig;
use crate::cycle::{display_company, display_name};
use crate::models::RecipientRequest;
use crate::profile::SenderProfile;
use crate::resume::{format_file_size, ResumeFile};

#[derive(Debug, Error)]
pub enum SendError {
    #[error("SMTP authentication failed: {0}")]
    Authentication(String),

    #[error("SMTP connection failed: {0}")]
    Connection(String),

    #[error("recipient rejected by server: {0}")]
    RecipientRejected(String),

    #[error("failed to read attachment {path}: {source}")]
    AttachmentRead {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Message(String),
}

/// Substitute `{name}` and `{company}` in the body template, using the
/// standard defaults for missing values. Everything else passes through
/// untouched.
pub fn render_template(template: &str, name: Option<&str>, company: Option<&str>) -> String {
    template
        .replace("{name}", display_name(name))
        .replace("{company}", display_company(company))
}

pub struct EmailSender {
    config: SmtpConfig,
}

impl EmailSender {
    pub fn new(config: SmtpConfig) -> Self {
        debug!("Created EmailSender for {}:{}", config.host, config.port);
        Self { config }
    }

    /// Compose and deliver one email. A fresh transport is built per call and
    /// dropped on every exit path, so no connection outlives the attempt.
    pub async fn send(
        &self,
        profile: &SenderProfile,
        request: &RecipientRequest,
        resume: Option<&ResumeFile>,
        subject: &str,
    ) -> Result<(), SendError> {
        let from: Mailbox = format!("{} <{}>", profile.sender_name, profile.sender_email)
            .parse()
            .map_err(|_| SendError::InvalidAddress(profile.sender_email.clone()))?;
        let to: Mailbox = request
            .email
            .parse()
            .map_err(|_| SendError::InvalidAddress(request.email.clone()))?;

        let mut builder = Message::builder().from(from).to(to).subject(subject);
        if let Some(bcc) = &request.bcc {
            let bcc: Mailbox = bcc
                .parse()
                .map_err(|_| SendError::InvalidAddress(bcc.clone()))?;
            builder = builder.bcc(bcc);
        }

        let body = render_template(
            &profile.email_template,
            request.name.as_deref(),
            request.company.as_deref(),
        );

        let message = match resume {
            Some(resume) => {
                let content =
                    std::fs::read(&resume.path).map_err(|source| SendError::AttachmentRead {
                        path: resume.path.display().to_string(),
                        source,
                    })?;
                println!(
                    "📎 Attached: {} ({})",
                    resume.file_name(),
                    format_file_size(resume.size)
                );
                let attachment = Attachment::new(resume.file_name())
                    .body(content, content_type_for(&resume.path));
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body))
                        .singlepart(attachment),
                )
            }
            None => builder.singlepart(SinglePart::plain(body)),
        }
        .map_err(|e| SendError::Message(e.to_string()))?;

        println!("🔗 Connecting to {}...", self.config.host);
        let mailer = self.transport(profile)?;

        println!("📤 Sending email...");
        match mailer.send(message).await {
            Ok(response) => {
                debug!("SMTP accepted message: {:?}", response.code());
                Ok(())
            }
            Err(e) => {
                error!("SMTP send failed: {}", e);
                Err(classify_smtp_error(e))
            }
        }
    }

    /// Connect and authenticate without sending anything. Used by the status
    /// view to verify stored credentials.
    pub async fn test_connection(&self, profile: &SenderProfile) -> Result<bool, SendError> {
        let mailer = self.transport(profile)?;
        let ok = mailer
            .test_connection()
            .await
            .map_err(classify_smtp_error)?;
        if ok {
            info!("SMTP connection test successful");
        }
        Ok(ok)
    }

    fn transport(
        &self,
        profile: &SenderProfile,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, SendError> {
        let credentials = Credentials::new(
            profile.sender_email.clone(),
            profile.sender_password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .map_err(|e| SendError::Connection(e.to_string()))?
            .port(self.config.port)
            .credentials(credentials)
            .build();
        Ok(transport)
    }
}

fn content_type_for(path: &Path) -> ContentType {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let mime = match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    };

    ContentType::parse(mime).unwrap_or(ContentType::TEXT_PLAIN)
}

fn classify_smtp_error(err: lettre::transport::smtp::Error) -> SendError {
    if let Some(code) = err.status() {
        let code = code.to_string();
        if code.starts_with("535") || code.starts_with("534") || code.starts_with("530") {
            return SendError::Authentication(err.to_string());
        }
        if code.starts_with("550")
            || code.starts_with("551")
            || code.starts_with("553")
            || code.starts_with("554")
        {
            return SendError::RecipientRejected(err.to_string());
        }
    }
    SendError::Connection(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_replaced_exactly_once() {
        let template = "Dear {name},\n\nI admire {company} a lot.\n\nBest";
        let rendered = render_template(template, Some("Sam"), Some("Acme"));
        assert_eq!(rendered, "Dear Sam,\n\nI admire Acme a lot.\n\nBest");
        assert!(!rendered.contains("{name}"));
        assert!(!rendered.contains("{company}"));
    }

    #[test]
    fn missing_values_use_defaults() {
        let rendered = render_template("To {name} at {company}.", None, None);
        assert_eq!(rendered, "To Hiring Manager at your company.");
    }

    #[test]
    fn template_without_placeholders_renders_to_itself() {
        let template = "No placeholders here, just text.";
        assert_eq!(
            render_template(template, Some("Sam"), Some("Acme")),
            template
        );
    }

    #[test]
    fn attachment_content_types_follow_extension() {
        let expect = |path: &str, mime: &str| {
            assert_eq!(
                format!("{:?}", content_type_for(Path::new(path))),
                format!("{:?}", ContentType::parse(mime).unwrap()),
            );
        };
        expect("resume/cv.pdf", "application/pdf");
        expect("cv.DOC", "application/msword");
        expect("cv.bin", "application/octet-stream");
    }

    #[test]
    fn missing_attachment_maps_to_attachment_read_error() {
        let err = std::fs::read("definitely/not/here.pdf")
            .map_err(|source| SendError::AttachmentRead {
                path: "definitely/not/here.pdf".to_string(),
                source,
            })
            .unwrap_err();
        assert!(matches!(err, SendError::AttachmentRead { .. }));
        assert!(err.to_string().contains("definitely/not/here.pdf"));
    }
}
