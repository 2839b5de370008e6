// src/cli/run_send_email.rs
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::Path;
use tracing::{error, info};

use crate::activity_log::ActivityRecord;
use crate::cycle::{self, CycleStep, StepResult, Terminal};
use crate::models::{CliApp, RecipientRequest, Result};
use crate::ollama::resolve_subject;
use crate::profile::SenderProfile;
use crate::resume::{find_resume_files, format_file_size, pick_resume, ResumeFile};

/// Everything collected during one pass through the send cycle.
#[derive(Default)]
struct CycleData {
    request: Option<RecipientRequest>,
    resume: Option<ResumeFile>,
    subject: Option<String>,
    send_error: Option<String>,
}

impl CliApp {
    /// One email-send cycle: collect, pick an attachment, generate a subject,
    /// confirm, send, log. The step order lives in `cycle::next_step`; this
    /// method only does the I/O each step needs.
    pub async fn run_send_email(&self) -> Result<()> {
        println!("\n📧 New Recruitment Email");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let profile = self.profile_store.ensure().await?;

        let mut data = CycleData::default();
        let mut step = CycleStep::CollectRecipient;

        let terminal = loop {
            let result = match step {
                CycleStep::CollectRecipient => {
                    data.request = Some(self.collect_recipient()?);
                    StepResult::Advance
                }
                CycleStep::SelectResume => self.select_resume(&mut data)?,
                CycleStep::GenerateSubject => {
                    let Some(request) = data.request.as_ref() else {
                        return Err("no recipient collected before subject generation".into());
                    };
                    if request.custom_subject.is_some() {
                        println!("\n📝 Using custom subject.");
                    } else {
                        println!("\n🎯 Generating personalized subject line...");
                    }
                    data.subject =
                        Some(resolve_subject(&self.ollama, request, &profile.sender_name).await);
                    StepResult::Advance
                }
                CycleStep::Confirm => {
                    if self.confirm_summary(&profile, &data)? {
                        StepResult::Advance
                    } else {
                        StepResult::Declined
                    }
                }
                CycleStep::Send => self.deliver(&profile, &mut data).await?,
                CycleStep::Log { sent } => {
                    self.log_outcome(&data, sent).await;
                    StepResult::Advance
                }
                CycleStep::Done(terminal) => break terminal,
            };
            step = cycle::next_step(step, result);
        };

        match terminal {
            Terminal::Sent => {
                println!("\n✅ Email sent successfully! 🎉");
                println!(
                    "📊 Check '{}' for the delivery log.",
                    self.config.storage.log_file
                );
            }
            Terminal::Aborted => {
                println!("\n❌ Email cancelled by user.");
            }
            Terminal::Failed => {
                println!("\n❌ Failed to send email. The attempt was recorded in the activity log.");
            }
        }

        Ok(())
    }

    fn collect_recipient(&self) -> Result<RecipientRequest> {
        println!("\n📝 Enter email details:");

        let email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("📬 Recipient email")
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                if cycle::is_valid_email(input) {
                    Ok(())
                } else {
                    Err("Invalid email format. Please try again.")
                }
            })
            .interact_text()?;

        let name: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("👤 Recipient name (optional)")
            .allow_empty(true)
            .interact_text()?;

        let company: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("🏢 Company name (optional)")
            .allow_empty(true)
            .interact_text()?;

        let bcc_input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("📧 BCC email (optional)")
            .allow_empty(true)
            .interact_text()?;

        let bcc = match cycle::none_if_empty(bcc_input) {
            Some(candidate) if cycle::is_valid_email(&candidate) => Some(candidate),
            Some(_) => {
                println!("⚠️  Invalid BCC email format, skipping BCC.");
                None
            }
            None => None,
        };

        let custom_subject: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("📝 Email subject (optional, Enter for AI-generated)")
            .allow_empty(true)
            .interact_text()?;

        Ok(RecipientRequest {
            email: email.trim().to_string(),
            name: cycle::none_if_empty(name),
            company: cycle::none_if_empty(company),
            bcc,
            custom_subject: cycle::none_if_empty(custom_subject),
        })
    }

    fn select_resume(&self, data: &mut CycleData) -> Result<StepResult> {
        let directory = Path::new(&self.config.storage.resume_directory);
        println!("\n📄 Checking for resume files (newest first)...");
        let files = find_resume_files(directory);

        if files.is_empty() {
            println!("❌ No resume files found in '{}'!", directory.display());
            println!("📋 Supported formats: PDF, DOC, DOCX");
            let proceed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Send without an attachment?")
                .default(false)
                .interact()?;
            if !proceed {
                return Ok(StepResult::Declined);
            }
            println!("⚠️  Proceeding without a resume attachment.");
            return Ok(StepResult::Advance);
        }

        if files.len() == 1 {
            println!(
                "✅ Found resume: {} ({})",
                files[0].file_name(),
                format_file_size(files[0].size)
            );
            data.resume = Some(files[0].clone());
            return Ok(StepResult::Advance);
        }

        println!("📄 Found {} resume files:", files.len());
        let labels: Vec<String> = files
            .iter()
            .map(|file| {
                format!(
                    "{} ({}, modified {})",
                    file.file_name(),
                    format_file_size(file.size),
                    file.modified_display()
                )
            })
            .collect();

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select resume file")
            .default(0)
            .items(&labels)
            .interact()?;

        match pick_resume(&files, selection) {
            Some(file) => {
                data.resume = Some(file.clone());
                Ok(StepResult::Advance)
            }
            None => Err("resume selection out of range".into()),
        }
    }

    fn confirm_summary(&self, profile: &SenderProfile, data: &CycleData) -> Result<bool> {
        let Some(request) = data.request.as_ref() else {
            return Err("no recipient collected before confirmation".into());
        };
        let Some(subject) = data.subject.as_deref() else {
            return Err("no subject resolved before confirmation".into());
        };

        println!("\n📧 Email Summary:");
        println!("   📬 To: {}", request.email);
        match request.name.as_deref() {
            Some(name) => println!("   👤 Name: {}", name),
            None => println!("   👤 Name: Hiring Manager (default)"),
        }
        match request.company.as_deref() {
            Some(company) => println!("   🏢 Company: {}", company),
            None => println!("   🏢 Company: [Not specified]"),
        }
        if let Some(bcc) = request.bcc.as_deref() {
            println!("   📧 BCC: {}", bcc);
        }
        println!("   📝 Subject: {}", subject);
        match data.resume.as_ref() {
            Some(resume) => println!(
                "   📄 Resume: {} ({})",
                resume.file_name(),
                format_file_size(resume.size)
            ),
            None => println!("   📄 Resume: [none, sending without attachment]"),
        }
        println!(
            "   👤 From: {} <{}>",
            profile.sender_name, profile.sender_email
        );

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Send this email?")
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    async fn deliver(&self, profile: &SenderProfile, data: &mut CycleData) -> Result<StepResult> {
        let Some(request) = data.request.as_ref() else {
            return Err("no recipient collected before sending".into());
        };
        let Some(subject) = data.subject.as_deref() else {
            return Err("no subject resolved before sending".into());
        };

        println!("\n🚀 Sending email...");
        match self
            .sender
            .send(profile, request, data.resume.as_ref(), subject)
            .await
        {
            Ok(()) => {
                info!("Email delivered to {}", request.email);
                Ok(StepResult::Advance)
            }
            Err(e) => {
                println!("❌ {}", e);
                data.send_error = Some(e.to_string());
                Ok(StepResult::SendFailed)
            }
        }
    }

    /// Runs for every attempted send, success or failure. A log-write failure
    /// is reported but does not undo the send that already happened.
    async fn log_outcome(&self, data: &CycleData, sent: bool) {
        let (Some(request), Some(subject)) = (data.request.as_ref(), data.subject.as_deref())
        else {
            error!("Send cycle reached logging without a request; nothing recorded");
            return;
        };

        let error = if sent {
            None
        } else {
            Some(
                data.send_error
                    .clone()
                    .unwrap_or_else(|| "SMTP sending failed".to_string()),
            )
        };

        let record =
            ActivityRecord::new(&request.email, request.company.as_deref(), subject, sent, error);

        if let Err(e) = self.activity.record(record).await {
            error!("Failed to update activity log: {}", e);
            println!("⚠️  Failed to write to log file: {}", e);
            println!("⚠️  The send result above still stands; the log is now incomplete.");
        }
    }
}
