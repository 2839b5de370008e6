use chrono::Utc;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::cycle;
use crate::models::Result;

pub const DEFAULT_TEMPLATE: &str = "Dear {name},\n\n\
I hope this message finds you well. I am reaching out regarding opportunities at {company}. \
I have attached my resume for your review.\n\n\
I would welcome the chance to discuss how my experience could contribute to your team.\n\n\
Thank you for your time and consideration.\n\n\
Best regards";

/// Sender credentials and body template, persisted as JSON between runs.
///
/// Field names are part of the on-disk format and must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderProfile {
    pub sender_email: String,
    pub sender_password: String,
    pub sender_name: String,
    pub email_template: String,
    pub setup_date: String,
}

impl SenderProfile {
    /// A profile without an address and app password must never reach a send.
    pub fn is_complete(&self) -> bool {
        !self.sender_email.trim().is_empty() && !self.sender_password.trim().is_empty()
    }
}

pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Using sender profile at {}", path.display());
        Self { path }
    }

    /// `Ok(None)` means no profile exists yet; `Err` means the file is there
    /// but unusable (malformed JSON or failing the completeness invariant).
    pub async fn load(&self) -> Result<Option<SenderProfile>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let profile: SenderProfile = serde_json::from_str(&content)?;
        if !profile.is_complete() {
            return Err("sender profile is missing an email address or app password".into());
        }
        Ok(Some(profile))
    }

    pub async fn save(&self, profile: &SenderProfile) -> Result<()> {
        let json = serde_json::to_string_pretty(profile)?;
        tokio::fs::write(&self.path, json).await?;
        info!("Sender profile saved to {}", self.path.display());
        Ok(())
    }

    /// Load the profile, falling back to interactive setup when it is absent
    /// or corrupted. Always returns a usable profile or an I/O error.
    pub async fn ensure(&self) -> Result<SenderProfile> {
        match self.load().await {
            Ok(Some(profile)) => {
                println!("✅ Configuration loaded from {}", self.path.display());
                self.show_summary(&profile);
                Ok(profile)
            }
            Ok(None) => {
                println!("📧 First time setup detected...");
                self.run_setup().await
            }
            Err(e) => {
                warn!("Unusable sender profile: {}", e);
                println!("⚠️  Corrupted config file. Running first-time setup...");
                self.run_setup().await
            }
        }
    }

    pub async fn run_setup(&self) -> Result<SenderProfile> {
        println!("\n══════════════════════════════════════════════════");
        println!("🔧 SENDER PROFILE SETUP");
        println!("══════════════════════════════════════════════════");
        println!(
            "Credentials are stored locally in {}. Use an app password, not your real one.",
            self.path.display()
        );

        let sender_email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("📧 Your email address")
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                if cycle::is_valid_email(input) {
                    Ok(())
                } else {
                    Err("Invalid email format. Please try again.")
                }
            })
            .interact_text()?;

        let sender_password: String = Password::with_theme(&ColorfulTheme::default())
            .with_prompt("🔐 App password")
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                if input.trim().is_empty() {
                    Err("Password cannot be empty.")
                } else {
                    Ok(())
                }
            })
            .interact()?;

        let sender_name: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("👤 Your display name")
            .validate_with(|input: &String| -> std::result::Result<(), &str> {
                if input.trim().is_empty() {
                    Err("Name cannot be empty.")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        println!("\n📝 Email body template: {{name}} and {{company}} are filled in per email.");
        println!("   Type \\n for a line break, or press Enter to keep the default.");
        let template_input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("📝 Template")
            .allow_empty(true)
            .interact_text()?;

        let email_template = match cycle::none_if_empty(template_input) {
            Some(raw) => raw.replace("\\n", "\n"),
            None => DEFAULT_TEMPLATE.to_string(),
        };

        let profile = SenderProfile {
            sender_email: sender_email.trim().to_string(),
            sender_password,
            sender_name: sender_name.trim().to_string(),
            email_template,
            setup_date: Utc::now().to_rfc3339(),
        };

        self.save(&profile).await?;

        println!("\n✅ Configuration saved!");
        println!("📧 Email: {}", profile.sender_email);
        println!("👤 Name: {}", profile.sender_name);
        println!("📁 Config saved to: {}", self.path.display());

        Ok(profile)
    }

    /// Print the loaded profile without the password.
    pub fn show_summary(&self, profile: &SenderProfile) {
        println!("\n📋 Current Configuration:");
        println!("   📧 Email: {}", profile.sender_email);
        println!("   👤 Name: {}", profile.sender_name);
        println!(
            "   📝 Template: {}",
            if profile.email_template.trim().is_empty() {
                "Not set"
            } else {
                "Set"
            }
        );
        if !profile.setup_date.is_empty() {
            let shown = profile.setup_date.get(..19).unwrap_or(&profile.setup_date);
            println!("   📅 Setup: {}", shown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> SenderProfile {
        SenderProfile {
            sender_email: "me@example.com".to_string(),
            sender_password: "app-password".to_string(),
            sender_name: "Jane Doe".to_string(),
            email_template: DEFAULT_TEMPLATE.to_string(),
            setup_date: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("sender_profile.json"));

        store.save(&sample_profile()).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded.sender_email, "me@example.com");
        assert_eq!(loaded.sender_name, "Jane Doe");
        assert_eq!(loaded.email_template, DEFAULT_TEMPLATE);
    }

    #[tokio::test]
    async fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("nope.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sender_profile.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let store = ProfileStore::new(path);
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn incomplete_profile_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sender_profile.json");

        let mut profile = sample_profile();
        profile.sender_password = "  ".to_string();
        tokio::fs::write(&path, serde_json::to_string(&profile).unwrap())
            .await
            .unwrap();

        let store = ProfileStore::new(path);
        assert!(store.load().await.is_err());
    }

    #[test]
    fn default_template_keeps_both_placeholders() {
        assert_eq!(DEFAULT_TEMPLATE.matches("{name}").count(), 1);
        assert_eq!(DEFAULT_TEMPLATE.matches("{company}").count(), 1);
    }
}
