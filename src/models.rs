use serde::{Deserialize, Serialize};

use crate::{
    activity_log::ActivityLog, config::Config, email_sender::EmailSender, ollama::OllamaClient,
    profile::ProfileStore,
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Everything the user typed in for a single send. Lives for one cycle only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipientRequest {
    pub email: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub bcc: Option<String>,
    pub custom_subject: Option<String>,
}

pub struct CliApp {
    pub config: Config,
    pub profile_store: ProfileStore,
    pub ollama: OllamaClient,
    pub sender: EmailSender,
    pub activity: ActivityLog,
}
