use tracing::debug;

use crate::activity_log::ActivityLog;
use crate::config::Config;
use crate::email_sender::EmailSender;
use crate::models::{CliApp, Result};
use crate::ollama::OllamaClient;
use crate::profile::ProfileStore;

#[derive(Debug, Clone)]
pub enum MenuAction {
    SendEmail,
    ShowHistory,
    ShowStatus,
    ReconfigureSender,
    Exit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuAction::SendEmail => {
                write!(f, "📧 Send a recruitment email")
            }
            MenuAction::ShowHistory => {
                write!(f, "📊 Show recent email activity")
            }
            MenuAction::ShowStatus => {
                write!(f, "🔍 Show system status")
            }
            MenuAction::ReconfigureSender => {
                write!(f, "🔧 Reconfigure sender profile")
            }
            MenuAction::Exit => write!(f, "🚪 Exit"),
        }
    }
}

impl CliApp {
    pub async fn new(config: Config) -> Result<Self> {
        debug!("Initializing CLI app components");

        let profile_store = ProfileStore::new(&config.storage.profile_file);
        let ollama = OllamaClient::new(config.ollama.clone());
        let sender = EmailSender::new(config.smtp.clone());
        let activity = ActivityLog::new(&config.storage.log_file);

        Ok(Self {
            config,
            profile_store,
            ollama,
            sender,
            activity,
        })
    }
}
