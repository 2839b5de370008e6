use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub smtp: SmtpConfig,
    pub ollama: OllamaConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub generate_timeout_seconds: u64,
    pub probe_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub profile_file: String,
    pub log_file: String,
    pub resume_directory: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smtp: SmtpConfig {
                host: "smtp.gmail.com".to_string(),
                port: 587,
            },
            ollama: OllamaConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "mistral".to_string(),
                generate_timeout_seconds: 30,
                probe_timeout_seconds: 5,
            },
            storage: StorageConfig {
                profile_file: "sender_profile.json".to_string(),
                log_file: "sent_emails.json".to_string(),
                resume_directory: "resume".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

pub async fn load_config(
    path: &str,
) -> std::result::Result<Config, Box<dyn std::error::Error + Send + Sync>> {
    let content = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&content)?;
    Ok(config)
}
