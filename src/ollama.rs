use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::OllamaConfig;
use crate::cycle::{display_company, display_name, DEFAULT_COMPANY, DEFAULT_RECIPIENT_NAME};
use crate::models::RecipientRequest;

/// Seam for subject generation so the send cycle can be exercised without a
/// running model endpoint.
#[async_trait]
pub trait SubjectSource: Send + Sync {
    async fn subject_line(
        &self,
        recipient_name: Option<&str>,
        company: Option<&str>,
        sender_name: &str,
    ) -> String;
}

/// A user-provided subject wins; otherwise ask the source (AI or fallback).
pub async fn resolve_subject(
    source: &dyn SubjectSource,
    request: &RecipientRequest,
    sender_name: &str,
) -> String {
    if let Some(custom) = &request.custom_subject {
        return custom.clone();
    }
    source
        .subject_line(
            request.name.as_deref(),
            request.company.as_deref(),
            sender_name,
        )
        .await
}

#[derive(Debug, Default)]
pub struct OllamaStatus {
    pub running: bool,
    pub model_available: bool,
    pub available_models: Vec<String>,
}

pub struct OllamaClient {
    config: OllamaConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        let client = Client::new();
        debug!("Created OllamaClient for {}", config.base_url);
        Self { config, client }
    }

    /// Probe the local service and report whether the configured model is
    /// installed. Any transport failure reads as "not running".
    pub async fn status(&self) -> OllamaStatus {
        let models = match self.fetch_models().await {
            Some(models) => models,
            None => return OllamaStatus::default(),
        };

        // Tags carry variant suffixes ("mistral:latest"); compare base names.
        let model_available = models
            .iter()
            .any(|name| name.split(':').next() == Some(self.config.model.as_str()));

        OllamaStatus {
            running: true,
            model_available,
            available_models: models,
        }
    }

    async fn fetch_models(&self) -> Option<Vec<String>> {
        let url = format!("{}/api/tags", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(self.config.probe_timeout_seconds))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        let tags: TagsResponse = response.json().await.ok()?;
        Some(tags.models.into_iter().map(|model| model.name).collect())
    }

    /// Generate a subject line, falling back to a deterministic one on any
    /// failure. This never returns an error to the caller.
    pub async fn generate_subject(
        &self,
        recipient_name: Option<&str>,
        company: Option<&str>,
        sender_name: &str,
    ) -> String {
        let status = self.status().await;

        if !status.running {
            println!("⚠️  Ollama service not running. Using default subject.");
            return fallback_subject(sender_name, recipient_name, company);
        }

        if !status.model_available {
            println!(
                "⚠️  Model '{}' not found. Using default subject.",
                self.config.model
            );
            if !status.available_models.is_empty() {
                let shown: Vec<&str> = status
                    .available_models
                    .iter()
                    .take(3)
                    .map(String::as_str)
                    .collect();
                println!("💡 Available models: {}", shown.join(", "));
                println!("💡 Install with: ollama pull {}", self.config.model);
            }
            return fallback_subject(sender_name, recipient_name, company);
        }

        let prompt = build_prompt(recipient_name, company, sender_name);
        let payload = json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": 0.7,
                "top_p": 0.9,
                "num_predict": 50
            }
        });

        let url = format!("{}/api/generate", self.config.base_url);
        println!("🤖 Generating subject line with {}...", self.config.model);

        let response = match self
            .client
            .post(&url)
            .timeout(Duration::from_secs(self.config.generate_timeout_seconds))
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Ollama request failed: {}", e);
                println!("⚠️  Ollama request failed. Using default subject.");
                return fallback_subject(sender_name, recipient_name, company);
            }
        };

        if !response.status().is_success() {
            warn!("Ollama API returned status {}", response.status());
            println!(
                "⚠️  Ollama API error ({}). Using default subject.",
                response.status()
            );
            return fallback_subject(sender_name, recipient_name, company);
        }

        let generated = match response.json::<GenerateResponse>().await {
            Ok(body) => clean_subject(&body.response),
            Err(e) => {
                warn!("Unreadable Ollama response: {}", e);
                String::new()
            }
        };

        if is_plausible_subject(&generated) {
            println!("✨ AI generated: {}", generated);
            generated
        } else {
            println!("⚠️  Generated subject seems invalid. Using default.");
            fallback_subject(sender_name, recipient_name, company)
        }
    }
}

#[async_trait]
impl SubjectSource for OllamaClient {
    async fn subject_line(
        &self,
        recipient_name: Option<&str>,
        company: Option<&str>,
        sender_name: &str,
    ) -> String {
        self.generate_subject(recipient_name, company, sender_name)
            .await
    }
}

fn build_prompt(recipient_name: Option<&str>, company: Option<&str>, sender_name: &str) -> String {
    let mut context = Vec::new();
    let company_shown = display_company(company);
    let name_shown = display_name(recipient_name);
    if company_shown != DEFAULT_COMPANY {
        context.push(format!("Company: {}", company_shown));
    }
    if name_shown != DEFAULT_RECIPIENT_NAME {
        context.push(format!("Recipient: {}", name_shown));
    }
    context.push(format!("Applicant: {}", sender_name));

    format!(
        "Generate a professional email subject line for a job application.\n\n\
Context:\n{}\n\n\
Requirements:\n\
- Professional and engaging\n\
- 50 characters or less\n\
- No quotes or special formatting\n\
- Include applicant name\n\n\
Generate only the subject line, nothing else:",
        context.join("\n")
    )
}

/// Deterministic subject used whenever the AI path is unavailable. Always
/// carries the provided or default recipient name and company.
pub fn fallback_subject(
    sender_name: &str,
    recipient_name: Option<&str>,
    company: Option<&str>,
) -> String {
    format!(
        "Application for Position at {} - {} (Attn: {})",
        display_company(company),
        sender_name,
        display_name(recipient_name),
    )
}

fn clean_subject(raw: &str) -> String {
    let mut subject = raw
        .replace(['"', '\''], "")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string();

    if let Some(prefix) = subject.get(..8) {
        if prefix.eq_ignore_ascii_case("subject:") {
            subject = subject[8..].trim().to_string();
        }
    }

    if subject.chars().count() > 80 {
        subject = subject.chars().take(77).collect::<String>() + "...";
    }

    subject
}

fn is_plausible_subject(subject: &str) -> bool {
    if subject.trim().len() < 5 {
        return false;
    }

    // Refusal or meta chatter from the model is worse than the fallback.
    let bad_indicators = [
        "i cannot",
        "i can't",
        "as an ai",
        "sorry",
        "inappropriate",
        "unable to",
        "```",
        "here is",
        "here's a",
        "here are",
    ];

    let lowered = subject.to_lowercase();
    !bad_indicators
        .iter()
        .any(|indicator| lowered.contains(indicator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_carries_defaults_when_nothing_provided() {
        let subject = fallback_subject("John Smith", None, None);
        assert!(subject.contains("Hiring Manager"));
        assert!(subject.contains("your company"));
        assert!(subject.contains("John Smith"));
        assert!(!subject.is_empty());
    }

    #[test]
    fn fallback_carries_provided_values() {
        let subject = fallback_subject("John Smith", Some("Jane Doe"), Some("Acme"));
        assert!(subject.contains("Jane Doe"));
        assert!(subject.contains("Acme"));
        assert_eq!(
            subject,
            fallback_subject("John Smith", Some("Jane Doe"), Some("Acme"))
        );
    }

    #[test]
    fn cleaning_strips_quotes_prefix_and_newlines() {
        assert_eq!(
            clean_subject("\"Subject: Senior Role - Jane\"\n"),
            "Senior Role - Jane"
        );
        assert_eq!(clean_subject("  plain subject  "), "plain subject");
    }

    #[test]
    fn cleaning_caps_length() {
        let long = "x".repeat(200);
        let cleaned = clean_subject(&long);
        assert_eq!(cleaned.chars().count(), 80);
        assert!(cleaned.ends_with("..."));
    }

    #[test]
    fn refusals_and_stubs_are_rejected() {
        assert!(!is_plausible_subject(""));
        assert!(!is_plausible_subject("hey"));
        assert!(!is_plausible_subject("I cannot generate that"));
        assert!(!is_plausible_subject("Here is a subject line for you"));
        assert!(is_plausible_subject("Software Engineer Application - Jane"));
    }

    #[test]
    fn prompt_skips_default_placeholders() {
        let prompt = build_prompt(None, None, "Jane");
        assert!(!prompt.contains("Company:"));
        assert!(!prompt.contains("Recipient:"));
        assert!(prompt.contains("Applicant: Jane"));

        let prompt = build_prompt(Some("Sam"), Some("Acme"), "Jane");
        assert!(prompt.contains("Company: Acme"));
        assert!(prompt.contains("Recipient: Sam"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let client = OllamaClient::new(OllamaConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            model: "mistral".to_string(),
            generate_timeout_seconds: 1,
            probe_timeout_seconds: 1,
        });

        let subject = client.generate_subject(None, None, "Jane Doe").await;
        assert_eq!(subject, fallback_subject("Jane Doe", None, None));
    }

    #[tokio::test]
    async fn custom_subject_bypasses_the_source() {
        struct Exploding;

        #[async_trait]
        impl SubjectSource for Exploding {
            async fn subject_line(
                &self,
                _recipient_name: Option<&str>,
                _company: Option<&str>,
                _sender_name: &str,
            ) -> String {
                panic!("subject source must not be consulted");
            }
        }

        let request = RecipientRequest {
            email: "a@b.com".to_string(),
            name: None,
            company: None,
            bcc: None,
            custom_subject: Some("My own subject".to_string()),
        };

        let subject = resolve_subject(&Exploding, &request, "Jane").await;
        assert_eq!(subject, "My own subject");
    }

    #[tokio::test]
    async fn missing_custom_subject_consults_the_source() {
        struct Canned;

        #[async_trait]
        impl SubjectSource for Canned {
            async fn subject_line(
                &self,
                recipient_name: Option<&str>,
                _company: Option<&str>,
                _sender_name: &str,
            ) -> String {
                format!("canned for {}", display_name(recipient_name))
            }
        }

        let request = RecipientRequest {
            email: "a@b.com".to_string(),
            name: Some("Sam".to_string()),
            company: None,
            bcc: None,
            custom_subject: None,
        };

        let subject = resolve_subject(&Canned, &request, "Jane").await;
        assert_eq!(subject, "canned for Sam");
    }
}
