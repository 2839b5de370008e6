use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::models::Result;

/// One send attempt, successful or not. Field names are part of the on-disk
/// format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub timestamp: String,
    pub recipient: String,
    pub company: Option<String>,
    pub subject: String,
    pub success: bool,
    pub error: Option<String>,
}

impl ActivityRecord {
    pub fn new(
        recipient: &str,
        company: Option<&str>,
        subject: &str,
        success: bool,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            recipient: recipient.to_string(),
            company: company.map(str::to_string),
            subject: subject.to_string(),
            success,
            error,
        }
    }
}

/// Append-only JSON list of send attempts.
///
/// Single interactive process, single writer: there is no cross-process
/// locking, and concurrent use of the same log file is undefined.
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read existing entries, append, rewrite. An absent or unreadable file
    /// starts a fresh list; prior entries are otherwise preserved verbatim.
    pub async fn record(&self, entry: ActivityRecord) -> Result<()> {
        let mut entries = self.read_all().await;
        entries.push(entry);

        let json = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, json).await?;
        debug!(
            "Recorded send attempt #{} in {}",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }

    pub async fn read_all(&self) -> Vec<ActivityRecord> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    "Activity log {} is unreadable ({}). Starting a fresh log.",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Last `count` entries in attempt order.
    pub async fn recent(&self, count: usize) -> Vec<ActivityRecord> {
        let entries = self.read_all().await;
        let skip = entries.len().saturating_sub(count);
        entries.into_iter().skip(skip).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(recipient: &str, success: bool) -> ActivityRecord {
        ActivityRecord::new(
            recipient,
            Some("Acme"),
            "Subject",
            success,
            if success {
                None
            } else {
                Some("SMTP sending failed".to_string())
            },
        )
    }

    #[tokio::test]
    async fn mixed_attempts_are_kept_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("sent_emails.json"));

        log.record(entry("first@example.com", true)).await.unwrap();
        log.record(entry("second@example.com", false)).await.unwrap();
        log.record(entry("third@example.com", true)).await.unwrap();

        let entries = log.read_all().await;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].recipient, "first@example.com");
        assert_eq!(entries[1].recipient, "second@example.com");
        assert_eq!(entries[2].recipient, "third@example.com");
        assert!(entries[0].success);
        assert!(!entries[1].success);
        assert_eq!(
            entries[1].error.as_deref(),
            Some("SMTP sending failed")
        );
        assert!(entries[2].success);
    }

    #[tokio::test]
    async fn prior_entries_survive_appends_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("sent_emails.json"));

        log.record(entry("keep@example.com", true)).await.unwrap();
        let before = log.read_all().await;

        log.record(entry("new@example.com", true)).await.unwrap();
        let after = log.read_all().await;

        assert_eq!(after.len(), 2);
        assert_eq!(after[0].timestamp, before[0].timestamp);
        assert_eq!(after[0].recipient, before[0].recipient);
        assert_eq!(after[0].subject, before[0].subject);
    }

    #[tokio::test]
    async fn malformed_log_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent_emails.json");
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let log = ActivityLog::new(path);
        assert!(log.read_all().await.is_empty());

        log.record(entry("only@example.com", true)).await.unwrap();
        assert_eq!(log.read_all().await.len(), 1);
    }

    #[tokio::test]
    async fn recent_returns_the_tail_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path().join("sent_emails.json"));

        for i in 0..7 {
            log.record(entry(&format!("r{}@example.com", i), true))
                .await
                .unwrap();
        }

        let recent = log.recent(5).await;
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].recipient, "r2@example.com");
        assert_eq!(recent[4].recipient, "r6@example.com");

        assert_eq!(log.recent(50).await.len(), 7);
    }
}
