use chrono::DateTime;

use crate::models::{CliApp, Result};

const HISTORY_COUNT: usize = 5;

impl CliApp {
    /// Show the most recent send attempts from the activity log, newest first.
    pub async fn show_history(&self) -> Result<()> {
        let records = self.activity.recent(HISTORY_COUNT).await;

        if records.is_empty() {
            println!("📪 No email history found.");
            return Ok(());
        }

        println!("\n📊 Last {} emails:", records.len());
        println!("--------------------------------------------------");

        for record in records.iter().rev() {
            let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|_| record.timestamp.clone());
            let status = if record.success {
                "✅ Sent"
            } else {
                "❌ Failed"
            };

            println!("{} | {}", timestamp, status);
            println!("   📧 To: {}", record.recipient);
            if let Some(company) = record.company.as_deref() {
                println!("   🏢 Company: {}", company);
            }
            println!("   📝 Subject: {}", record.subject);
            if !record.success {
                if let Some(error) = record.error.as_deref() {
                    println!("   ⚠️  Error: {}", error);
                }
            }
            println!();
        }

        Ok(())
    }
}
