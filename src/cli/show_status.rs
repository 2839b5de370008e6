use std::path::Path;

use crate::models::{CliApp, Result};
use crate::resume::{find_resume_files, format_file_size};

impl CliApp {
    /// One-screen health check: sender profile, resume inventory, SMTP
    /// credentials, and the local AI service.
    pub async fn show_status(&self) -> Result<()> {
        println!("\n══════════════════════════════════════════════════");
        println!("🔍 SYSTEM STATUS");
        println!("══════════════════════════════════════════════════");

        match self.profile_store.load().await {
            Ok(Some(profile)) => {
                println!("📋 Configuration: ✅ Loaded");
                self.profile_store.show_summary(&profile);

                println!("\n📧 Email Setup:");
                match self.sender.test_connection(&profile).await {
                    Ok(true) => println!("   ✅ SMTP connection and authentication working"),
                    Ok(false) => println!("   ❌ SMTP connection test failed"),
                    Err(e) => println!("   ❌ {}", e),
                }
            }
            Ok(None) => {
                println!("📋 Configuration: ❌ Missing (setup runs before the first send)");
            }
            Err(e) => {
                println!("📋 Configuration: ⚠️  Invalid ({})", e);
            }
        }

        let files = find_resume_files(Path::new(&self.config.storage.resume_directory));
        println!("\n📄 Resume Files: {} found", files.len());
        for file in files.iter().take(3) {
            println!(
                "   📎 {} ({})",
                file.file_name(),
                format_file_size(file.size)
            );
        }

        println!("\n🤖 AI Status:");
        let status = self.ollama.status().await;
        println!(
            "   Ollama Service: {}",
            if status.running {
                "✅ Running"
            } else {
                "❌ Not Running"
            }
        );
        println!(
            "   Model Available: {}",
            if status.model_available {
                "✅ Ready"
            } else {
                "❌ Not Found"
            }
        );
        if !status.available_models.is_empty() {
            let shown: Vec<&str> = status
                .available_models
                .iter()
                .take(3)
                .map(String::as_str)
                .collect();
            println!("   Available Models: {}", shown.join(", "));
        }

        println!("\n══════════════════════════════════════════════════");
        Ok(())
    }
}
