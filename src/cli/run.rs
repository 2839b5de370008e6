use dialoguer::{theme::ColorfulTheme, Select};

use crate::{
    cli::cli::MenuAction,
    models::{CliApp, Result},
};
use tracing::error;

impl CliApp {
    pub async fn run(&self) -> Result<()> {
        println!("\n🤖 Recruitment Email Agent");
        println!("═══════════════════════════════════════");
        println!("Send personalized recruitment emails with your resume attached.");

        loop {
            let actions = vec![
                MenuAction::SendEmail,
                MenuAction::ShowHistory,
                MenuAction::ShowStatus,
                MenuAction::ReconfigureSender,
                MenuAction::Exit,
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("\nSelect an action")
                .default(0)
                .items(&actions)
                .interact()?;

            match &actions[selection] {
                MenuAction::SendEmail => {
                    if let Err(e) = self.run_send_email().await {
                        error!("Send cycle failed: {}", e);
                    }
                }
                MenuAction::ShowHistory => {
                    if let Err(e) = self.show_history().await {
                        error!("Failed to show history: {}", e);
                    }
                }
                MenuAction::ShowStatus => {
                    if let Err(e) = self.show_status().await {
                        error!("Failed to show status: {}", e);
                    }
                }
                MenuAction::ReconfigureSender => {
                    if let Err(e) = self.run_reconfigure().await {
                        error!("Reconfiguration failed: {}", e);
                    }
                }
                MenuAction::Exit => {
                    println!("\n👋 Thanks for using the Recruitment Email Agent!");
                    break;
                }
            }
        }

        Ok(())
    }
}
