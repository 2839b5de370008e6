use crate::models::{CliApp, Result};

impl CliApp {
    /// Re-run the interactive sender setup, replacing the stored profile.
    pub async fn run_reconfigure(&self) -> Result<()> {
        if let Ok(Some(profile)) = self.profile_store.load().await {
            println!("\nReplacing the existing sender profile:");
            self.profile_store.show_summary(&profile);
        }

        let profile = self.profile_store.run_setup().await?;
        self.profile_store.show_summary(&profile);
        Ok(())
    }
}
