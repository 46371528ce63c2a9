use anyhow::Result;
use atv_client::{AppConfig, LogoutOutcome};
use clap::Args;

#[derive(Args)]
pub struct LogoutArgs {
    /// Skip the confirmation question
    #[arg(short, long)]
    yes: bool,
}

impl LogoutArgs {
    pub async fn run(&self, config: AppConfig) -> Result<()> {
        let landing = config.landing_page.clone();
        let ctx = super::open_context(config, &landing, self.yes)?;

        if !ctx.session().is_authenticated() {
            println!("Not signed in");
            return Ok(());
        }

        match ctx.auth().logout(!self.yes).await {
            LogoutOutcome::LoggedOut => println!("Signed out"),
            LogoutOutcome::Cancelled => println!("Logout cancelled"),
        }
        Ok(())
    }
}
