use anyhow::Result;
use atv_client::AppConfig;
use atv_client::ui::{NavUser, role_badge};
use clap::Args;

#[derive(Args)]
pub struct WhoamiArgs {
    /// Fetch the profile from the server before printing
    #[arg(long)]
    refresh: bool,
}

impl WhoamiArgs {
    pub async fn run(&self, config: AppConfig) -> Result<()> {
        let ctx = super::open_context(config, "profile.html", false)?;
        if !ctx.auth().require_auth() {
            anyhow::bail!("not signed in; run `atv login <email>` first");
        }

        let profile = if self.refresh {
            ctx.auth_api()
                .refresh_profile()
                .await
                .map_err(|e| super::api_failure(&e))?
        } else {
            ctx.session()
                .current_user()
                .ok_or_else(|| anyhow::anyhow!("stored profile is missing or unreadable"))?
        };
        let user = NavUser::from_profile(&profile, ctx.config());
        let badge = role_badge(profile.role.as_str());

        println!("{}", user.full_name);
        println!("  email:  {}", user.email);
        println!("  role:   {} ({})", badge.label, badge.class);
        println!("  avatar: {}", user.avatar_url);
        Ok(())
    }
}
