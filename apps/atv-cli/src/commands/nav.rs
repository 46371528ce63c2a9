use anyhow::Result;
use atv_client::AppConfig;
use clap::Args;

#[derive(Args)]
pub struct NavArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

impl NavArgs {
    /// Show which navigation groups the current session unlocks.
    pub fn run(&self, config: AppConfig) -> Result<()> {
        let entry = config.entry_page.clone();
        let ctx = super::open_context(config, &entry, false)?;
        let vis = ctx.nav_visibility();
        let groups = [
            ("nav-guest", vis.guest),
            ("nav-user", vis.user),
            ("nav-manage", vis.manage),
            ("nav-admin", vis.admin),
        ];
        let user = ctx.nav_user();

        if self.json {
            let visible: Vec<&str> = groups
                .iter()
                .filter(|(_, shown)| *shown)
                .map(|(g, _)| *g)
                .collect();
            let value = serde_json::json!({
                "groups": visible,
                "user": user.as_ref().map(|u| serde_json::json!({
                    "name": u.first_name,
                    "role": u.role_label,
                    "avatar": u.avatar_url,
                })),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        for (group, shown) in groups {
            println!("{group:<11} {}", if shown { "shown" } else { "hidden" });
        }
        if let Some(user) = user {
            println!("{} ({})", user.first_name, user.role_label);
        }
        Ok(())
    }
}
