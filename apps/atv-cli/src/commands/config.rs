use anyhow::Result;
use atv_client::AppConfig;
use clap::Args;

#[derive(Args)]
pub struct ConfigArgs {
    /// Print as JSON instead of YAML
    #[arg(long)]
    json: bool,
}

impl ConfigArgs {
    /// Print the effective configuration.
    pub fn run(&self, config: &AppConfig) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            print!("{}", crate::settings::to_yaml(config)?);
        }
        Ok(())
    }
}
