use anyhow::{Context, Result};
use atv_client::AppConfig;
use atv_client::messages::{Area, lookup};
use atv_client::ui::Toast;
use clap::Args;
use secrecy::SecretString;
use std::io::BufRead;

#[derive(Args)]
pub struct LoginArgs {
    /// Email or username
    email: String,
    /// Read the password from the first line of stdin
    #[arg(long)]
    password_stdin: bool,
}

impl LoginArgs {
    pub async fn run(&self, config: AppConfig) -> Result<()> {
        let entry = config.entry_page.clone();
        let ctx = super::open_context(config, &entry, false)?;

        if ctx.auth().redirect_if_authenticated() {
            if let Some(user) = ctx.nav_user() {
                println!("Already signed in as {} <{}>", user.full_name, user.email);
            }
            return Ok(());
        }

        let password = self.read_password()?;
        let user = ctx
            .auth_api()
            .login(&self.email, &password)
            .await
            .map_err(|e| super::api_failure(&e))?;

        if let Some(message) = lookup(Area::Auth, "loginSuccess") {
            ctx.notify(Toast::success(message));
        }
        println!("Signed in as {} ({})", user.full_name(), user.role);
        ctx.navigator().navigate(&ctx.config().landing_page);
        Ok(())
    }

    fn read_password(&self) -> Result<SecretString> {
        if !self.password_stdin {
            eprint!("Password: ");
        }
        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read password")?;
        let password = line.trim_end_matches(['\r', '\n']);
        if password.is_empty() {
            anyhow::bail!("password must not be empty");
        }
        Ok(SecretString::from(password))
    }
}
