use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod console;
mod logging;
mod settings;

use commands::{
    config::ConfigArgs, get::GetArgs, login::LoginArgs, logout::LogoutArgs, nav::NavArgs,
    whoami::WhoamiArgs,
};

/// ATV rental client - sign in and query the rental backend from a terminal
#[derive(Parser)]
#[command(name = "atv")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API origin override (e.g. `http://localhost:8000/api`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Storage origin override for uploaded images
    #[arg(long, global = true)]
    storage_url: Option<String>,

    /// Allow plain-http origins
    #[arg(long, global = true)]
    insecure: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),
    /// Sign out and clear the stored session
    Logout(LogoutArgs),
    /// Show the signed-in user
    Whoami(WhoamiArgs),
    /// GET an API path and print the payload
    Get(GetArgs),
    /// Show which navigation groups the session unlocks
    Nav(NavArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let overrides = settings::Overrides {
        api_url: cli.api_url,
        storage_url: cli.storage_url,
        insecure: cli.insecure,
    };
    let config = settings::load(cli.config.as_deref(), &overrides)?;
    tracing::debug!(api_base_url = %config.api_base_url, "configuration loaded");

    match cli.command {
        Commands::Login(args) => args.run(config).await,
        Commands::Logout(args) => args.run(config).await,
        Commands::Whoami(args) => args.run(config).await,
        Commands::Get(args) => args.run(config).await,
        Commands::Nav(args) => args.run(config),
        Commands::Config(args) => args.run(&config),
    }
}
