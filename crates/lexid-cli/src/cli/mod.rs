//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;

use lexid_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "lexid")]
#[command(version)]
#[command(about = "Citizen account client for the lexid legal-services platform")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        /// Route to land on after signing in (recorded by redirects)
        #[arg(long, value_name = "ROUTE")]
        return_to: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the stored-session status
    Status,

    /// Show the signed-in citizen profile (authenticated screen)
    Profile,

    /// Register a new citizen account (with email verification)
    Register,

    /// Request a password-reset email
    ForgotPassword,

    /// Complete a password reset with the emailed token
    ResetPassword {
        /// Reset token from the emailed link
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    tracing::debug!(base_url = %config.effective_api_base_url(), "configuration loaded");

    match cli.command {
        Commands::Login { return_to } => commands::auth::login(&config, return_to.as_deref()).await,
        Commands::Logout => commands::auth::logout(&config).await,
        Commands::Status => commands::auth::status(),
        Commands::Profile => commands::auth::profile(&config).await,
        Commands::Register => commands::register::run(&config).await,
        Commands::ForgotPassword => commands::password::forgot(&config).await,
        Commands::ResetPassword { token } => {
            commands::password::reset(&config, token.as_deref()).await
        }

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
