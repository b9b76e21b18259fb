//! Customer account CLI.
//!
//! # Usage
//!
//! ```bash
//! # Show the signed-in customer's profile
//! ACCOUNT_TOKEN=... account-cli profile show
//!
//! # Update profile fields
//! account-cli profile update --set city=Denver --set zipCode=80202
//!
//! # Change password (prompts for each password without echo)
//! account-cli password change
//!
//! # Show recent orders, refreshing twice more
//! account-cli orders --refresh 2
//! ```
//!
//! # Environment Variables
//!
//! - `ACCOUNT_TOKEN` - Bearer token of the signed-in customer
//! - `ACCOUNT_*` - API endpoint, timeout and paging (see `AccountConfig`)
//! - `ACCOUNT_CURRENT_PASSWORD`, `ACCOUNT_NEW_PASSWORD`, `ACCOUNT_CONFIRM_PASSWORD` -
//!   Skip the matching password prompt (non-interactive use)
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - Optional error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use account_core::ProfileField;
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "account-cli")]
#[command(author, version, about = "Customer account CLI")]
struct Cli {
    /// Bearer token of the signed-in customer
    #[arg(long, env = "ACCOUNT_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View or edit the customer's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Manage the customer's password
    Password {
        #[command(subcommand)]
        action: PasswordAction,
    },
    /// Show recent orders and their statistics
    Orders {
        /// Re-fetch the order page this many more times
        #[arg(long, default_value_t = 0)]
        refresh: u32,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show the profile as the server knows it
    Show,
    /// Change one or more fields and save
    Update {
        /// Field assignment, e.g. `city=Denver` (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment, required = true)]
        assignments: Vec<(ProfileField, String)>,
    },
}

#[derive(Subcommand)]
enum PasswordAction {
    /// Change the password, prompting for any password not set in the environment
    Change,
}

fn parse_assignment(s: &str) -> Result<(ProfileField, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{s}`"))?;
    Ok((field.trim().parse()?, value.to_owned()))
}

/// Initialize Sentry error tracking when `SENTRY_DSN` is set.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "account_client=info,account_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let token = SecretString::from(cli.token);
    let account = commands::connect(token).await?;

    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&account),
            ProfileAction::Update { assignments } => {
                commands::profile::update(&account, assignments).await?;
            }
        },
        Commands::Password { action } => match action {
            PasswordAction::Change => {
                let input = commands::password::PasswordInput::from_env_or_prompt()?;
                commands::password::change(&account, input).await?;
            }
        },
        Commands::Orders { refresh } => commands::orders::show(&account, refresh).await?,
    }
    Ok(())
}
