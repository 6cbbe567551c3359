use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dashauth::config::ConfigError;
use dashauth::store::StoreError;
use dashauth::{AuthConfig, AuthError, AuthFlow, FileStore, HttpIdentityApi, LayoutPrefs, SignInFormData, ThemeMode};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "dashauth", about = "Dashboard sign-in and session cache")]
struct Cli {
    /// Identity backend base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Session store file.
    #[arg(long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and cache the session.
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DASHAUTH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the cached session.
    Signout,
    /// Print the cached user, or `null`.
    Whoami,
    /// Show or change the theme mode.
    Theme { mode: Option<ThemeArg> },
    /// Show or change the drawer state.
    Drawer { state: Option<DrawerArg> },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DrawerArg {
    Open,
    Close,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = apply_overrides(AuthConfig::from_env()?, cli.base_url.as_deref(), cli.store_path);
    run(cli.command, &config, &mut std::io::stdout()).await
}

/// Command-line flags win over the environment.
fn apply_overrides(mut config: AuthConfig, base_url: Option<&str>, store_path: Option<PathBuf>) -> AuthConfig {
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(store_path) = store_path {
        config = config.with_store_path(store_path);
    }
    config
}

async fn run(command: Command, config: &AuthConfig, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Signin { email, password } => run_signin(config, SignInFormData::new(email, password), out).await,
        Command::Signout => run_signout(config, out).await,
        Command::Whoami => run_whoami(config, out),
        Command::Theme { mode } => run_theme(config, mode, out),
        Command::Drawer { state } => run_drawer(config, state, out),
    }
}

fn open_flow(config: &AuthConfig) -> Result<AuthFlow<HttpIdentityApi, FileStore>, CliError> {
    let api = HttpIdentityApi::new(&config.base_url, config.timeouts)?;
    let store = FileStore::open(&config.store_path)?;
    Ok(AuthFlow::new(api, store)?)
}

async fn run_signin(config: &AuthConfig, form: SignInFormData, out: &mut impl Write) -> Result<(), CliError> {
    let mut flow = open_flow(config)?;
    tracing::info!(base_url = %config.base_url, email = %form.email, "signing in");
    let user = flow.sign_in(&form).await?;
    print_json(out, &user)
}

async fn run_signout(config: &AuthConfig, out: &mut impl Write) -> Result<(), CliError> {
    let mut flow = open_flow(config)?;
    let payload = flow.sign_out().await?;
    print_json(out, &payload)
}

fn run_whoami(config: &AuthConfig, out: &mut impl Write) -> Result<(), CliError> {
    let flow = open_flow(config)?;
    print_json(out, &flow.user())
}

fn run_theme(config: &AuthConfig, mode: Option<ThemeArg>, out: &mut impl Write) -> Result<(), CliError> {
    let mut prefs = LayoutPrefs::new(FileStore::open(&config.store_path)?);
    let theme = match mode {
        None => prefs.theme(),
        Some(ThemeArg::Light) => prefs.set_theme(ThemeMode::Light)?,
        Some(ThemeArg::Dark) => prefs.set_theme(ThemeMode::Dark)?,
        Some(ThemeArg::Toggle) => prefs.toggle_theme()?,
    };
    writeln!(out, "{theme}")?;
    Ok(())
}

fn run_drawer(config: &AuthConfig, state: Option<DrawerArg>, out: &mut impl Write) -> Result<(), CliError> {
    let mut prefs = LayoutPrefs::new(FileStore::open(&config.store_path)?);
    match state {
        None => {}
        Some(DrawerArg::Open) => prefs.open_drawer()?,
        Some(DrawerArg::Close) => prefs.close_drawer()?,
    }
    writeln!(out, "{}", if prefs.drawer_open() { "open" } else { "closed" })?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<(), CliError> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
