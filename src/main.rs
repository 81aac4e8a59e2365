//! DocECM command-line client
//!
//! Logs in against a DocECM backend, keeps the session on disk and shows
//! what the backend returned for it.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::{Context, bail};
use clap::Parser;
use dotenvy::dotenv;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use docecm::ClientState;
use docecm::account::{EnrichmentReport, LoginCredentials};
use docecm::config::{Cli, ClientConfig, Command, LogFormat};
use docecm::notify::Snackbar;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    let config = match ClientConfig::from_cli(&cli) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            std::process::exit(1);
        }
    };

    init_tracing(config.logging.format);

    info!(
        name: "client.config.loaded",
        api_url = %config.api.url,
        state_file = %config.session.state_file.display(),
        "Client configuration loaded"
    );

    let state = ClientState::from_config(config)
        .await
        .context("failed to initialize client")?;

    match cli.command.unwrap_or(Command::Status) {
        Command::Login { username, password } => login(&state, username, password).await,
        Command::Restore => restore(&state).await,
        Command::Logout => logout(&state).await,
        Command::Status => status(&state),
        Command::Plugins => plugins(&state),
    }
}

/// Initialize tracing (M-LOG-STRUCTURED)
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(true)), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}

async fn login(state: &ClientState, username: String, password: String) -> anyhow::Result<()> {
    let credentials = LoginCredentials::new(username, password);
    match state.login(&credentials).await {
        Ok(outcome) => {
            print_report(&outcome.enrichment);
            show(&state.notifier.message(format!("Logged in as {}", credentials.username)));
            Ok(())
        }
        Err(err) => {
            show(&state.notifier.error(format!("Login failed: {err}")));
            Err(err.into())
        }
    }
}

async fn restore(state: &ClientState) -> anyhow::Result<()> {
    let Some(handle) = state.account.set_token(state.store().token()) else {
        bail!("no persisted session, run `docecm login` first");
    };
    let report = handle.await.context("enrichment task failed")?;
    print_report(&report);
    state.persist().await?;
    if !report.is_complete() {
        show(&state.notifier.warning("Session restored with missing data"));
    }
    Ok(())
}

async fn logout(state: &ClientState) -> anyhow::Result<()> {
    state.account.logout().await;
    state.persist().await?;
    show(&state.notifier.info("Logged out"));
    Ok(())
}

fn status(state: &ClientState) -> anyhow::Result<()> {
    let summary = state.store().with_state(|s| {
        json!({
            "apiUrl": s.api_url,
            "loggedIn": s.is_logged_in(),
            "role": s.current_role(),
            "user": s.user,
            "contentTypes": s.user_content_types.len(),
            "savedSearches": s.user_saved_searches.len(),
            "searchOperators": s.search_operators.len(),
            "searchStandardFields": s.search_standard_fields.len(),
            "localizationLoaded": s.localization.is_some(),
        })
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn plugins(state: &ClientState) -> anyhow::Result<()> {
    let descriptors: Vec<_> = state.plugins.iter().collect();
    println!("{}", serde_json::to_string_pretty(&descriptors)?);
    Ok(())
}

fn print_report(report: &EnrichmentReport) {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!("  {:<24} ok", outcome.field.to_string()),
            Err(err) => println!("  {:<24} failed: {err}", outcome.field.to_string()),
        }
    }
}

fn show(snackbar: &Snackbar) {
    eprintln!("[{}] {}", snackbar.color, snackbar.text);
}
