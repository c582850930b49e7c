//! Terminal front-end for the domain status panel.
//!
//! Polls the domain-list API and prints the panel; logs go to stderr so the
//! panel itself can be piped.

mod cli;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use domain_panel_app::adapters::JsonFilePreferenceStore;
use domain_panel_app::config::{AppConfig, PREFERENCES_FILE_NAME};
use domain_panel_app::{PanelState, PanelStateBuilder};
use domain_panel_core::traits::SharedViewport;
use domain_panel_core::types::ViewMode;
use domain_panel_provider::create_domain_api;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing to stderr (stdout carries the panel)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_path()
            .context("cannot determine the configuration directory, pass --config")?,
    };
    let config = AppConfig::load(&config_path)
        .await?
        .apply_env()
        .with_api_base_override(cli.api_base);
    config.validate()?;
    tracing::debug!("Configuration: {config:?}");

    let preferences = preferences_path(&config_path);
    let state = build_state(&config, preferences)?;

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => watch(&state).await.map(|()| ExitCode::SUCCESS),
        Command::Show { json } => show(&state, json).await,
        Command::SetView { mode } => set_view(&state, mode).await.map(|()| ExitCode::SUCCESS),
    }
}

fn preferences_path(config_path: &std::path::Path) -> PathBuf {
    config_path.parent().map_or_else(
        || PathBuf::from(PREFERENCES_FILE_NAME),
        |dir| dir.join(PREFERENCES_FILE_NAME),
    )
}

fn build_state(config: &AppConfig, preferences: PathBuf) -> Result<PanelState> {
    let domain_api = create_domain_api(&config.api_base_url)
        .with_context(|| format!("invalid API base URL '{}'", config.api_base_url))?;

    let state = PanelStateBuilder::new()
        .domain_api(domain_api)
        .preference_store(Arc::new(JsonFilePreferenceStore::new(preferences)))
        .viewport(Arc::new(SharedViewport::new(config.viewport_width)))
        .overrides(config.overrides.clone())
        .settings(config.settings())
        .build()?;
    Ok(state)
}

fn print_panel(state: &PanelState) {
    let snapshot = state.domain_cache.state();
    print!(
        "{}",
        render::render_panel(
            &state.current_view(),
            state.total_domains(),
            snapshot.updated_at
        )
    );
}

async fn watch(state: &PanelState) -> Result<()> {
    let mut data_rx = state.domain_cache.subscribe();
    let mut mode_rx = state.view_mode.subscribe();

    state.start().await;
    print_panel(state);

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = &mut interrupted => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            changed = data_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_panel(state);
            }
            changed = mode_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                print_panel(state);
            }
        }
    }

    state.shutdown();
    Ok(())
}

/// A failed fetch renders the hidden panel and exits with status 1.
async fn show(state: &PanelState, json: bool) -> Result<ExitCode> {
    state.view_mode.init().await?;
    // 失败已由缓存记录日志，面板随之隐藏
    let fetched = state.domain_cache.refetch().await.is_ok();

    if json {
        println!("{}", render::render_json(&state.current_view())?);
    } else {
        print_panel(state);
    }
    Ok(if fetched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn set_view(state: &PanelState, mode: ViewMode) -> Result<()> {
    let effective = state.view_mode.set_mode(mode).await?;
    println!("Preferred view: {mode}");
    if effective != mode {
        println!("Effective view: {effective} (overridden by configuration or viewport)");
    }
    Ok(())
}
