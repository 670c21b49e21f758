mod app;
mod bridge;
mod components;
mod keyboard;
mod state;
mod theme;

use crate::app::{apply_url_input, App};
use crate::bridge::{spawn_player_bridge, use_session_bridge};
use crate::state::UiState;
use crate::theme::ThemePreference;
use dioxus::desktop::{LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use looptube_core::{
    sections_or_default, CoreError, LooptubeConfig, Session, DEFAULT_VIDEO_ID,
};
use looptube_youtube::{IframePlayer, VideoId};
use std::fs::File;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const APP_NAME: &str = "Looptube";

fn main() {
    // Initialize logging with optional file output
    // Check config for logging.enabled before full config load
    let file_logging_enabled = check_file_logging_enabled();
    init_tracing(file_logging_enabled);

    // Load config, creating a commented template on first run. The app is
    // fully usable with defaults, so config problems degrade rather than
    // abort.
    let config = match LooptubeConfig::load_or_create() {
        Ok(config) => config,
        Err(CoreError::ConfigParseError(parse_error)) => {
            warn!(
                "Config file has a syntax error, using defaults: {}",
                parse_error
            );
            LooptubeConfig::default()
        }
        Err(e) => {
            warn!("Failed to load config, using defaults: {}", e);
            LooptubeConfig::default()
        }
    };

    // Initialize the session engine
    let session = Session::new(config.playback.clone());

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    // Set up Ctrl+C handler to trigger graceful shutdown
    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_token.cancel();
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    let window = WindowBuilder::new()
        .with_title(APP_NAME)
        .with_resizable(true)
        .with_inner_size(LogicalSize::new(1280.0, 800.0));

    let dioxus_config = dioxus::desktop::Config::default()
        .with_window(window)
        .with_disable_context_menu(true);

    // Launch the Dioxus application with the session, config and token
    // injected before launch
    dioxus::LaunchBuilder::desktop()
        .with_cfg(dioxus_config)
        .with_context(session)
        .with_context(config)
        .with_context(cancel_token)
        .launch(root);
}

/// Root component that sets up context, bridges and startup hydration
fn root() -> Element {
    let ui = use_context_provider(UiState::new);
    let session: Arc<Session> = use_context();
    let cancel_token: CancellationToken = use_context();

    // Bridge session events to Dioxus signals
    use_session_bridge(session.clone(), ui);

    // Startup: theme, default hydration, player attachment
    use_future(move || {
        let session = session.clone();
        let cancel_token = cancel_token.clone();
        async move {
            initialize(&session, ui).await;

            // Tear the boundary poll down with the rest of the app
            cancel_token.cancelled().await;
            session.shutdown().await;
        }
    });

    rsx! {
        document::Title { "{APP_NAME}" }
        App {}
    }
}

/// One-shot startup: theme preference, default video and sections, player
/// bridge wiring.
async fn initialize(session: &Arc<Session>, mut ui: UiState) {
    // Persisted preference wins; otherwise ask the webview for the system
    // preference and default to light.
    let theme = match ThemePreference::load() {
        Some(theme) => theme,
        None => theme::detect_system()
            .await
            .unwrap_or(ThemePreference::Light),
    };
    ui.theme.set(theme);

    // No share URL was supplied, so hydrate the documented defaults.
    session.replace_sections(sections_or_default(None)).await;
    if let Ok(id) = VideoId::extract(DEFAULT_VIDEO_ID) {
        apply_url_input(&id.watch_url(), session, ui);
    }

    // One player proxy for the lifetime of the app; the iframe it speaks to
    // is swapped underneath it when the video changes.
    let (player, commands) = IframePlayer::new();
    spawn_player_bridge(player.clone(), commands);
    session.attach_player(Some(player)).await;

    info!("Startup complete");
}

/// Check if file logging is enabled by reading the config file.
/// This is done before full config loading to set up tracing first.
/// Returns `false` if config doesn't exist or can't be parsed.
fn check_file_logging_enabled() -> bool {
    // Minimal structs to parse just the logging.enabled field
    #[derive(serde::Deserialize)]
    struct PartialConfig {
        #[serde(default)]
        logging: PartialLoggingConfig,
    }
    #[derive(serde::Deserialize, Default)]
    struct PartialLoggingConfig {
        #[serde(default)]
        enabled: bool,
    }

    let config_path = LooptubeConfig::config_path();
    let Ok(content) = std::fs::read_to_string(&config_path) else {
        return false;
    };

    toml::from_str::<PartialConfig>(&content)
        .map(|c| c.logging.enabled)
        .unwrap_or(false)
}

/// Initialize tracing with console output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer();

    if file_logging_enabled {
        let log_path = looptube_core::log_file_path();

        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
