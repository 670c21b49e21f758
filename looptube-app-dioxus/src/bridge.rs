use crate::state::UiState;
use dioxus::prelude::*;
use looptube_core::{Session, SessionEvent};
use looptube_youtube::{IframePlayer, PlayerCommand, PLAYER_IFRAME_ID};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "looptube::bridge";

/// Host-page script that subscribes to the player iframe's status stream and
/// relays every message back to the shell.
const PLAYER_LISTENER_JS: &str = include_str!("../assets/player_bridge.js");

/// Bridge [`Session`] events to Dioxus signals.
/// Spawns an async task that listens to session events and updates the
/// mirrored UI state accordingly.
pub fn use_session_bridge(session: Arc<Session>, ui: UiState) {
    use_future(move || {
        let session = session.clone();
        async move {
            let mut rx = session.subscribe();

            loop {
                match rx.recv().await {
                    Ok(event) => {
                        handle_session_event(event, ui);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        info!(target: LOG_TARGET, "Session event channel closed");
                        break;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        info!(target: LOG_TARGET, "Missed {} session events", n);
                    }
                }
            }
        }
    });
}

fn handle_session_event(event: SessionEvent, mut ui: UiState) {
    debug!(target: LOG_TARGET, "Session event: {:?}", event);
    ui.apply_session_event(event);
}

/// Wire an [`IframePlayer`] to the webview: drain its command stream into
/// `postMessage` JavaScript and feed iframe status messages back into it.
pub fn spawn_player_bridge(
    player: Arc<IframePlayer>,
    mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
) {
    // Command pump: player proxy -> iframe
    spawn(async move {
        while let Some(command) = commands.recv().await {
            let _ = document::eval(&command.to_post_message_js(PLAYER_IFRAME_ID));
        }
        info!(target: LOG_TARGET, "Player command stream ended");
    });

    // Status stream: iframe -> player proxy
    spawn(async move {
        let mut eval = document::eval(PLAYER_LISTENER_JS);
        loop {
            match eval.recv::<String>().await {
                Ok(message) => {
                    if let Err(e) = player.apply_status(&message).await {
                        debug!(target: LOG_TARGET, "Ignoring unparseable player message: {}", e);
                    }
                }
                Err(e) => {
                    warn!(target: LOG_TARGET, "Player status stream ended: {:?}", e);
                    break;
                }
            }
        }
    });
}

/// Write text to the system clipboard through the webview.
pub fn copy_to_clipboard(text: &str) {
    // {:?} produces a valid JS string literal
    let _ = document::eval(&format!("navigator.clipboard.writeText({text:?});"));
}
