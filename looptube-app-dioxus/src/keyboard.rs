//! Shell keyboard handling: key events in, commands out.
//!
//! The actual key-to-command mapping lives in `looptube_core::keys`; this
//! module only builds the dispatch context from the DOM event and executes
//! the resulting command. Text inputs stop propagation on their own keydown
//! handlers, so events arriving here are outside text-editing controls.

use crate::state::UiState;
use dioxus::prelude::*;
use looptube_core::{command_for_key, Command, KeyContext, Session};
use std::sync::Arc;

/// Handle a key event against the session and UI state.
pub fn handle_key_event(event: &KeyboardEvent, session: &Arc<Session>, mut ui: UiState) {
    let ctx = KeyContext {
        has_modifiers: !event.modifiers().is_empty(),
        in_text_input: false,
    };
    let key = event.key().to_string();

    let Some(command) = command_for_key(&key, ctx) else {
        return;
    };
    event.prevent_default();

    match command {
        Command::ToggleControls => ui.toggle_controls(),
        Command::ToggleTheme => ui.toggle_theme(),
        Command::ToggleMirror => ui.toggle_mirror(),
        _ => run_session_command(session, command),
    }
}

fn run_session_command(session: &Arc<Session>, command: Command) {
    let session = session.clone();
    spawn(async move {
        match command {
            Command::PlaySection(index) => session.play_section_by_index(index).await,
            Command::SeekSectionEnd(index) => session.seek_section_end(index).await,
            Command::TogglePlayPause => session.toggle_play_pause().await,
            Command::Mark => {
                // Feedback reaches the UI through the session event bridge
                session.mark().await;
            }
            Command::RateUp => session.rate_up().await,
            Command::RateDown => session.rate_down().await,
            Command::SeekToStart => session.seek_to_start().await,
            Command::SeekBack => session.seek_backward().await,
            Command::SeekForward => session.seek_forward().await,
            Command::ToggleControls | Command::ToggleTheme | Command::ToggleMirror => {}
        }
    });
}
