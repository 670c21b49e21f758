use crate::bridge;
use crate::components::{SectionsTable, SpeedControls};
use crate::keyboard;
use crate::state::UiState;
use dioxus::prelude::*;
use looptube_core::{
    decode_sections, share_url, LooptubeConfig, Session, SECTIONS_PARAM, VIDEO_PARAM,
};
use looptube_youtube::{VideoId, PLAYER_IFRAME_ID};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

/// Embedded stylesheet with light/dark variants.
const APP_CSS: &str = include_str!("../assets/app.css");

/// Root application component: player pane plus the controls panel.
#[component]
pub fn App() -> Element {
    let ui = use_context::<UiState>();
    let session = use_context::<Arc<Session>>();

    let theme_class = ui.theme.read().class_name();
    let controls_visible = *ui.controls_visible.read();
    let mirrored = *ui.mirrored.read();
    let mark_pending = *ui.pending_mark.read();

    let key_session = session.clone();
    let on_key = move |evt: KeyboardEvent| {
        keyboard::handle_key_event(&evt, &key_session, ui);
    };

    let panel_class = if controls_visible {
        "controls-panel"
    } else {
        "controls-panel hidden"
    };
    let frame_class = if mirrored {
        "player-frame mirrored"
    } else {
        "player-frame"
    };

    rsx! {
        style { {APP_CSS} }
        div {
            class: "app {theme_class}",
            tabindex: "0",
            autofocus: true,
            onkeydown: on_key,

            div { class: frame_class, PlayerPane {} }

            div { class: "edge-buttons",
                button {
                    class: "edge",
                    title: "Toggle controls (B)",
                    onclick: move |_| {
                        let mut ui = ui;
                        ui.toggle_controls();
                    },
                    if controls_visible { "\u{25b8}" } else { "\u{25c2}" }
                }
                button {
                    class: "edge",
                    title: "Toggle theme (M)",
                    onclick: move |_| {
                        let mut ui = ui;
                        ui.toggle_theme();
                    },
                    if theme_class == "dark" { "\u{2600}" } else { "\u{263d}" }
                }
            }

            div { class: panel_class,
                if controls_visible {
                    ControlsPanel {}
                }
            }

            if mark_pending.is_some() {
                div { class: "mark-indicator", "Marking\u{2026} press [ again to end the section" }
            }
        }
    }
}

/// The embedded player, or a placeholder until a video is recognized.
#[component]
fn PlayerPane() -> Element {
    let ui = use_context::<UiState>();
    let video_id = ui.video_id.read().clone();
    let url_text_empty = ui.url_text.read().is_empty();

    match video_id {
        Some(id) => rsx! {
            iframe {
                id: PLAYER_IFRAME_ID,
                class: "player",
                src: id.embed_url(),
                allow: "autoplay; encrypted-media",
            }
        },
        None => rsx! {
            div { class: "player placeholder",
                if url_text_empty {
                    "Enter a YouTube URL to play a video"
                } else {
                    "Enter a valid YouTube URL to play a video"
                }
            }
        },
    }
}

/// The right-hand panel: URL input, speed controls, sections, share button.
#[component]
fn ControlsPanel() -> Element {
    let ui = use_context::<UiState>();
    let session = use_context::<Arc<Session>>();
    let config = use_context::<LooptubeConfig>();

    let url_text = ui.url_text.read().clone();
    let mark_notice = ui.mark_notice.read().clone().unwrap_or_default();
    let url_copied = *ui.url_copied.read();
    let video_id = ui.video_id.read().clone();
    let sections_empty = ui.sections.read().is_empty();

    let input_session = session.clone();
    let on_url_change = move |evt: FormEvent| {
        apply_url_input(&evt.value(), &input_session, ui);
    };

    let copy_session = session;
    let on_copy = move |_| {
        let Some(id) = ui.video_id.read().clone() else {
            return;
        };
        let session = copy_session.clone();
        let base_url = config.share.base_url.clone();
        let mut ui = ui;
        spawn(async move {
            let sections = session.sections().await;
            match share_url(&base_url, id.as_str(), &sections) {
                Ok(share) => {
                    bridge::copy_to_clipboard(share.as_str());
                    ui.url_copied.set(true);
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    ui.url_copied.set(false);
                }
                Err(e) => warn!("Failed to compose share URL: {}", e),
            }
        });
    };

    rsx! {
        div { class: "controls-inner",
            div { class: "field",
                label { "YouTube URL" }
                input {
                    class: "url-input",
                    value: "{url_text}",
                    placeholder: "https://www.youtube.com/watch?v=...",
                    onchange: on_url_change,
                    onkeydown: |evt| evt.stop_propagation(),
                }
            }

            div { class: "field",
                label { "Playback Speed" }
                SpeedControls {}
            }

            div { class: "field",
                label { "Loop Sections" }
                SectionsTable {}
                if !mark_notice.is_empty() {
                    div { class: "mark-notice", "{mark_notice}" }
                }
                button {
                    class: "share",
                    disabled: video_id.is_none() || sections_empty,
                    onclick: on_copy,
                    if url_copied { "Copied!" } else { "Copy Shareable URL" }
                }
            }
        }
    }
}

/// Hydrate video and sections from user-entered text.
///
/// A pasted share URL supplies both the `v` and `s` parameters; any other
/// recognized YouTube URL shape (or a bare id) supplies just the video.
pub fn apply_url_input(text: &str, session: &Arc<Session>, mut ui: UiState) {
    ui.url_text.set(text.to_string());

    if let Ok(parsed) = Url::parse(text) {
        let sections_param = parsed
            .query_pairs()
            .find(|(key, _)| key == SECTIONS_PARAM)
            .map(|(_, value)| value.into_owned());
        if let Some(token) = sections_param {
            match decode_sections(&token) {
                Ok(sections) => {
                    info!("Hydrating {} sections from pasted share URL", sections.len());
                    let session = session.clone();
                    spawn(async move {
                        session.replace_sections(sections).await;
                    });
                }
                Err(e) => warn!("Ignoring unusable sections parameter: {}", e),
            }
        }

        let video_param = parsed
            .query_pairs()
            .find(|(key, _)| key == VIDEO_PARAM)
            .map(|(_, value)| value.into_owned());
        if let Some(video) = video_param {
            if let Ok(id) = VideoId::extract(&video) {
                info!("Loading video from pasted URL parameter: {}", id);
                ui.video_id.set(Some(id));
                return;
            }
        }
    }

    match VideoId::extract(text) {
        Ok(id) => {
            info!("Loading video: {}", id);
            ui.video_id.set(Some(id));
        }
        Err(_) => {
            ui.video_id.set(None);
        }
    }
}
