use crate::state::UiState;
use dioxus::prelude::*;
use looptube_core::{LooptubeConfig, Session};
use std::sync::Arc;

const PRESET_SPEEDS: [f64; 3] = [0.5, 0.75, 1.0];

fn preset_labels() -> [(f64, String); 3] {
    PRESET_SPEEDS.map(|preset| {
        let label = if (preset - 1.0).abs() < f64::EPSILON {
            "1.0x".to_string()
        } else {
            format!("{preset:.2}x")
        };
        (preset, label)
    })
}

/// Playback-speed controls: slider, stepper input and preset buttons.
#[component]
pub fn SpeedControls() -> Element {
    let ui = use_context::<UiState>();
    let session = use_context::<Arc<Session>>();
    let config = use_context::<LooptubeConfig>();
    let rate = *ui.playback_rate.read();

    let slider_session = session.clone();
    let on_slider = move |evt: FormEvent| {
        if let Ok(value) = evt.value().parse::<f64>() {
            let session = slider_session.clone();
            spawn(async move {
                session.set_playback_rate(value).await;
            });
        }
    };

    let input_session = session.clone();
    let on_input_commit = move |evt: FormEvent| {
        let session = input_session.clone();
        // Unparseable text falls back to the lowest rate, like the stepper
        let value = evt.value().parse::<f64>().unwrap_or(config.playback.rate_min);
        spawn(async move {
            session.set_playback_rate(value).await;
        });
    };

    let down_session = session.clone();
    let on_down = move |_| {
        let session = down_session.clone();
        spawn(async move {
            session.rate_down().await;
        });
    };

    let up_session = session.clone();
    let on_up = move |_| {
        let session = up_session.clone();
        spawn(async move {
            session.rate_up().await;
        });
    };

    rsx! {
        div { class: "speed-controls",
            div { class: "speed-row",
                input {
                    r#type: "range",
                    class: "speed-slider",
                    min: "0.25",
                    max: "2",
                    step: "0.01",
                    value: "{rate}",
                    oninput: on_slider,
                }
                div { class: "speed-stepper",
                    button { class: "step", title: "Decrease speed (-)", onclick: on_down, "\u{2212}" }
                    input {
                        class: "speed-value",
                        value: format!("{rate:.2}"),
                        onchange: on_input_commit,
                        onkeydown: |evt| evt.stop_propagation(),
                    }
                    button { class: "step", title: "Increase speed (+)", onclick: on_up, "+" }
                }
            }
            div { class: "speed-presets",
                for (preset, label) in preset_labels() {
                    button {
                        class: if (rate - preset).abs() < 0.001 { "preset selected" } else { "preset" },
                        onclick: {
                            let session = session.clone();
                            move |_| {
                                let session = session.clone();
                                spawn(async move {
                                    session.set_playback_rate(preset).await;
                                });
                            }
                        },
                        "{label}"
                    }
                }
            }
        }
    }
}
