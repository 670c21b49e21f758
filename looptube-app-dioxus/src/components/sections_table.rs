use crate::state::UiState;
use dioxus::prelude::*;
use looptube_core::{format_timestamp, parse_timestamp, Section, SectionId, Session, TimeField};
use std::sync::Arc;

/// The loop-sections table: one row per section with an active switch, a
/// play button, an editable name, editable start/end times and a delete
/// button, plus an add-row footer.
#[component]
pub fn SectionsTable() -> Element {
    let ui = use_context::<UiState>();
    let session = use_context::<Arc<Session>>();
    let sections = ui.sections.read().clone();

    let add_session = session.clone();
    let on_add = move |_| {
        let session = add_session.clone();
        spawn(async move {
            session.add_section(None, None).await;
        });
    };

    rsx! {
        div { class: "sections-table",
            table {
                thead {
                    tr {
                        th { "" }
                        th { "" }
                        th { "Name" }
                        th { "Start" }
                        th { "End" }
                        th { "" }
                    }
                }
                tbody {
                    if sections.is_empty() {
                        tr {
                            td { colspan: "6", class: "empty", "No sections defined." }
                        }
                    }
                    for (index, section) in sections.into_iter().enumerate() {
                        SectionRow { key: "{section.id}", section, index }
                    }
                }
            }
            button { class: "add-section", onclick: on_add, "+ Add Section" }
        }
    }
}

#[component]
fn SectionRow(section: Section, index: usize) -> Element {
    let ui = use_context::<UiState>();
    let session = use_context::<Arc<Session>>();
    let is_active = ui.active_loop.read().as_ref() == Some(&section.id);

    let switch_id = section.id.clone();
    let switch_session = session.clone();
    let on_switch = move |_| {
        let session = switch_session.clone();
        let id = switch_id.clone();
        spawn(async move {
            if is_active {
                session.set_active_loop(None).await;
            } else {
                session.set_active_loop(Some(id)).await;
            }
        });
    };

    let play_id = section.id.clone();
    let play_session = session.clone();
    let on_play = move |_| {
        let session = play_session.clone();
        let id = play_id.clone();
        spawn(async move {
            session.play_section(&id).await;
        });
    };

    let rename_id = section.id.clone();
    let rename_session = session.clone();
    let on_rename = move |evt: FormEvent| {
        let session = rename_session.clone();
        let id = rename_id.clone();
        let name = evt.value();
        spawn(async move {
            session.rename_section(&id, &name).await;
        });
    };

    let delete_id = section.id.clone();
    let delete_session = session.clone();
    let on_delete = move |_| {
        let session = delete_session.clone();
        let id = delete_id.clone();
        spawn(async move {
            session.remove_section(&id).await;
        });
    };

    let shortcut = if index < 9 {
        format!("{}", index + 1)
    } else {
        String::new()
    };

    rsx! {
        tr { class: if is_active { "section-row active" } else { "section-row" },
            td { class: "cell-switch",
                input {
                    r#type: "checkbox",
                    class: "loop-switch",
                    checked: is_active,
                    onchange: on_switch,
                }
            }
            td { class: "cell-play",
                button {
                    class: "play",
                    title: "Play {shortcut}",
                    disabled: section.start_time.is_none(),
                    onclick: on_play,
                    "\u{25b6}"
                }
            }
            td { class: "cell-name",
                input {
                    class: "name",
                    value: "{section.name}",
                    placeholder: "Name",
                    onchange: on_rename,
                    onkeydown: |evt| evt.stop_propagation(),
                }
            }
            td { class: "cell-time",
                TimeCell { id: section.id.clone(), field: TimeFieldProp::Start, value: section.start_time }
            }
            td { class: "cell-time",
                TimeCell { id: section.id.clone(), field: TimeFieldProp::End, value: section.end_time }
            }
            td { class: "cell-delete",
                button { class: "delete", onclick: on_delete, "\u{2715}" }
            }
        }
    }
}

/// Props-friendly mirror of [`TimeField`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeFieldProp {
    Start,
    End,
}

impl From<TimeFieldProp> for TimeField {
    fn from(value: TimeFieldProp) -> Self {
        match value {
            TimeFieldProp::Start => Self::Start,
            TimeFieldProp::End => Self::End,
        }
    }
}

/// Editable time cell committing on change (blur/enter). Text that does not
/// parse as `m:ss` or bare seconds clears the bound.
#[component]
fn TimeCell(id: SectionId, field: TimeFieldProp, value: Option<f64>) -> Element {
    let session = use_context::<Arc<Session>>();

    let on_commit = move |evt: FormEvent| {
        let session = session.clone();
        let id = id.clone();
        let parsed = parse_timestamp(&evt.value());
        spawn(async move {
            session.set_section_time(&id, field.into(), parsed).await;
        });
    };

    rsx! {
        input {
            class: "time",
            value: format_timestamp(value),
            placeholder: "--:--",
            onchange: on_commit,
            onkeydown: |evt| evt.stop_propagation(),
        }
    }
}
