use crate::theme::ThemePreference;
use dioxus::prelude::*;
use looptube_core::{timecode, Section, SectionId, SessionEvent};
use looptube_youtube::VideoId;

/// UI state mirrored from the session engine plus shell-only toggles.
///
/// Session-owned data (sections, active loop, rate, pending mark) is kept in
/// sync by the event bridge; the shell owns the rest (theme, panel
/// visibility, mirroring, the URL text and copy feedback).
#[derive(Clone, Copy)]
pub struct UiState {
    /// Mirror of the session's section collection
    pub sections: Signal<Vec<Section>>,
    /// Mirror of the session's active-loop reference
    pub active_loop: Signal<Option<SectionId>>,
    /// Mirror of the session's playback rate
    pub playback_rate: Signal<f64>,
    /// Mirror of the pending mark start time
    pub pending_mark: Signal<Option<f64>>,
    /// Last mark-workflow feedback line
    pub mark_notice: Signal<Option<String>>,
    /// Controls panel visibility
    pub controls_visible: Signal<bool>,
    /// Light/dark preference
    pub theme: Signal<ThemePreference>,
    /// Horizontal video flip
    pub mirrored: Signal<bool>,
    /// Raw text in the video URL input
    pub url_text: Signal<String>,
    /// Video currently loaded in the player iframe
    pub video_id: Signal<Option<VideoId>>,
    /// Transient "Copied!" feedback on the share button
    pub url_copied: Signal<bool>,
}

impl UiState {
    /// Create the UI state with default values
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: Signal::new(Vec::new()),
            active_loop: Signal::new(None),
            playback_rate: Signal::new(1.0),
            pending_mark: Signal::new(None),
            mark_notice: Signal::new(None),
            controls_visible: Signal::new(true),
            theme: Signal::new(ThemePreference::Light),
            mirrored: Signal::new(false),
            url_text: Signal::new(String::new()),
            video_id: Signal::new(None),
            url_copied: Signal::new(false),
        }
    }

    /// Fold a session event into the mirrored signals
    pub fn apply_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SectionsChanged { sections } => {
                self.sections.set(sections);
            }
            SessionEvent::ActiveLoopChanged { active } => {
                self.active_loop.set(active);
            }
            SessionEvent::MarkStarted { at } => {
                self.pending_mark.set(Some(at));
                self.mark_notice.set(Some(format!(
                    "Section start marked at {}",
                    timecode::display_timestamp(Some(at))
                )));
            }
            SessionEvent::SectionMarked { start, end, .. } => {
                self.pending_mark.set(None);
                self.mark_notice.set(Some(format!(
                    "Section created: {} - {}",
                    timecode::display_timestamp(Some(start)),
                    timecode::display_timestamp(Some(end))
                )));
            }
            SessionEvent::MarkRejected { .. } => {
                self.pending_mark.set(None);
                self.mark_notice
                    .set(Some("End must be after start".to_string()));
            }
            SessionEvent::RateChanged { rate } => {
                self.playback_rate.set(rate);
            }
        }
    }

    pub fn toggle_controls(&mut self) {
        let visible = *self.controls_visible.read();
        self.controls_visible.set(!visible);
    }

    pub fn toggle_mirror(&mut self) {
        let mirrored = *self.mirrored.read();
        self.mirrored.set(!mirrored);
    }

    /// Toggle the theme and persist the new preference
    pub fn toggle_theme(&mut self) {
        let next = self.theme.read().toggled();
        self.theme.set(next);
        next.save();
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
