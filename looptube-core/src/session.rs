//! Session engine: owns the section collection, the active-loop reference,
//! the pending mark and the playback rate, and arms the loop-boundary poll.
//!
//! All state lives behind one lock so every mutation is a single logical
//! update. Each mutation that can affect the loop (active reference,
//! section collection, player identity) reconciles the boundary poll:
//! the previous poll task is cancelled before a new one is armed, so at
//! most one poll is ever live and none outlives the state that armed it.

use crate::config::PlaybackConfig;
use crate::looper;
use crate::mark::{self, MarkOutcome};
use crate::player::{PlayerState, SharedPlayer};
use crate::section::{Section, SectionId, SectionList, TimeField};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Events emitted by the session engine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The section collection changed (add, edit, delete, hydration)
    SectionsChanged { sections: Vec<Section> },
    /// The active-loop reference changed
    ActiveLoopChanged { active: Option<SectionId> },
    /// First mark press recorded a start bound
    MarkStarted { at: f64 },
    /// Second mark press created a section
    SectionMarked {
        id: SectionId,
        start: f64,
        end: f64,
    },
    /// Second mark press was rejected (end must be after start)
    MarkRejected { start: f64, end: f64 },
    /// The playback rate changed
    RateChanged { rate: f64 },
}

/// Session state guarded by a single lock
struct SessionInner {
    sections: SectionList,
    active_loop: Option<SectionId>,
    pending_mark: Option<f64>,
    playback_rate: f64,
}

/// Engine coordinating sections, the active loop and the player handle
pub struct Session {
    inner: RwLock<SessionInner>,
    player: RwLock<Option<SharedPlayer>>,
    loop_guard: Mutex<Option<CancellationToken>>,
    event_tx: broadcast::Sender<SessionEvent>,
    playback: PlaybackConfig,
}

impl Session {
    /// Create a new session engine
    #[must_use]
    pub fn new(playback: PlaybackConfig) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(64);

        Arc::new(Self {
            inner: RwLock::new(SessionInner {
                sections: SectionList::new(),
                active_loop: None,
                pending_mark: None,
                playback_rate: 1.0,
            }),
            player: RwLock::new(None),
            loop_guard: Mutex::new(None),
            event_tx,
            playback,
        })
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Hand the session a player handle (or take it away with `None`).
    ///
    /// The current playback rate is re-applied to a newly attached player,
    /// and the boundary poll is re-evaluated against the new identity.
    pub async fn attach_player(self: &Arc<Self>, player: Option<SharedPlayer>) {
        let rate = self.inner.read().await.playback_rate;
        {
            *self.player.write().await = player.clone();
        }
        if let Some(player) = player {
            player.set_playback_rate(rate).await;
        }
        self.reconcile_loop().await;
    }

    /// Snapshot of the section collection
    pub async fn sections(&self) -> Vec<Section> {
        self.inner.read().await.sections.as_slice().to_vec()
    }

    /// Current active-loop reference
    pub async fn active_loop(&self) -> Option<SectionId> {
        self.inner.read().await.active_loop.clone()
    }

    /// Pending mark start time, if the workflow is between presses
    pub async fn pending_mark(&self) -> Option<f64> {
        self.inner.read().await.pending_mark
    }

    /// Current playback rate
    pub async fn playback_rate(&self) -> f64 {
        self.inner.read().await.playback_rate
    }

    /// Append a new section, returning its id
    pub async fn add_section(
        self: &Arc<Self>,
        start_time: Option<f64>,
        end_time: Option<f64>,
    ) -> SectionId {
        let (id, sections) = {
            let mut inner = self.inner.write().await;
            let id = inner.sections.add(start_time, end_time);
            (id, inner.sections.as_slice().to_vec())
        };
        self.emit(SessionEvent::SectionsChanged { sections });
        self.reconcile_loop().await;
        id
    }

    /// Rename a section. Unknown ids are silently ignored.
    pub async fn rename_section(self: &Arc<Self>, id: &SectionId, name: &str) {
        let sections = {
            let mut inner = self.inner.write().await;
            inner.sections.rename(id, name);
            inner.sections.as_slice().to_vec()
        };
        self.emit(SessionEvent::SectionsChanged { sections });
        self.reconcile_loop().await;
    }

    /// Set one time bound of a section. Unknown ids are silently ignored.
    pub async fn set_section_time(
        self: &Arc<Self>,
        id: &SectionId,
        field: TimeField,
        value: Option<f64>,
    ) {
        let sections = {
            let mut inner = self.inner.write().await;
            inner.sections.set_time(id, field, value);
            inner.sections.as_slice().to_vec()
        };
        self.emit(SessionEvent::SectionsChanged { sections });
        self.reconcile_loop().await;
    }

    /// Delete a section. Deleting the active section drops the loop.
    pub async fn remove_section(self: &Arc<Self>, id: &SectionId) {
        let (removed, cleared_active, sections) = {
            let mut inner = self.inner.write().await;
            let removed = inner.sections.remove(id);
            let cleared_active = removed && inner.active_loop.as_ref() == Some(id);
            if cleared_active {
                inner.active_loop = None;
            }
            (removed, cleared_active, inner.sections.as_slice().to_vec())
        };
        if !removed {
            return;
        }
        if cleared_active {
            self.emit(SessionEvent::ActiveLoopChanged { active: None });
        }
        self.emit(SessionEvent::SectionsChanged { sections });
        self.reconcile_loop().await;
    }

    /// Replace the whole collection (hydration from a share token or the
    /// defaults). Clears the active loop if its section is gone.
    pub async fn replace_sections(self: &Arc<Self>, sections: Vec<Section>) {
        let (cleared_active, snapshot) = {
            let mut inner = self.inner.write().await;
            inner.sections.replace_all(sections);
            let cleared_active = match &inner.active_loop {
                Some(id) => !inner.sections.contains(id),
                None => false,
            };
            if cleared_active {
                inner.active_loop = None;
            }
            (cleared_active, inner.sections.as_slice().to_vec())
        };
        if cleared_active {
            self.emit(SessionEvent::ActiveLoopChanged { active: None });
        }
        self.emit(SessionEvent::SectionsChanged { sections: snapshot });
        self.reconcile_loop().await;
    }

    /// Set (or clear) the active-loop reference without seeking.
    ///
    /// This is the per-row switch: it selects, it does not reposition.
    /// References to sections that are not in the collection are treated
    /// as "no active loop".
    pub async fn set_active_loop(self: &Arc<Self>, active: Option<SectionId>) {
        let active = {
            let mut inner = self.inner.write().await;
            let validated = active.filter(|id| inner.sections.contains(id));
            inner.active_loop = validated.clone();
            validated
        };
        self.emit(SessionEvent::ActiveLoopChanged { active });
        self.reconcile_loop().await;
    }

    /// Select a section for looping and start playing it from its start.
    ///
    /// Without a player handle this is a no-op. A section without a start
    /// bound is selected but not repositioned.
    pub async fn play_section(self: &Arc<Self>, id: &SectionId) {
        let Some(player) = self.player.read().await.clone() else {
            return;
        };
        let start = {
            let inner = self.inner.read().await;
            match inner.sections.get(id) {
                Some(section) => section.start_time,
                None => return,
            }
        };
        if let Some(start) = start {
            player.seek_to(start, true).await;
            self.set_active_loop(Some(id.clone())).await;
            player.play().await;
        } else {
            self.set_active_loop(Some(id.clone())).await;
        }
    }

    /// Digit-shortcut selection: seek to the start of the section at this
    /// collection index and loop it. Only acts when a player is attached
    /// and the section has a start bound.
    pub async fn play_section_by_index(self: &Arc<Self>, index: usize) {
        let Some(player) = self.player.read().await.clone() else {
            return;
        };
        let target = {
            let inner = self.inner.read().await;
            inner
                .sections
                .get_by_index(index)
                .map(|s| (s.id.clone(), s.start_time))
        };
        let Some((id, Some(start))) = target else {
            return;
        };
        player.seek_to(start, true).await;
        self.set_active_loop(Some(id)).await;
        player.play().await;
    }

    /// Letter-row shortcut: seek to the end bound of the section at this
    /// collection index and exit the loop. An intentional way out.
    pub async fn seek_section_end(self: &Arc<Self>, index: usize) {
        let Some(player) = self.player.read().await.clone() else {
            return;
        };
        let end = {
            let inner = self.inner.read().await;
            inner.sections.get_by_index(index).and_then(|s| s.end_time)
        };
        let Some(end) = end else {
            return;
        };
        player.seek_to(end, true).await;
        self.set_active_loop(None).await;
    }

    /// Toggle between playing and paused
    pub async fn toggle_play_pause(&self) {
        let Some(player) = self.player.read().await.clone() else {
            return;
        };
        if player.player_state().await == PlayerState::Playing {
            player.pause().await;
        } else {
            player.play().await;
        }
    }

    /// Advance the two-press mark workflow at the current player time.
    ///
    /// Returns `None` when no player is attached. Created sections are
    /// appended to the collection; a rejected second press creates nothing.
    /// Both second-press outcomes clear the pending mark.
    pub async fn mark(self: &Arc<Self>) -> Option<MarkOutcome> {
        let player = self.player.read().await.clone()?;
        let now = mark::round_to_centis(player.current_time().await);

        let (outcome, created, sections) = {
            let mut inner = self.inner.write().await;
            let (pending, outcome) = mark::advance(inner.pending_mark, now);
            inner.pending_mark = pending;
            if let MarkOutcome::Created { start, end } = outcome {
                let id = inner.sections.add(Some(start), Some(end));
                (
                    outcome,
                    Some((id, start, end)),
                    Some(inner.sections.as_slice().to_vec()),
                )
            } else {
                (outcome, None, None)
            }
        };

        match outcome {
            MarkOutcome::Started { at } => self.emit(SessionEvent::MarkStarted { at }),
            MarkOutcome::Rejected { start, end } => {
                self.emit(SessionEvent::MarkRejected { start, end });
            }
            MarkOutcome::Created { .. } => {
                if let Some(sections) = sections {
                    self.emit(SessionEvent::SectionsChanged { sections });
                }
                if let Some((id, start, end)) = created {
                    self.emit(SessionEvent::SectionMarked { id, start, end });
                }
                self.reconcile_loop().await;
            }
        }

        Some(outcome)
    }

    fn clamp_rate(&self, rate: f64) -> f64 {
        let clamped = rate.clamp(self.playback.rate_min, self.playback.rate_max);
        (clamped * 100.0).round() / 100.0
    }

    /// Set the playback rate, clamped to the configured bounds and rounded
    /// to two decimals. Applied to the player when one is attached.
    pub async fn set_playback_rate(&self, rate: f64) {
        let rate = self.clamp_rate(rate);
        {
            self.inner.write().await.playback_rate = rate;
        }
        self.emit(SessionEvent::RateChanged { rate });
        if let Some(player) = self.player.read().await.clone() {
            player.set_playback_rate(rate).await;
        }
    }

    /// Step the playback rate up by the configured step
    pub async fn rate_up(&self) {
        let rate = self.playback_rate().await;
        self.set_playback_rate(rate + self.playback.rate_step).await;
    }

    /// Step the playback rate down by the configured step
    pub async fn rate_down(&self) {
        let rate = self.playback_rate().await;
        self.set_playback_rate(rate - self.playback.rate_step).await;
    }

    /// Seek to absolute 0:00 and make sure playback is running
    pub async fn seek_to_start(&self) {
        let Some(player) = self.player.read().await.clone() else {
            return;
        };
        player.seek_to(0.0, true).await;
        if player.player_state().await != PlayerState::Playing {
            player.play().await;
        }
    }

    /// Seek backward by the configured step
    pub async fn seek_backward(&self) {
        self.seek_by(-self.playback.seek_step_secs).await;
    }

    /// Seek forward by the configured step
    pub async fn seek_forward(&self) {
        self.seek_by(self.playback.seek_step_secs).await;
    }

    async fn seek_by(&self, delta: f64) {
        let Some(player) = self.player.read().await.clone() else {
            return;
        };
        let current = player.current_time().await;
        player.seek_to((current + delta).max(0.0), true).await;
    }

    /// Cancel the outstanding boundary poll. Called on teardown.
    pub async fn shutdown(&self) {
        if let Some(token) = self.loop_guard.lock().await.take() {
            token.cancel();
        }
    }

    /// Re-evaluate the boundary poll against the current active reference,
    /// section collection and player identity.
    ///
    /// Always cancels the previous poll first; arms a new one only when a
    /// player is attached and the active section is loopable.
    async fn reconcile_loop(self: &Arc<Self>) {
        let mut guard = self.loop_guard.lock().await;
        if let Some(token) = guard.take() {
            token.cancel();
        }

        let Some(player) = self.player.read().await.clone() else {
            return;
        };
        let plan = {
            let inner = self.inner.read().await;
            let active = inner
                .active_loop
                .as_ref()
                .and_then(|id| inner.sections.get(id));
            looper::loop_plan(active)
        };
        if plan.is_none() {
            return;
        }

        let token = CancellationToken::new();
        *guard = Some(token.clone());
        drop(guard);

        debug!("Arming loop-boundary poll");
        let session = Arc::clone(self);
        tokio::spawn(async move {
            session.boundary_poll(player, token).await;
        });
    }

    /// The fixed-interval boundary check. Repositions only while the player
    /// reports it is playing; re-validates the active section on every tick
    /// so a stale reference never drives a seek.
    async fn boundary_poll(&self, player: SharedPlayer, token: CancellationToken) {
        let interval = Duration::from_millis(self.playback.poll_interval_ms);

        loop {
            tokio::select! {
                () = token.cancelled() => {
                    debug!("Loop-boundary poll cancelled");
                    break;
                }
                () = tokio::time::sleep(interval) => {
                    let bounds = {
                        let inner = self.inner.read().await;
                        let active = inner
                            .active_loop
                            .as_ref()
                            .and_then(|id| inner.sections.get(id));
                        looper::loop_plan(active)
                    };
                    let Some(bounds) = bounds else {
                        continue;
                    };
                    if player.player_state().await != PlayerState::Playing {
                        continue;
                    }
                    let current = player.current_time().await;
                    if current >= bounds.end {
                        debug!(
                            "Boundary reached at {current:.2}s, repositioning to {:.2}s",
                            bounds.start
                        );
                        player.seek_to(bounds.start, true).await;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::PlayerHandle;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    /// Scripted player for exercising the controller without a video backend
    #[derive(Default)]
    struct FakePlayer {
        state: StdMutex<Option<PlayerState>>,
        time: StdMutex<f64>,
        seeks: StdMutex<Vec<(f64, bool)>>,
        plays: StdMutex<u32>,
        pauses: StdMutex<u32>,
        rates: StdMutex<Vec<f64>>,
    }

    impl FakePlayer {
        fn new(state: PlayerState, time: f64) -> Arc<Self> {
            let player = Self::default();
            *player.state.lock().unwrap() = Some(state);
            *player.time.lock().unwrap() = time;
            Arc::new(player)
        }

        fn set_time(&self, time: f64) {
            *self.time.lock().unwrap() = time;
        }

        fn seeks(&self) -> Vec<(f64, bool)> {
            self.seeks.lock().unwrap().clone()
        }

        fn plays(&self) -> u32 {
            *self.plays.lock().unwrap()
        }

        fn pauses(&self) -> u32 {
            *self.pauses.lock().unwrap()
        }

        fn rates(&self) -> Vec<f64> {
            self.rates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlayerHandle for FakePlayer {
        async fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) {
            self.seeks.lock().unwrap().push((seconds, allow_seek_ahead));
            // A real player reports the new position on the next query
            *self.time.lock().unwrap() = seconds;
        }

        async fn play(&self) {
            *self.plays.lock().unwrap() += 1;
            *self.state.lock().unwrap() = Some(PlayerState::Playing);
        }

        async fn pause(&self) {
            *self.pauses.lock().unwrap() += 1;
            *self.state.lock().unwrap() = Some(PlayerState::Paused);
        }

        async fn current_time(&self) -> f64 {
            *self.time.lock().unwrap()
        }

        async fn player_state(&self) -> PlayerState {
            self.state.lock().unwrap().unwrap_or(PlayerState::Unstarted)
        }

        async fn set_playback_rate(&self, rate: f64) {
            self.rates.lock().unwrap().push(rate);
        }
    }

    fn playback_config() -> PlaybackConfig {
        PlaybackConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_boundary_poll_repositions_at_end() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 20.0);
        session.attach_player(Some(player.clone())).await;

        let id = session.add_section(Some(10.0), Some(20.0)).await;
        session.set_active_loop(Some(id.clone())).await;

        tokio::time::sleep(Duration::from_millis(600)).await;

        // Exactly one reposition: the fake reports the new position after
        // the seek, so the boundary is no longer exceeded.
        assert_eq!(player.seeks(), vec![(10.0, true)]);
        assert_eq!(session.active_loop().await, Some(id));

        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_reposition_while_paused() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Paused, 25.0);
        session.attach_player(Some(player.clone())).await;

        let id = session.add_section(Some(10.0), Some(20.0)).await;
        session.set_active_loop(Some(id)).await;

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(player.seeks().is_empty());
        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_loopable_sections_never_seek() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 100.0);
        session.attach_player(Some(player.clone())).await;

        // end <= start
        let inverted = session.add_section(Some(20.0), Some(10.0)).await;
        session.set_active_loop(Some(inverted)).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        // missing bound
        let unbounded = session.add_section(Some(20.0), None).await;
        session.set_active_loop(Some(unbounded)).await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(player.seeks().is_empty());
        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleting_active_section_goes_idle() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 15.0);
        session.attach_player(Some(player.clone())).await;

        let id = session.add_section(Some(10.0), Some(20.0)).await;
        session.set_active_loop(Some(id.clone())).await;
        assert_eq!(session.active_loop().await, Some(id.clone()));

        session.remove_section(&id).await;
        assert_eq!(session.active_loop().await, None);

        // The poll armed for the deleted section is gone with it.
        player.set_time(30.0);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(player.seeks().is_empty());

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_mark_workflow_creates_section() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 5.0);
        session.attach_player(Some(player.clone())).await;

        let first = session.mark().await;
        assert_eq!(first, Some(MarkOutcome::Started { at: 5.0 }));
        assert_eq!(session.pending_mark().await, Some(5.0));
        assert!(session.sections().await.is_empty());

        player.set_time(12.0);
        let second = session.mark().await;
        assert_eq!(
            second,
            Some(MarkOutcome::Created {
                start: 5.0,
                end: 12.0
            })
        );
        assert_eq!(session.pending_mark().await, None);

        let sections = session.sections().await;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].start_time, Some(5.0));
        assert_eq!(sections[0].end_time, Some(12.0));

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_mark_workflow_rejects_out_of_order() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 5.0);
        session.attach_player(Some(player.clone())).await;

        session.mark().await;
        player.set_time(3.0);
        let second = session.mark().await;
        assert_eq!(
            second,
            Some(MarkOutcome::Rejected {
                start: 5.0,
                end: 3.0
            })
        );
        assert_eq!(session.pending_mark().await, None);
        assert!(session.sections().await.is_empty());

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_play_section_seeks_and_plays() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Cued, 0.0);
        session.attach_player(Some(player.clone())).await;

        let id = session.add_section(Some(42.0), Some(60.0)).await;
        session.play_section(&id).await;

        assert_eq!(player.seeks(), vec![(42.0, true)]);
        assert_eq!(player.plays(), 1);
        assert_eq!(session.active_loop().await, Some(id));

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_play_section_without_start_selects_only() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Cued, 0.0);
        session.attach_player(Some(player.clone())).await;

        let id = session.add_section(None, Some(60.0)).await;
        session.play_section(&id).await;

        assert!(player.seeks().is_empty());
        assert_eq!(player.plays(), 0);
        assert_eq!(session.active_loop().await, Some(id));

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_switch_activation_does_not_seek() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Paused, 0.0);
        session.attach_player(Some(player.clone())).await;

        let id = session.add_section(Some(10.0), Some(20.0)).await;
        session.set_active_loop(Some(id.clone())).await;

        assert!(player.seeks().is_empty());
        assert_eq!(session.active_loop().await, Some(id));

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_stale_reference_is_treated_as_idle() {
        let session = Session::new(playback_config());
        session.add_section(Some(1.0), Some(2.0)).await;

        session
            .set_active_loop(Some(SectionId::from("ghost")))
            .await;
        assert_eq!(session.active_loop().await, None);
    }

    #[tokio::test]
    async fn test_seek_section_end_exits_loop() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 15.0);
        session.attach_player(Some(player.clone())).await;

        let id = session.add_section(Some(10.0), Some(20.0)).await;
        session.set_active_loop(Some(id)).await;

        session.seek_section_end(0).await;

        assert_eq!(player.seeks(), vec![(20.0, true)]);
        assert_eq!(session.active_loop().await, None);

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_digit_shortcut_requires_start_bound() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Cued, 0.0);
        session.attach_player(Some(player.clone())).await;

        session.add_section(None, Some(60.0)).await;
        session.play_section_by_index(0).await;

        assert!(player.seeks().is_empty());
        assert_eq!(session.active_loop().await, None);

        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_toggle_play_pause() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 0.0);
        session.attach_player(Some(player.clone())).await;

        session.toggle_play_pause().await;
        assert_eq!(player.pauses(), 1);

        session.toggle_play_pause().await;
        assert_eq!(player.plays(), 1);
    }

    #[tokio::test]
    async fn test_rate_clamps_and_steps() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 0.0);
        session.attach_player(Some(player.clone())).await;

        session.set_playback_rate(3.0).await;
        assert!((session.playback_rate().await - 2.0).abs() < 1e-9);

        session.set_playback_rate(0.1).await;
        assert!((session.playback_rate().await - 0.25).abs() < 1e-9);

        session.set_playback_rate(1.0).await;
        session.rate_up().await;
        assert!((session.playback_rate().await - 1.05).abs() < 1e-9);
        session.rate_down().await;
        session.rate_down().await;
        assert!((session.playback_rate().await - 0.95).abs() < 1e-9);

        // Rate applied to the attached player on every change
        assert!(!player.rates().is_empty());
    }

    #[tokio::test]
    async fn test_seek_offsets_clamp_at_zero() {
        let session = Session::new(playback_config());
        let player = FakePlayer::new(PlayerState::Playing, 2.0);
        session.attach_player(Some(player.clone())).await;

        session.seek_backward().await;
        assert_eq!(player.seeks(), vec![(0.0, true)]);

        session.seek_forward().await;
        assert_eq!(player.seeks(), vec![(0.0, true), (5.0, true)]);
    }

    #[tokio::test]
    async fn test_everything_noops_without_player() {
        let session = Session::new(playback_config());
        let id = session.add_section(Some(10.0), Some(20.0)).await;

        session.play_section(&id).await;
        session.play_section_by_index(0).await;
        session.seek_section_end(0).await;
        session.toggle_play_pause().await;
        session.seek_to_start().await;
        session.seek_backward().await;

        assert_eq!(session.mark().await, None);
        // play_section without a player does not even select
        assert_eq!(session.active_loop().await, None);
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let session = Session::new(playback_config());
        let mut rx = session.subscribe();

        let id = session.add_section(Some(1.0), Some(2.0)).await;
        match rx.recv().await {
            Ok(SessionEvent::SectionsChanged { sections }) => {
                assert_eq!(sections.len(), 1);
            }
            other => panic!("expected SectionsChanged, got {other:?}"),
        }

        session.set_active_loop(Some(id.clone())).await;
        match rx.recv().await {
            Ok(SessionEvent::ActiveLoopChanged { active }) => {
                assert_eq!(active, Some(id));
            }
            other => panic!("expected ActiveLoopChanged, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_hydration_replaces_collection() {
        let session = Session::new(playback_config());
        let stale = session.add_section(Some(1.0), Some(2.0)).await;
        session.set_active_loop(Some(stale)).await;

        session
            .replace_sections(crate::share::default_sections())
            .await;

        let sections = session.sections().await;
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].name, "Solo 1");
        assert_eq!(session.active_loop().await, None);
    }
}
