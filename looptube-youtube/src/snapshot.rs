//! Last-reported player status, interpolated between reports.

use crate::protocol::{state_from_code, StatusInfo};
use looptube_core::PlayerState;
use std::time::Instant;

/// The most recent status reported by the embedded player.
///
/// Status arrives on state changes and on a heartbeat, so position queries
/// between reports interpolate by wall-clock elapsed time (scaled by the
/// playback rate) while the player is playing.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    pub position_secs: f64,
    pub playback_rate: f64,
    pub duration_secs: Option<f64>,
    /// When this snapshot was last updated (for interpolation)
    pub updated_at: Instant,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            state: PlayerState::Unstarted,
            position_secs: 0.0,
            playback_rate: 1.0,
            duration_secs: None,
            updated_at: Instant::now(),
        }
    }
}

impl PlayerSnapshot {
    /// Fold a status report into the snapshot. Absent fields keep their
    /// previous values.
    pub fn apply(&mut self, info: &StatusInfo) {
        if let Some(code) = info.player_state {
            self.state = state_from_code(code);
        }
        if let Some(time) = info.current_time {
            self.position_secs = time;
        }
        if let Some(rate) = info.playback_rate {
            self.playback_rate = rate;
        }
        if let Some(duration) = info.duration {
            self.duration_secs = Some(duration);
        }
        self.updated_at = Instant::now();
    }

    /// Record a seek the shell just issued, so position queries reflect it
    /// before the player confirms.
    pub fn note_seek(&mut self, seconds: f64) {
        self.position_secs = seconds;
        self.updated_at = Instant::now();
    }

    /// Get the interpolated position based on time elapsed since the last
    /// report. Does not advance while paused; clamps to the duration when
    /// one is known.
    #[must_use]
    pub fn interpolated_position(&self) -> f64 {
        if self.state != PlayerState::Playing {
            return self.position_secs;
        }

        let elapsed = self.updated_at.elapsed().as_secs_f64();
        let interpolated = self.position_secs + elapsed * self.playback_rate;

        match self.duration_secs {
            Some(duration) => interpolated.min(duration),
            None => interpolated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn snapshot(state: PlayerState, position: f64, age: Duration) -> PlayerSnapshot {
        PlayerSnapshot {
            state,
            position_secs: position,
            playback_rate: 1.0,
            duration_secs: Some(180.0),
            updated_at: Instant::now() - age,
        }
    }

    #[test]
    fn test_paused_position_does_not_advance() {
        let snap = snapshot(PlayerState::Paused, 30.0, Duration::from_secs(5));
        assert!((snap.interpolated_position() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_playing_position_advances() {
        let snap = snapshot(PlayerState::Playing, 30.0, Duration::from_secs(5));
        let position = snap.interpolated_position();
        assert!(position >= 35.0);
        assert!(position < 36.0);
    }

    #[test]
    fn test_rate_scales_interpolation() {
        let mut snap = snapshot(PlayerState::Playing, 30.0, Duration::from_secs(4));
        snap.playback_rate = 0.5;
        let position = snap.interpolated_position();
        assert!(position >= 32.0);
        assert!(position < 33.0);
    }

    #[test]
    fn test_position_clamped_to_duration() {
        let snap = snapshot(PlayerState::Playing, 178.0, Duration::from_secs(10));
        assert!((snap.interpolated_position() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_apply_folds_partial_updates() {
        let mut snap = PlayerSnapshot::default();
        snap.apply(&StatusInfo {
            current_time: Some(12.0),
            player_state: Some(1),
            playback_rate: None,
            duration: Some(300.0),
        });
        assert_eq!(snap.state, PlayerState::Playing);
        assert!((snap.position_secs - 12.0).abs() < 1e-9);
        assert!((snap.playback_rate - 1.0).abs() < 1e-9);

        // A later report without a position keeps the previous one
        snap.apply(&StatusInfo {
            current_time: None,
            player_state: Some(2),
            playback_rate: None,
            duration: None,
        });
        assert_eq!(snap.state, PlayerState::Paused);
        assert!((snap.position_secs - 12.0).abs() < 1e-9);
        assert_eq!(snap.duration_secs, Some(300.0));
    }

    #[test]
    fn test_note_seek_moves_position() {
        let mut snap = snapshot(PlayerState::Playing, 100.0, Duration::from_secs(5));
        snap.note_seek(10.0);
        let position = snap.interpolated_position();
        assert!(position >= 10.0);
        assert!(position < 11.0);
    }
}
