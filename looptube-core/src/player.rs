//! Playback-control capability consumed by the loop controller.

use async_trait::async_trait;
use std::sync::Arc;

/// Playback state reported by the embedded player widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

/// Opaque playback-control surface owned by the surrounding shell.
///
/// The core never constructs one; it is handed an instance and must tolerate
/// it being absent at any time. Implementations answer queries from live
/// player state and accept control calls best-effort: a handle whose backing
/// widget has gone away should no-op rather than fail.
///
/// Any implementation can substitute the real player, which is how the loop
/// controller's behavior is tested without a video backend.
#[async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Seek to an absolute position in seconds.
    async fn seek_to(&self, seconds: f64, allow_seek_ahead: bool);

    /// Start or resume playback.
    async fn play(&self);

    /// Pause playback.
    async fn pause(&self);

    /// Current playback position in seconds.
    async fn current_time(&self) -> f64;

    /// Current playback state.
    async fn player_state(&self) -> PlayerState;

    /// Set the playback rate multiplier.
    async fn set_playback_rate(&self, rate: f64);
}

/// Shared, cloneable player capability.
pub type SharedPlayer = Arc<dyn PlayerHandle>;
