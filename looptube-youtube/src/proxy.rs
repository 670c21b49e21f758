//! [`PlayerHandle`] implementation backed by the embedded player iframe.

use crate::error::Result;
use crate::protocol::{parse_status, PlayerCommand};
use crate::snapshot::PlayerSnapshot;
use async_trait::async_trait;
use looptube_core::{PlayerHandle, PlayerState};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

/// Player capability bridging the core to the embedded iframe.
///
/// Control calls are serialized to [`PlayerCommand`]s on an unbounded
/// channel the shell drains into `postMessage` JavaScript; queries are
/// answered from the latest status snapshot. A shell that has gone away
/// closes the channel, and every control call degrades to a no-op.
pub struct IframePlayer {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    snapshot: RwLock<PlayerSnapshot>,
}

impl IframePlayer {
    /// Create a player proxy and the command stream the shell must drain.
    #[must_use]
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PlayerCommand>) {
        let (commands, rx) = mpsc::unbounded_channel();
        let player = Arc::new(Self {
            commands,
            snapshot: RwLock::new(PlayerSnapshot::default()),
        });
        (player, rx)
    }

    fn send(&self, command: PlayerCommand) {
        if self.commands.send(command).is_err() {
            warn!("Player command channel closed; dropping command");
        }
    }

    /// Ingest a raw message posted by the player iframe.
    ///
    /// Returns whether the message carried a status delivery.
    ///
    /// # Errors
    ///
    /// Returns `StatusParse` when the message is not valid JSON.
    pub async fn apply_status(&self, message: &str) -> Result<bool> {
        let Some(info) = parse_status(message)? else {
            return Ok(false);
        };
        let mut snapshot = self.snapshot.write().await;
        snapshot.apply(&info);
        debug!(
            "Player status: state={:?} position={:.2}s rate={}",
            snapshot.state, snapshot.position_secs, snapshot.playback_rate
        );
        Ok(true)
    }

    /// Current snapshot, for display purposes.
    pub async fn snapshot(&self) -> PlayerSnapshot {
        *self.snapshot.read().await
    }
}

#[async_trait]
impl PlayerHandle for IframePlayer {
    async fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) {
        self.send(PlayerCommand::SeekTo {
            seconds,
            allow_seek_ahead,
        });
        // Reflect the seek immediately so queries between now and the next
        // status report do not read the stale position.
        self.snapshot.write().await.note_seek(seconds);
    }

    async fn play(&self) {
        self.send(PlayerCommand::Play);
    }

    async fn pause(&self) {
        self.send(PlayerCommand::Pause);
    }

    async fn current_time(&self) -> f64 {
        self.snapshot.read().await.interpolated_position()
    }

    async fn player_state(&self) -> PlayerState {
        self.snapshot.read().await.state
    }

    async fn set_playback_rate(&self, rate: f64) {
        self.send(PlayerCommand::SetRate { rate });
        self.snapshot.write().await.playback_rate = rate;
    }
}
