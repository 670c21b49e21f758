//! The embed messaging protocol spoken with the player iframe.
//!
//! With `enablejsapi=1` the embedded player accepts JSON commands over
//! `postMessage` (`{"event":"command","func":...,"args":[...]}`) and, once a
//! `listening` handshake is posted, reports playback status as
//! `infoDelivery` events. This module owns both directions: serializing
//! commands to host-page JavaScript and parsing status payloads back out.

use crate::error::Result;
use looptube_core::PlayerState;
use serde::Deserialize;

/// Element id of the player iframe in the host page.
pub const PLAYER_IFRAME_ID: &str = "looptube-player";

/// A control call against the embedded player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    SeekTo { seconds: f64, allow_seek_ahead: bool },
    Play,
    Pause,
    SetRate { rate: f64 },
}

impl PlayerCommand {
    fn func_and_args(&self) -> (&'static str, String) {
        match self {
            Self::SeekTo {
                seconds,
                allow_seek_ahead,
            } => ("seekTo", format!("[{seconds},{allow_seek_ahead}]")),
            Self::Play => ("playVideo", "[]".to_string()),
            Self::Pause => ("pauseVideo", "[]".to_string()),
            Self::SetRate { rate } => ("setPlaybackRate", format!("[{rate}]")),
        }
    }

    /// Host-page JavaScript that posts this command to the player iframe.
    /// No-ops when the iframe is not mounted.
    #[must_use]
    pub fn to_post_message_js(&self, iframe_id: &str) -> String {
        let (func, args) = self.func_and_args();
        format!(
            r#"(function() {{
  var frame = document.getElementById("{iframe_id}");
  if (frame && frame.contentWindow) {{
    frame.contentWindow.postMessage(
      JSON.stringify({{ event: "command", func: "{func}", args: {args} }}), "*");
  }}
}})();"#
        )
    }
}

/// Host-page JavaScript that subscribes to the iframe's status stream.
/// The player only emits `infoDelivery` events after this handshake.
#[must_use]
pub fn listen_handshake_js(iframe_id: &str) -> String {
    format!(
        r#"(function() {{
  var frame = document.getElementById("{iframe_id}");
  if (frame && frame.contentWindow) {{
    frame.contentWindow.postMessage(
      JSON.stringify({{ event: "listening", id: "{iframe_id}", channel: "widget" }}), "*");
  }}
}})();"#
    )
}

/// Playback status carried by an `infoDelivery` event. Every field is
/// optional; the player sends whichever changed.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    #[serde(default)]
    pub current_time: Option<f64>,
    #[serde(default)]
    pub player_state: Option<i32>,
    #[serde(default)]
    pub playback_rate: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    event: String,
    #[serde(default)]
    info: Option<StatusInfo>,
}

/// Parse a message from the player iframe.
///
/// Returns `Ok(None)` for messages that are valid JSON but not status
/// deliveries (the widget also posts ready/delivery-confirmation events).
///
/// # Errors
///
/// Returns `StatusParse` when the message is not valid JSON.
pub fn parse_status(message: &str) -> Result<Option<StatusInfo>> {
    let envelope: Envelope = serde_json::from_str(message)?;
    if envelope.event != "infoDelivery" {
        return Ok(None);
    }
    Ok(envelope.info)
}

/// Map a raw IFrame player state code to the typed state.
/// Unknown codes conservatively map to `Unstarted`.
#[must_use]
pub fn state_from_code(code: i32) -> PlayerState {
    match code {
        0 => PlayerState::Ended,
        1 => PlayerState::Playing,
        2 => PlayerState::Paused,
        3 => PlayerState::Buffering,
        5 => PlayerState::Cued,
        _ => PlayerState::Unstarted,
    }
}
