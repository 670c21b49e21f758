pub mod error;
pub mod protocol;
pub mod proxy;
pub mod snapshot;
pub mod video;

pub use error::YouTubeError;
pub use protocol::{
    listen_handshake_js, parse_status, state_from_code, PlayerCommand, StatusInfo,
    PLAYER_IFRAME_ID,
};
pub use proxy::IframePlayer;
pub use snapshot::PlayerSnapshot;
pub use video::VideoId;
