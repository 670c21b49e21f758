pub mod config;
pub mod error;
pub mod keys;
pub mod looper;
pub mod mark;
pub mod paths;
pub mod player;
pub mod section;
pub mod session;
pub mod share;
pub mod timecode;

pub use config::{LoggingConfig, LooptubeConfig, PlaybackConfig, ShareConfig, CONFIG_TEMPLATE};
pub use error::CoreError;
pub use keys::{command_for_key, Command, KeyContext};
pub use looper::{loop_plan, LoopBounds};
pub use mark::MarkOutcome;
pub use paths::{config_dir, config_path, log_file_path, theme_path, CONFIG_DIR_NAME};
pub use player::{PlayerHandle, PlayerState, SharedPlayer};
pub use section::{Section, SectionId, SectionList, TimeField};
pub use session::{Session, SessionEvent};
pub use share::{
    decode_sections, default_sections, encode_sections, sections_or_default, share_url,
    ShareError, DEFAULT_VIDEO_ID, SECTIONS_PARAM, VIDEO_PARAM,
};
pub use timecode::{display_timestamp, format_timestamp, parse_timestamp, TIME_PLACEHOLDER};
