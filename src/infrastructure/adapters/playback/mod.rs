//! Playback Adapter - 系统播放器与音量控制

mod command_player;

pub use command_player::CommandPlayer;
