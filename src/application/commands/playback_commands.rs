//! Playback Commands

use std::path::PathBuf;

/// 播放音频命令
#[derive(Debug, Clone)]
pub struct PlayAudio {
    pub path: PathBuf,
    pub loops: u32,
    pub volume: Option<u8>,
}

/// 系统音量操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeAction {
    Get,
    Set(u8),
    Mute,
    Unmute,
}

/// 停止播放命令
#[derive(Debug, Clone, Copy, Default)]
pub struct StopPlayback;
