//! Audio Player Port - 系统播放器与音量控制抽象

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use super::command_runner::CommandError;

/// 播放错误
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Player exited with status {code:?}: {stderr}")]
    PlayerFailed { code: Option<i32>, stderr: String },

    #[error("Process error: {0}")]
    ProcessError(String),

    #[error("Unexpected output: {0}")]
    InvalidOutput(String),
}

impl From<CommandError> for PlaybackError {
    fn from(err: CommandError) -> Self {
        PlaybackError::ProcessError(err.to_string())
    }
}

/// Audio Player Port
#[async_trait]
pub trait AudioPlayerPort: Send + Sync {
    /// 播放一次，阻塞到播放结束
    async fn play(&self, path: &Path) -> Result<(), PlaybackError>;

    /// 停止所有播放
    async fn stop(&self) -> Result<(), PlaybackError>;

    /// 系统输出音量（0-100）
    async fn get_volume(&self) -> Result<u8, PlaybackError>;

    async fn set_volume(&self, volume: u8) -> Result<(), PlaybackError>;

    async fn is_muted(&self) -> Result<bool, PlaybackError>;

    async fn set_muted(&self, muted: bool) -> Result<(), PlaybackError>;
}
