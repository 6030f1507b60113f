//! Audio Concat Port - 音频拼接抽象
//!
//! 容器级无损拼接，严格按输入顺序

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::command_runner::CommandError;

/// 拼接错误
#[derive(Debug, Error)]
pub enum ConcatError {
    #[error("No audio files to merge")]
    NoInputs,

    #[error("File not found: {0}")]
    MissingInput(String),

    #[error("Merge backend exited with status {code:?}: {stderr}")]
    BackendFailed { code: Option<i32>, stderr: String },

    #[error("Process error: {0}")]
    ProcessError(String),

    #[error("Output file was not created: {0}")]
    OutputMissing(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<CommandError> for ConcatError {
    fn from(err: CommandError) -> Self {
        ConcatError::ProcessError(err.to_string())
    }
}

impl From<std::io::Error> for ConcatError {
    fn from(err: std::io::Error) -> Self {
        ConcatError::IoError(err.to_string())
    }
}

/// Audio Concat Port
#[async_trait]
pub trait AudioConcatPort: Send + Sync {
    /// 按顺序拼接 `inputs` 写入 `output`
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ConcatError>;

    /// 生成指定时长的静音片段
    async fn silence(&self, duration_secs: f64, output: &Path) -> Result<(), ConcatError> {
        let _ = (duration_secs, output);
        Err(ConcatError::Unsupported(format!(
            "{} cannot generate silence",
            self.name()
        )))
    }

    fn name(&self) -> &str;
}
