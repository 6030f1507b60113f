//! Synthesis Backend Port - 语音合成后端抽象
//!
//! 后端是黑盒：给定文本与音色，把音频写到调用方指定的路径

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use super::command_runner::CommandError;

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Backend exited with status {code:?}: {stderr}")]
    BackendFailed { code: Option<i32>, stderr: String },

    #[error("Process error: {0}")]
    ProcessError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Backend produced no audio at {0}")]
    MissingOutput(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<CommandError> for SynthesisError {
    fn from(err: CommandError) -> Self {
        SynthesisError::ProcessError(err.to_string())
    }
}

/// 语速/音调调整，原样透传给后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProsodyOptions {
    /// 语速调整（百分比，可为负）
    pub rate: Option<i32>,
    /// 音调调整（Hz，可为负）
    pub pitch: Option<i32>,
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    pub prosody: ProsodyOptions,
}

/// Synthesis Backend Port
#[async_trait]
pub trait SynthesisBackendPort: Send + Sync {
    /// 合成 `request.text` 并写入 `output_path`
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        output_path: &Path,
    ) -> Result<(), SynthesisError>;

    /// 后端名称（用于日志）
    fn name(&self) -> &str;
}
