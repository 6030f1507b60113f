//! 应用层错误定义
//!
//! - PipelineError: 合成流水线的致命错误
//! - SegmentFailure / CleanupWarning: 可恢复，只记录日志
//! - ApplicationError: 命令处理器统一错误类型

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ports::{ConcatError, PlaybackError};

/// 流水线致命错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 所有片段都被过滤掉
    #[error("no synthesizable content")]
    NoPronounceableContent,

    /// 所有保留片段合成失败
    #[error("no audio generated: all {failed} segment(s) failed")]
    NoAudioProduced { failed: usize },

    /// 拼接失败
    #[error("failed to merge audio segments: {0}")]
    AssemblyFailure(String),

    /// 临时目录不可用
    #[error("scratch area unavailable: {0}")]
    ScratchUnavailable(String),
}

impl From<ConcatError> for PipelineError {
    fn from(err: ConcatError) -> Self {
        Self::AssemblyFailure(err.to_string())
    }
}

/// 单个片段合成失败（可恢复）
#[derive(Debug, Clone, Error)]
#[error("segment {index} ({text_prefix:?}) failed: {reason}")]
pub struct SegmentFailure {
    pub index: usize,
    pub text_prefix: String,
    pub reason: String,
}

/// 临时文件清理失败（不影响流水线结果）
#[derive(Debug, Clone, Error)]
#[error("could not remove {}: {message}", .path.display())]
pub struct CleanupWarning {
    pub path: PathBuf,
    pub message: String,
}

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 流水线失败
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// 拼接错误
    #[error("Merge error: {0}")]
    MergeError(String),

    /// 播放错误
    #[error("Playback error: {0}")]
    PlaybackError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建存储错误
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError(message.into())
    }
}

impl From<ConcatError> for ApplicationError {
    fn from(err: ConcatError) -> Self {
        Self::MergeError(err.to_string())
    }
}

impl From<PlaybackError> for ApplicationError {
    fn from(err: PlaybackError) -> Self {
        Self::PlaybackError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_failure_message_names_text() {
        let failure = SegmentFailure {
            index: 1,
            text_prefix: "你好".to_string(),
            reason: "exit 1".to_string(),
        };
        let message = failure.to_string();
        assert!(message.contains("你好"));
        assert!(message.contains("segment 1"));
    }

    #[test]
    fn test_pipeline_error_is_transparent() {
        let err: ApplicationError = PipelineError::NoPronounceableContent.into();
        assert_eq!(err.to_string(), "no synthesizable content");
    }

    #[test]
    fn test_concat_error_maps_to_assembly_failure() {
        let err: PipelineError = ConcatError::NoInputs.into();
        assert!(matches!(err, PipelineError::AssemblyFailure(_)));
    }
}
