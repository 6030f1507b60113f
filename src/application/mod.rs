//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（CommandRunner、SynthesisBackend、AudioConcat、AudioPlayer）
//! - pipeline: 分段合成流水线（合成、拼接、临时目录管理、状态控制）
//! - commands: 命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod pipeline;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::{
        MergeAudioHandler, MergeResponse, PlayAudioHandler, SpeakHandler, SpeakResponse,
        StopPlaybackHandler, VolumeHandler, VolumeResponse,
    },
    MergeAudio, MergeMethod, MergeSource, PlayAudio, SpeakCommand, StopPlayback, VolumeAction,
};

pub use error::{ApplicationError, CleanupWarning, PipelineError, SegmentFailure};

pub use pipeline::{
    Artifact, Assembler, PipelineController, PipelineOutcome, PipelineRequest, SegmentSynthesizer,
    SpeechInput,
};

pub use ports::{
    AudioConcatPort, AudioPlayerPort, CommandError, CommandOutput, CommandRunnerPort, CommandSpec,
    ConcatError, PlaybackError, ProsodyOptions, SynthesisBackendPort, SynthesisError,
    SynthesisRequest,
};
