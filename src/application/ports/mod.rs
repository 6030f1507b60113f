//! Application Ports - 出站端口定义
//!
//! 定义应用层与外部进程/服务之间的抽象接口

mod audio_concat;
mod audio_player;
mod command_runner;
mod synthesis_backend;

pub use audio_concat::{AudioConcatPort, ConcatError};
pub use audio_player::{AudioPlayerPort, PlaybackError};
pub use command_runner::{CommandError, CommandOutput, CommandRunnerPort, CommandSpec};
pub use synthesis_backend::{
    ProsodyOptions, SynthesisBackendPort, SynthesisError, SynthesisRequest,
};
