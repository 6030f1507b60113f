//! mixtts - 中英文混合文本转语音
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - 逐字符语言分类、分段、可发音判断、音色解析（纯函数）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（CommandRunner, SynthesisBackend, AudioConcat, AudioPlayer）
//! - Pipeline: 分段合成与拼接流水线
//! - Commands: 命令处理器（speak, merge, play, volume, stop）
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: 外部进程、edge-tts、HTTP TTS、ffmpeg/sox、afplay/osascript
//! - CLI: clap 参数解析与命令分发

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
