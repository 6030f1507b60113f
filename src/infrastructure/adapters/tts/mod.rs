//! TTS Adapter - 合成后端实现
//!
//! - CommandTtsBackend: 调用 edge-tts 命令行
//! - HttpTtsClient: 调用 HTTP 合成服务

mod command_tts_backend;
mod http_tts_client;

pub use command_tts_backend::CommandTtsBackend;
pub use http_tts_client::*;
