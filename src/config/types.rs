//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::{VoiceDefaults, DEFAULT_EN_VOICE, DEFAULT_FALLBACK_VOICE, DEFAULT_ZH_VOICE};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 默认音色表
    #[serde(default)]
    pub voices: VoicesConfig,

    /// 合成后端配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 拼接工具配置
    #[serde(default)]
    pub concat: ConcatConfig,

    /// 播放配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 临时文件配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 默认音色配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesConfig {
    #[serde(default = "default_en_voice")]
    pub en: String,

    #[serde(default = "default_zh_voice")]
    pub zh: String,

    /// 语言未知或多语言输入时使用
    #[serde(default = "default_fallback_voice")]
    pub default: String,
}

fn default_en_voice() -> String {
    DEFAULT_EN_VOICE.to_string()
}

fn default_zh_voice() -> String {
    DEFAULT_ZH_VOICE.to_string()
}

fn default_fallback_voice() -> String {
    DEFAULT_FALLBACK_VOICE.to_string()
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            en: default_en_voice(),
            zh: default_zh_voice(),
            default: default_fallback_voice(),
        }
    }
}

impl VoicesConfig {
    pub fn to_defaults(&self) -> VoiceDefaults {
        VoiceDefaults {
            en: self.en.clone(),
            zh: self.zh.clone(),
            default: self.default.clone(),
        }
    }
}

/// 合成后端类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisBackendKind {
    /// 调用命令行（edge-tts）
    #[default]
    Command,
    /// 调用 HTTP 服务
    Http,
}

impl std::fmt::Display for SynthesisBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisBackendKind::Command => write!(f, "command"),
            SynthesisBackendKind::Http => write!(f, "http"),
        }
    }
}

/// 合成后端配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub backend: SynthesisBackendKind,

    /// 命令行后端程序
    #[serde(default = "default_synthesis_program")]
    pub program: String,

    /// HTTP 后端地址
    #[serde(default = "default_http_url")]
    pub http_url: String,

    /// HTTP 请求超时时间（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_synthesis_program() -> String {
    "edge-tts".to_string()
}

fn default_http_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            backend: SynthesisBackendKind::default(),
            program: default_synthesis_program(),
            http_url: default_http_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// 拼接工具配置
#[derive(Debug, Clone, Deserialize)]
pub struct ConcatConfig {
    #[serde(default = "default_ffmpeg_program")]
    pub program: String,

    /// `merge --method sox` 使用的程序
    #[serde(default = "default_sox_program")]
    pub sox_program: String,
}

fn default_ffmpeg_program() -> String {
    "ffmpeg".to_string()
}

fn default_sox_program() -> String {
    "sox".to_string()
}

impl Default for ConcatConfig {
    fn default() -> Self {
        Self {
            program: default_ffmpeg_program(),
            sox_program: default_sox_program(),
        }
    }
}

/// 播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_player")]
    pub player: String,

    #[serde(default = "default_volume_program")]
    pub volume_program: String,

    #[serde(default = "default_stop_program")]
    pub stop_program: String,
}

fn default_player() -> String {
    "afplay".to_string()
}

fn default_volume_program() -> String {
    "osascript".to_string()
}

fn default_stop_program() -> String {
    "pkill".to_string()
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            player: default_player(),
            volume_program: default_volume_program(),
            stop_program: default_stop_program(),
        }
    }
}

/// 临时文件配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// 每次运行的临时目录所在位置，未设置时使用系统临时目录
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
