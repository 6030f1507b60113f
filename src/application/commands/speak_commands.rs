//! Speak Commands

use std::path::PathBuf;

use crate::application::pipeline::SpeechInput;
use crate::application::ports::ProsodyOptions;
use crate::domain::VoiceOverrides;

/// 合成语音命令
#[derive(Debug, Clone)]
pub struct SpeakCommand {
    pub input: SpeechInput,
    /// 输出路径，为 None 时使用临时文件
    pub output: Option<PathBuf>,
    /// 合成后播放
    pub play: bool,
    pub voices: VoiceOverrides,
    /// 播放次数
    pub loops: u32,
    /// 播放音量（0-100）
    pub volume: Option<u8>,
    pub prosody: ProsodyOptions,
}

impl SpeakCommand {
    /// 普通文本，其余参数取默认值
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            input: SpeechInput::Text(text.into()),
            output: None,
            play: false,
            voices: VoiceOverrides::default(),
            loops: 1,
            volume: None,
            prosody: ProsodyOptions::default(),
        }
    }
}
