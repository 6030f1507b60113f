//! Domain Layer - 领域层
//!
//! 纯函数部分，不涉及任何外部进程或文件：
//! - language: 逐字符语言分类
//! - text_segmenter: 中英文分段与可发音判断
//! - voice: 音色解析

mod errors;
mod language;
mod text_segmenter;
mod voice;

pub use errors::LanguageError;
pub use language::{classify, detect_script, is_cjk_ideograph, Language, ScriptMix};
pub use text_segmenter::{is_pronounceable, segment, Segment, SegmenterState};
pub use voice::{
    resolve, VoiceDefaults, VoiceOverrides, VoiceTable, DEFAULT_EN_VOICE, DEFAULT_FALLBACK_VOICE,
    DEFAULT_ZH_VOICE,
};
