//! Voice Resolver - 语言到音色的映射
//!
//! 优先级（从高到低）：
//! 1. 指定语言的音色覆盖（`--voice-en` / `--voice-zh`）
//! 2. 全局音色覆盖（`--voice`）
//! 3. 内置默认音色

use super::language::Language;

/// 英文默认音色
pub const DEFAULT_EN_VOICE: &str = "en-US-JennyNeural";
/// 中文默认音色
pub const DEFAULT_ZH_VOICE: &str = "zh-CN-XiaoxiaoNeural";
/// 无法识别语言时的默认音色
pub const DEFAULT_FALLBACK_VOICE: &str = "en-US-JennyNeural";

/// 内置默认音色表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceDefaults {
    pub en: String,
    pub zh: String,
    pub default: String,
}

impl Default for VoiceDefaults {
    fn default() -> Self {
        Self {
            en: DEFAULT_EN_VOICE.to_string(),
            zh: DEFAULT_ZH_VOICE.to_string(),
            default: DEFAULT_FALLBACK_VOICE.to_string(),
        }
    }
}

/// 调用方提供的音色覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceOverrides {
    pub global: Option<String>,
    pub en: Option<String>,
    pub zh: Option<String>,
}

impl VoiceOverrides {
    fn for_tag(&self, tag: &str) -> Option<&str> {
        match tag.parse::<Language>() {
            Ok(Language::En) => self.en.as_deref(),
            Ok(Language::Zh) => self.zh.as_deref(),
            Err(_) => None,
        }
    }
}

/// 解析语言标记对应的音色
///
/// 未识别的语言标记跳过语言级覆盖与语言默认值，回落到全局覆盖或内置默认音色
pub fn resolve(tag: &str, overrides: &VoiceOverrides, defaults: &VoiceDefaults) -> String {
    if let Some(voice) = overrides.for_tag(tag) {
        return voice.to_string();
    }
    if let Some(voice) = overrides.global.as_deref() {
        return voice.to_string();
    }
    match tag.parse::<Language>() {
        Ok(Language::En) => defaults.en.clone(),
        Ok(Language::Zh) => defaults.zh.clone(),
        Err(_) => defaults.default.clone(),
    }
}

/// 单次运行使用的音色表，构建后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceTable {
    en: String,
    zh: String,
    default: String,
}

impl VoiceTable {
    pub fn build(overrides: &VoiceOverrides, defaults: &VoiceDefaults) -> Self {
        Self {
            en: resolve(Language::En.as_str(), overrides, defaults),
            zh: resolve(Language::Zh.as_str(), overrides, defaults),
            default: resolve("default", overrides, defaults),
        }
    }

    pub fn voice_for(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Zh => &self.zh,
        }
    }

    /// 多语言输入（如 SSML）使用的音色
    pub fn default_voice(&self) -> &str {
        &self.default
    }
}
