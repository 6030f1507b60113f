//! Language - 语言标记与逐字符分类
//!
//! 只区分中文（CJK 统一表意文字）与拉丁字母文本，其余字符沿用当前语言

use super::errors::LanguageError;

/// CJK 统一表意文字区间起点
const CJK_UNIFIED_START: char = '\u{4E00}';
/// CJK 统一表意文字区间终点
const CJK_UNIFIED_END: char = '\u{9FFF}';

/// 渲染语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// 中文
    Zh,
    /// 英文（也是无法判断时的默认语言）
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            _ => Err(LanguageError::Unsupported(s.to_string())),
        }
    }
}

/// 是否为 CJK 统一表意文字（U+4E00..=U+9FFF）
#[inline]
pub fn is_cjk_ideograph(ch: char) -> bool {
    (CJK_UNIFIED_START..=CJK_UNIFIED_END).contains(&ch)
}

/// 对单个字符分类
///
/// 规则按顺序匹配：
/// 1. CJK 统一表意文字 → `zh`
/// 2. ASCII 字母 → `en`
/// 3. 其他（数字、标点、空白、符号）→ 当前语言；尚未确定语言时为 `en`
pub fn classify(ch: char, current: Option<Language>) -> Language {
    if is_cjk_ideograph(ch) {
        Language::Zh
    } else if ch.is_ascii_alphabetic() {
        Language::En
    } else {
        current.unwrap_or(Language::En)
    }
}

/// 整段文本的文字构成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptMix {
    Chinese,
    English,
    Mixed,
    Unknown,
}

impl std::fmt::Display for ScriptMix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScriptMix::Chinese => "zh",
            ScriptMix::English => "en",
            ScriptMix::Mixed => "mixed",
            ScriptMix::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// 粗略检测文本是否同时包含中文与英文字母
pub fn detect_script(text: &str) -> ScriptMix {
    let has_chinese = text.chars().any(is_cjk_ideograph);
    let has_english = text.chars().any(|c| c.is_ascii_alphabetic());

    match (has_chinese, has_english) {
        (true, true) => ScriptMix::Mixed,
        (true, false) => ScriptMix::Chinese,
        (false, true) => ScriptMix::English,
        (false, false) => ScriptMix::Unknown,
    }
}
