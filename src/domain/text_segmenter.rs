//! 文本分割器
//!
//! 将中英文混合文本切分为单一语言的最大连续片段：
//! - 逐字符分类，数字/标点/空白跟随当前片段的语言
//! - 片段按原顺序首尾相接即为原文（无损）
//! - 相邻片段语言必不相同（最大化）

use super::language::{classify, is_cjk_ideograph, Language};

/// 单一语言的文本片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    text: String,
    language: Language,
}

impl Segment {
    /// 创建片段，空文本返回 None
    pub fn new(text: impl Into<String>, language: Language) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }
        Some(Self { text, language })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// 分割状态机
///
/// 不变量：`open_run_text` 为空当且仅当 `open_run_language` 为 None
#[derive(Debug, Default)]
pub struct SegmenterState {
    open_run_text: String,
    open_run_language: Option<Language>,
}

impl SegmenterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前打开片段的语言
    pub fn open_language(&self) -> Option<Language> {
        self.open_run_language
    }

    /// 当前打开片段的文本
    pub fn open_text(&self) -> &str {
        &self.open_run_text
    }

    /// 输入一个字符，语言切换时返回刚关闭的片段
    pub fn push(&mut self, ch: char) -> Option<Segment> {
        let language = classify(ch, self.open_run_language);

        match self.open_run_language {
            Some(open) if open == language => {
                self.open_run_text.push(ch);
                None
            }
            Some(open) => {
                let closed = Segment {
                    text: std::mem::take(&mut self.open_run_text),
                    language: open,
                };
                self.open_run_text.push(ch);
                self.open_run_language = Some(language);
                Some(closed)
            }
            None => {
                self.open_run_text.push(ch);
                self.open_run_language = Some(language);
                None
            }
        }
    }

    /// 结束输入，关闭仍然打开的片段
    pub fn finish(self) -> Option<Segment> {
        let language = self.open_run_language?;
        Segment::new(self.open_run_text, language)
    }
}

/// 对文本进行语言分段
///
/// 空文本返回空列表
pub fn segment(text: &str) -> Vec<Segment> {
    let mut state = SegmenterState::new();
    let mut segments = Vec::new();

    for ch in text.chars() {
        if let Some(closed) = state.push(ch) {
            segments.push(closed);
        }
    }

    if let Some(last) = state.finish() {
        segments.push(last);
    }

    segments
}

/// 片段是否包含可发音内容（中文、ASCII 字母或十进制数字）
pub fn is_pronounceable(text: &str) -> bool {
    text.chars()
        .any(|c| is_cjk_ideograph(c) || c.is_ascii_alphabetic() || c.is_ascii_digit())
}
