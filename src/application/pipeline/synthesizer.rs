//! Segment Synthesizer - 逐片段调用合成后端

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::error::SegmentFailure;
use crate::application::ports::{
    ProsodyOptions, SynthesisBackendPort, SynthesisError, SynthesisRequest,
};
use crate::domain::Segment;

use super::scratch::ScratchArea;

/// 诊断信息中保留的文本长度（字符数）
pub const TEXT_PREFIX_CHARS: usize = 50;

/// 片段音频的扩展名
pub const SEGMENT_EXTENSION: &str = "mp3";

/// 截取文本前缀
pub fn text_prefix(text: &str) -> String {
    text.chars().take(TEXT_PREFIX_CHARS).collect()
}

/// 单个片段的合成结果
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub index: usize,
    pub segment: Segment,
    pub audio_path: PathBuf,
    pub succeeded: bool,
    pub failure: Option<SegmentFailure>,
}

/// 片段合成器
pub struct SegmentSynthesizer {
    backend: Arc<dyn SynthesisBackendPort>,
}

impl SegmentSynthesizer {
    pub fn new(backend: Arc<dyn SynthesisBackendPort>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// 合成一个片段，失败不向上传播
    pub async fn synthesize(
        &self,
        index: usize,
        segment: Segment,
        voice: &str,
        prosody: ProsodyOptions,
        scratch: &mut ScratchArea,
    ) -> SynthesisResult {
        // 先登记再调用后端，保证任何结果下都会被清理
        let audio_path = scratch.allocate(index, SEGMENT_EXTENSION);
        let request = SynthesisRequest {
            text: segment.text().to_string(),
            voice: voice.to_string(),
            prosody,
        };

        tracing::info!(
            segment_index = index,
            language = %segment.language(),
            voice = %voice,
            "Generating {} segment: {}...",
            segment.language(),
            text_prefix(segment.text())
        );

        let outcome = match self.backend.synthesize(&request, &audio_path).await {
            Ok(()) => match tokio::fs::metadata(&audio_path).await {
                Ok(_) => Ok(()),
                Err(_) => Err(SynthesisError::MissingOutput(
                    audio_path.display().to_string(),
                )),
            },
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => SynthesisResult {
                index,
                segment,
                audio_path,
                succeeded: true,
                failure: None,
            },
            Err(e) => {
                let failure = SegmentFailure {
                    index,
                    text_prefix: text_prefix(segment.text()),
                    reason: e.to_string(),
                };
                tracing::warn!(
                    segment_index = index,
                    backend = %self.backend.name(),
                    "Failed to generate segment, skipping: {}",
                    failure
                );
                SynthesisResult {
                    index,
                    segment,
                    audio_path,
                    succeeded: false,
                    failure: Some(failure),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;
    use crate::infrastructure::adapters::{CommandTtsBackend, ScriptedCommandRunner};
    use tempfile::tempdir;

    #[test]
    fn test_text_prefix_counts_chars() {
        let long: String = "中".repeat(80);
        assert_eq!(text_prefix(&long).chars().count(), TEXT_PREFIX_CHARS);
        assert_eq!(text_prefix("short"), "short");
    }

    #[tokio::test]
    async fn test_successful_segment_registers_file() {
        let root = tempdir().unwrap();
        let mut scratch = ScratchArea::create(Some(root.path()), "test").await.unwrap();
        let runner = Arc::new(ScriptedCommandRunner::new());
        let synthesizer =
            SegmentSynthesizer::new(Arc::new(CommandTtsBackend::new(runner.clone(), "edge-tts")));

        let segment = Segment::new("Hello", Language::En).unwrap();
        let result = synthesizer
            .synthesize(0, segment, "en-US-JennyNeural", ProsodyOptions::default(), &mut scratch)
            .await;

        assert!(result.succeeded);
        assert!(result.failure.is_none());
        assert_eq!(
            std::fs::read(&result.audio_path).unwrap(),
            b"[en-US-JennyNeural:Hello]"
        );
        assert_eq!(scratch.registered(), &[result.audio_path.clone()]);

        scratch.cleanup().await;
    }

    #[tokio::test]
    async fn test_failed_segment_is_reported_not_raised() {
        let root = tempdir().unwrap();
        let mut scratch = ScratchArea::create(Some(root.path()), "test").await.unwrap();
        let runner = Arc::new(ScriptedCommandRunner::new().fail_on_text("坏"));
        let synthesizer =
            SegmentSynthesizer::new(Arc::new(CommandTtsBackend::new(runner, "edge-tts")));

        let segment = Segment::new("坏的片段", Language::Zh).unwrap();
        let result = synthesizer
            .synthesize(2, segment, "zh-CN-XiaoxiaoNeural", ProsodyOptions::default(), &mut scratch)
            .await;

        assert!(!result.succeeded);
        let failure = result.failure.unwrap();
        assert_eq!(failure.index, 2);
        assert_eq!(failure.text_prefix, "坏的片段");
        // 失败的片段也已登记，清理时一并处理
        assert_eq!(scratch.registered().len(), 1);

        scratch.cleanup().await;
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
