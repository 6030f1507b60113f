//! Pipeline Controller - 合成流水线编排
//!
//! 状态流转：
//! ```text
//! Segmenting → Filtering → Synthesizing → Assembling → Done
//!                  │             │             │
//!                  └─────────────┴─────────────┴──────→ Failed
//! ```
//! 片段严格按原顺序逐个合成；临时文件在合成/拼接结束后无条件清理

use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::application::error::{PipelineError, SegmentFailure};
use crate::application::ports::ProsodyOptions;
use crate::domain::{detect_script, is_pronounceable, segment, Language, Segment, VoiceTable};

use super::assembler::{discard_partial_output, Assembler};
use super::scratch::ScratchArea;
use super::synthesizer::{text_prefix, SegmentSynthesizer, SynthesisResult, SEGMENT_EXTENSION};

/// 流水线输入
#[derive(Debug, Clone)]
pub enum SpeechInput {
    /// 普通文本，按语言分段
    Text(String),
    /// 预先构造的标记（SSML），整体合成，不分段
    Markup(String),
}

/// 流水线请求
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input: SpeechInput,
    /// 输出路径，为 None 时分配临时文件
    pub output: Option<PathBuf>,
    pub voices: VoiceTable,
    pub prosody: ProsodyOptions,
}

/// 最终产物
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// 是否写入了调用方指定的路径
    pub persisted: bool,
}

/// 流水线运行结果
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub artifact: Artifact,
    pub segments_total: usize,
    pub segments_skipped: usize,
    pub segments_synthesized: usize,
    pub segments_failed: usize,
    /// 被跳过的失败片段，按原顺序
    pub failures: Vec<SegmentFailure>,
    pub cleanup_warnings: usize,
}

/// 流水线状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Segmenting,
    Filtering,
    Synthesizing,
    Assembling,
    Done(PathBuf),
    Failed(String),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Segmenting => "segmenting",
            PipelineState::Filtering => "filtering",
            PipelineState::Synthesizing => "synthesizing",
            PipelineState::Assembling => "assembling",
            PipelineState::Done(_) => "done",
            PipelineState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done(_) | PipelineState::Failed(_))
    }

    /// 合法的状态转换
    pub fn can_transition_to(&self, next: &PipelineState) -> bool {
        use PipelineState::*;
        matches!(
            (self, next),
            (Segmenting, Filtering)
                | (Filtering, Synthesizing)
                | (Filtering, Failed(_))
                | (Synthesizing, Assembling)
                | (Synthesizing, Failed(_))
                | (Assembling, Done(_))
                | (Assembling, Failed(_))
        )
    }
}

/// 状态跟踪，只用于日志与不变量检查
struct StateTracker {
    run_id: String,
    state: PipelineState,
}

impl StateTracker {
    fn new(run_id: String) -> Self {
        tracing::debug!(run_id = %run_id, state = "segmenting", "Pipeline started");
        Self {
            run_id,
            state: PipelineState::Segmenting,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "illegal pipeline transition {} -> {}",
            self.state.name(),
            next.name()
        );
        tracing::debug!(
            run_id = %self.run_id,
            from = self.state.name(),
            to = next.name(),
            "Pipeline state transition"
        );
        self.state = next;
    }

    fn fail(&mut self, error: PipelineError) -> PipelineError {
        self.advance(PipelineState::Failed(error.to_string()));
        error
    }
}

/// 待合成的单元
struct PlannedSegment {
    index: usize,
    segment: Segment,
    voice: String,
}

/// 流水线控制器
///
/// 每次调用 `run` 都是一次全新的运行，不保留任何状态
pub struct PipelineController {
    synthesizer: SegmentSynthesizer,
    assembler: Assembler,
    scratch_root: Option<PathBuf>,
}

impl PipelineController {
    pub fn new(
        synthesizer: SegmentSynthesizer,
        assembler: Assembler,
        scratch_root: Option<PathBuf>,
    ) -> Self {
        Self {
            synthesizer,
            assembler,
            scratch_root,
        }
    }

    pub async fn run(&self, request: PipelineRequest) -> Result<PipelineOutcome, PipelineError> {
        let run_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        let mut tracker = StateTracker::new(run_id.clone());

        // Segmenting
        let (segments, markup) = match &request.input {
            SpeechInput::Text(text) => {
                tracing::info!(
                    run_id = %run_id,
                    backend = %self.synthesizer.backend_name(),
                    script = %detect_script(text),
                    chars = text.chars().count(),
                    "Segmenting text"
                );
                (segment(text), false)
            }
            SpeechInput::Markup(markup) => {
                tracing::info!(run_id = %run_id, "Markup input, skipping segmentation");
                (
                    Segment::new(markup.clone(), Language::En)
                        .into_iter()
                        .collect::<Vec<_>>(),
                    true,
                )
            }
        };
        let segments_total = segments.len();
        tracker.advance(PipelineState::Filtering);

        // Filtering
        let planned = plan_segments(segments, markup, &request.voices);
        let segments_skipped = segments_total - planned.len();
        if planned.is_empty() {
            return Err(tracker.fail(PipelineError::NoPronounceableContent));
        }
        tracker.advance(PipelineState::Synthesizing);

        // Synthesizing
        let mut scratch = ScratchArea::create(self.scratch_root.as_deref(), &run_id)
            .await
            .map_err(|e| tracker.fail(PipelineError::ScratchUnavailable(e.to_string())))?;

        let mut results: Vec<SynthesisResult> = Vec::with_capacity(planned.len());
        for unit in planned {
            let result = self
                .synthesizer
                .synthesize(
                    unit.index,
                    unit.segment,
                    &unit.voice,
                    request.prosody,
                    &mut scratch,
                )
                .await;
            results.push(result);
        }

        let succeeded: Vec<PathBuf> = results
            .iter()
            .filter(|r| r.succeeded)
            .map(|r| r.audio_path.clone())
            .collect();
        let failures: Vec<SegmentFailure> = results
            .iter()
            .filter_map(|r| r.failure.clone())
            .collect();
        let segments_failed = results.len() - succeeded.len();

        // Assembling
        let assembled = if succeeded.is_empty() {
            Err(tracker.fail(PipelineError::NoAudioProduced {
                failed: segments_failed,
            }))
        } else {
            tracker.advance(PipelineState::Assembling);
            self.assemble(&succeeded, request.output.as_deref(), &run_id)
                .await
                .map_err(|e| tracker.fail(e))
        };

        // 无论成功与否都清理临时片段
        let cleanup = scratch.cleanup().await;

        let artifact = assembled?;
        tracker.advance(PipelineState::Done(artifact.path.clone()));

        tracing::info!(
            run_id = %run_id,
            path = %artifact.path.display(),
            synthesized = succeeded.len(),
            failed = segments_failed,
            skipped = segments_skipped,
            "Audio saved to: {}",
            artifact.path.display()
        );

        Ok(PipelineOutcome {
            artifact,
            segments_total,
            segments_skipped,
            segments_synthesized: succeeded.len(),
            segments_failed,
            failures,
            cleanup_warnings: cleanup.warnings.len(),
        })
    }

    async fn assemble(
        &self,
        inputs: &[PathBuf],
        output: Option<&Path>,
        run_id: &str,
    ) -> Result<Artifact, PipelineError> {
        let artifact = match output {
            Some(path) => Artifact {
                path: path.to_path_buf(),
                persisted: true,
            },
            None => Artifact {
                path: self.allocate_artifact_path(run_id)?,
                persisted: false,
            },
        };

        let result = if let [single] = inputs {
            self.assembler.adopt_single(single, &artifact.path).await
        } else {
            self.assembler.assemble(inputs, &artifact.path).await
        };

        match result {
            Ok(()) => Ok(artifact),
            Err(e) => {
                // 调用方指定的路径不删除，只删除本次分配的临时产物
                if !artifact.persisted {
                    discard_partial_output(&artifact.path).await;
                }
                Err(e.into())
            }
        }
    }

    /// 分配临时产物路径（不随运行结束删除）
    fn allocate_artifact_path(&self, run_id: &str) -> Result<PathBuf, PipelineError> {
        let prefix = format!("mixtts-{}-", run_id);
        let suffix = format!(".{}", SEGMENT_EXTENSION);
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(&suffix);

        let file = match self.scratch_root.as_deref() {
            Some(root) => builder.tempfile_in(root),
            None => builder.tempfile(),
        }
        .map_err(|e| PipelineError::ScratchUnavailable(e.to_string()))?;

        file.into_temp_path()
            .keep()
            .map_err(|e| PipelineError::ScratchUnavailable(e.to_string()))
    }
}

/// 过滤不可发音片段并解析音色，保持原顺序
fn plan_segments(segments: Vec<Segment>, markup: bool, voices: &VoiceTable) -> Vec<PlannedSegment> {
    segments
        .into_iter()
        .enumerate()
        .filter_map(|(index, segment)| {
            if markup {
                let voice = voices.default_voice().to_string();
                return Some(PlannedSegment { index, segment, voice });
            }
            if !is_pronounceable(segment.text()) {
                tracing::debug!(
                    segment_index = index,
                    "Skipping non-pronounceable segment: {:?}",
                    text_prefix(segment.text())
                );
                return None;
            }
            let voice = voices.voice_for(segment.language()).to_string();
            Some(PlannedSegment { index, segment, voice })
        })
        .collect()
}
