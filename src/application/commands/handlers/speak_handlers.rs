//! Speak Command Handler
//!
//! 流水线之外负责：命令校验、音色表构建、播放，以及临时产物的处置

use std::path::PathBuf;

use crate::application::commands::{PlayAudio, SpeakCommand};
use crate::application::error::{ApplicationError, SegmentFailure};
use crate::application::pipeline::{PipelineController, PipelineRequest, SpeechInput};
use crate::domain::{VoiceDefaults, VoiceTable};

use super::playback_handlers::{PlayAudioHandler, MAX_VOLUME};

/// 合成响应
#[derive(Debug, Clone)]
pub struct SpeakResponse {
    /// 最终产物路径，未保存也未播放的临时产物被删除后为 None
    pub artifact_path: Option<PathBuf>,
    pub segments_total: usize,
    pub segments_skipped: usize,
    pub segments_synthesized: usize,
    pub segments_failed: usize,
    /// 被跳过的失败片段诊断
    pub failures: Vec<SegmentFailure>,
    pub played: bool,
}

/// Speak Handler
pub struct SpeakHandler {
    controller: PipelineController,
    voice_defaults: VoiceDefaults,
    player: PlayAudioHandler,
}

impl SpeakHandler {
    pub fn new(
        controller: PipelineController,
        voice_defaults: VoiceDefaults,
        player: PlayAudioHandler,
    ) -> Self {
        Self {
            controller,
            voice_defaults,
            player,
        }
    }

    pub async fn handle(&self, command: SpeakCommand) -> Result<SpeakResponse, ApplicationError> {
        validate(&command)?;

        let voices = VoiceTable::build(&command.voices, &self.voice_defaults);
        let request = PipelineRequest {
            input: command.input,
            output: command.output,
            voices,
            prosody: command.prosody,
        };

        let outcome = self.controller.run(request).await?;
        let artifact = outcome.artifact;

        if command.play {
            tracing::info!("Playing audio (loops: {})...", command.loops);
            let played = self
                .player
                .handle(PlayAudio {
                    path: artifact.path.clone(),
                    loops: command.loops,
                    volume: command.volume,
                })
                .await;
            if let Err(e) = played {
                if !artifact.persisted {
                    remove_temporary_artifact(&artifact.path).await;
                }
                return Err(e);
            }
        }

        let artifact_path = if !artifact.persisted && !command.play {
            // 既未保存也未播放
            remove_temporary_artifact(&artifact.path).await;
            None
        } else {
            Some(artifact.path)
        };

        Ok(SpeakResponse {
            artifact_path,
            segments_total: outcome.segments_total,
            segments_skipped: outcome.segments_skipped,
            segments_synthesized: outcome.segments_synthesized,
            segments_failed: outcome.segments_failed,
            failures: outcome.failures,
            played: command.play,
        })
    }
}

async fn remove_temporary_artifact(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(
            path = %path.display(),
            error = %e,
            "Failed to remove temporary artifact"
        );
    }
}

fn validate(command: &SpeakCommand) -> Result<(), ApplicationError> {
    let content = match &command.input {
        SpeechInput::Text(text) => text,
        SpeechInput::Markup(markup) => markup,
    };
    if content.is_empty() {
        return Err(ApplicationError::validation("Either text or markup is required"));
    }
    if command.loops == 0 {
        return Err(ApplicationError::validation("loops must be at least 1"));
    }
    if let Some(volume) = command.volume {
        if volume > MAX_VOLUME {
            return Err(ApplicationError::validation(format!(
                "volume must be between 0 and {}, got {}",
                MAX_VOLUME, volume
            )));
        }
    }
    Ok(())
}
