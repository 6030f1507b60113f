//! 命令分发
//!
//! 根据配置组装适配器与 Handler，并执行解析后的子命令

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::commands::handlers::{
    MergeAudioHandler, PlayAudioHandler, SpeakHandler, StopPlaybackHandler, VolumeHandler,
};
use crate::application::commands::{StopPlayback, VolumeAction};
use crate::application::error::ApplicationError;
use crate::application::pipeline::{Assembler, PipelineController, SegmentSynthesizer};
use crate::application::ports::{
    AudioConcatPort, AudioPlayerPort, CommandRunnerPort, SynthesisBackendPort,
};
use crate::config::{AppConfig, SynthesisBackendKind};
use crate::infrastructure::adapters::{
    CommandPlayer, CommandTtsBackend, FfmpegConcat, HttpTtsClient, HttpTtsClientConfig, SoxConcat,
};

use super::args::{Cli, Commands};

/// 命令行参数覆盖配置（最高优先级）
pub fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if cli.verbose {
        config.log.level = "debug".to_string();
    }
}

/// 组装完成的 Handler 集合
pub struct AppServices {
    speak: SpeakHandler,
    merge: MergeAudioHandler,
    play: PlayAudioHandler,
    volume: VolumeHandler,
    stop: StopPlaybackHandler,
}

impl AppServices {
    pub fn from_config(
        config: &AppConfig,
        runner: Arc<dyn CommandRunnerPort>,
    ) -> Result<Self, ApplicationError> {
        let backend: Arc<dyn SynthesisBackendPort> = match config.synthesis.backend {
            SynthesisBackendKind::Command => Arc::new(CommandTtsBackend::new(
                runner.clone(),
                config.synthesis.program.as_str(),
            )),
            SynthesisBackendKind::Http => {
                let http_config = HttpTtsClientConfig::new(config.synthesis.http_url.as_str())
                    .with_timeout(config.synthesis.timeout_secs);
                Arc::new(
                    HttpTtsClient::new(http_config)
                        .map_err(|e| ApplicationError::ExternalServiceError(e.to_string()))?,
                )
            }
        };

        let scratch_root: Option<PathBuf> = config.storage.scratch_dir.clone();

        let mut ffmpeg = FfmpegConcat::new(runner.clone(), config.concat.program.as_str());
        if let Some(dir) = &scratch_root {
            ffmpeg = ffmpeg.with_scratch_dir(dir.clone());
        }
        let ffmpeg: Arc<dyn AudioConcatPort> = Arc::new(ffmpeg);
        let sox: Arc<dyn AudioConcatPort> = Arc::new(SoxConcat::new(
            runner.clone(),
            config.concat.sox_program.as_str(),
        ));

        let player: Arc<dyn AudioPlayerPort> = Arc::new(CommandPlayer::new(runner).with_programs(
            config.playback.player.as_str(),
            config.playback.volume_program.as_str(),
            config.playback.stop_program.as_str(),
        ));
        let play = PlayAudioHandler::new(player.clone());

        let controller = PipelineController::new(
            SegmentSynthesizer::new(backend),
            Assembler::new(ffmpeg.clone()),
            scratch_root.clone(),
        );

        Ok(Self {
            speak: SpeakHandler::new(controller, config.voices.to_defaults(), play.clone()),
            merge: MergeAudioHandler::new(Assembler::new(ffmpeg), Assembler::new(sox), scratch_root),
            play,
            volume: VolumeHandler::new(player.clone()),
            stop: StopPlaybackHandler::new(player),
        })
    }

    /// 执行子命令，返回面向用户的结果摘要
    pub async fn execute(&self, command: Commands) -> Result<String, ApplicationError> {
        match command {
            Commands::Speak(args) => {
                let requested_output = args.output.is_some();
                let response = self.speak.handle(args.into_command()).await?;

                let mut report = format!(
                    "Segments: {} synthesized, {} skipped, {} failed",
                    response.segments_synthesized,
                    response.segments_skipped,
                    response.segments_failed
                );
                for failure in &response.failures {
                    report.push_str(&format!("\nSkipped {}", failure));
                }
                match &response.artifact_path {
                    Some(path) if requested_output => {
                        report.push_str(&format!("\nAudio saved to: {}", path.display()));
                    }
                    Some(path) => {
                        report.push_str(&format!("\nTemporary audio: {}", path.display()));
                    }
                    None => {}
                }
                Ok(report)
            }
            Commands::Merge(args) => {
                let response = self.merge.handle(args.into_command()).await?;
                Ok(format!(
                    "Merged {} file(s) into {} ({} bytes)",
                    response.input_count,
                    response.output.display(),
                    response.size_bytes
                ))
            }
            Commands::Play(args) => {
                let command = args.into_command();
                let path = command.path.clone();
                self.play.handle(command).await?;
                Ok(format!("Played {}", path.display()))
            }
            Commands::Volume { action } => {
                let action = action.map(VolumeAction::from).unwrap_or(VolumeAction::Get);
                let response = self.volume.handle(action).await?;
                Ok(match (action, response.volume, response.muted) {
                    (VolumeAction::Get, Some(volume), Some(muted)) => {
                        format!("Volume: {}% (muted: {})", volume, muted)
                    }
                    (VolumeAction::Set(_), Some(volume), _) => format!("Volume set to {}%", volume),
                    (_, _, Some(true)) => "System muted".to_string(),
                    _ => "System unmuted".to_string(),
                })
            }
            Commands::Stop => {
                self.stop.handle(StopPlayback).await?;
                Ok("Stopped all audio playback".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::PipelineError;
    use crate::infrastructure::adapters::ScriptedCommandRunner;
    use clap::Parser;
    use tempfile::{tempdir, TempDir};

    struct Harness {
        runner: Arc<ScriptedCommandRunner>,
        services: AppServices,
        scratch: TempDir,
        work: TempDir,
    }

    impl Harness {
        fn new(runner: ScriptedCommandRunner) -> Self {
            let runner = Arc::new(runner);
            let scratch = tempdir().unwrap();
            let work = tempdir().unwrap();
            let mut config = AppConfig::default();
            config.storage.scratch_dir = Some(scratch.path().to_path_buf());
            let services = AppServices::from_config(&config, runner.clone()).unwrap();
            Self {
                runner,
                services,
                scratch,
                work,
            }
        }

        async fn run(&self, args: &[&str]) -> Result<String, ApplicationError> {
            let cli = Cli::try_parse_from(std::iter::once("mixtts").chain(args.iter().copied()))
                .unwrap();
            self.services.execute(cli.command).await
        }

        fn work_path(&self, name: &str) -> String {
            self.work.path().join(name).display().to_string()
        }
    }

    #[tokio::test]
    async fn test_speak_to_file() {
        let h = Harness::new(ScriptedCommandRunner::new());
        let out = h.work_path("out.mp3");

        let report = h
            .run(&["speak", "--text", "Hello 你好", "-o", &out])
            .await
            .unwrap();

        assert!(report.contains("2 synthesized"));
        assert!(report.contains(&format!("Audio saved to: {}", out)));
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "[en-US-JennyNeural:Hello ][zh-CN-XiaoxiaoNeural:你好]"
        );
        assert_eq!(std::fs::read_dir(h.scratch.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_speak_reports_failed_segments() {
        let h = Harness::new(ScriptedCommandRunner::new().fail_on_text("中间"));
        let out = h.work_path("out.mp3");

        let report = h
            .run(&["speak", "--text", "First 中间 Last", "-o", &out])
            .await
            .unwrap();

        assert!(report.contains("2 synthesized, 0 skipped, 1 failed"));
        assert!(report.contains("Skipped segment 1 (\"中间 \") failed"));
        assert!(report.contains(&format!("Audio saved to: {}", out)));
    }

    #[tokio::test]
    async fn test_speak_ssml_with_global_voice() {
        let h = Harness::new(ScriptedCommandRunner::new());
        let out = h.work_path("out.mp3");

        h.run(&[
            "speak",
            "--ssml",
            "<speak>Hi 你好</speak>",
            "--voice",
            "multi",
            "-o",
            &out,
        ])
        .await
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "[multi:<speak>Hi 你好</speak>]"
        );
    }

    #[tokio::test]
    async fn test_speak_punctuation_only_fails() {
        let h = Harness::new(ScriptedCommandRunner::new());
        let err = h.run(&["speak", "--text", "?!"]).await.unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Pipeline(PipelineError::NoPronounceableContent)
        ));
        assert_eq!(err.to_string(), "no synthesizable content");
    }

    #[tokio::test]
    async fn test_speak_and_play_keeps_temp_file() {
        let h = Harness::new(ScriptedCommandRunner::new());
        let report = h
            .run(&["speak", "--text", "Hello", "--play", "--volume", "60"])
            .await
            .unwrap();

        assert!(report.contains("Temporary audio:"));
        assert_eq!(h.runner.count_for("afplay"), 1);
    }

    #[tokio::test]
    async fn test_merge_command() {
        let h = Harness::new(ScriptedCommandRunner::new());
        let a = h.work_path("a.mp3");
        let b = h.work_path("b.mp3");
        std::fs::write(&a, "A").unwrap();
        std::fs::write(&b, "B").unwrap();
        let out = h.work_path("merged.mp3");

        let report = h.run(&["merge", &a, &b, "-o", &out]).await.unwrap();

        assert_eq!(report, format!("Merged 2 file(s) into {} (2 bytes)", out));
    }

    #[tokio::test]
    async fn test_volume_commands() {
        let h = Harness::new(ScriptedCommandRunner::new());

        assert_eq!(h.run(&["volume"]).await.unwrap(), "Volume: 42% (muted: false)");
        assert_eq!(
            h.run(&["volume", "set", "30"]).await.unwrap(),
            "Volume set to 30%"
        );
        assert_eq!(h.run(&["volume", "mute"]).await.unwrap(), "System muted");
        assert_eq!(h.run(&["volume", "unmute"]).await.unwrap(), "System unmuted");
    }

    #[tokio::test]
    async fn test_stop_and_missing_tools() {
        let h = Harness::new(ScriptedCommandRunner::new().missing_program("pkill"));
        let err = h.run(&["stop"]).await.unwrap_err();
        assert!(matches!(err, ApplicationError::PlaybackError(_)));
    }

    #[test]
    fn test_verbose_overrides_log_level() {
        let cli = Cli::try_parse_from(["mixtts", "--verbose", "stop"]).unwrap();
        let mut config = AppConfig::default();
        apply_overrides(&mut config, &cli);
        assert_eq!(config.log.level, "debug");
    }
}
