//! Command Player - 通过 afplay / osascript / pkill 播放与控制音量
//!
//! 音量通过 AppleScript 读写系统输出音量（0-100）

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    AudioPlayerPort, CommandOutput, CommandRunnerPort, CommandSpec, PlaybackError,
};

const DEFAULT_PLAYER: &str = "afplay";
const DEFAULT_VOLUME_PROGRAM: &str = "osascript";
const DEFAULT_STOP_PROGRAM: &str = "pkill";

/// 基于外部命令的播放器
pub struct CommandPlayer {
    runner: Arc<dyn CommandRunnerPort>,
    player: String,
    volume_program: String,
    stop_program: String,
}

impl CommandPlayer {
    pub fn new(runner: Arc<dyn CommandRunnerPort>) -> Self {
        Self {
            runner,
            player: DEFAULT_PLAYER.to_string(),
            volume_program: DEFAULT_VOLUME_PROGRAM.to_string(),
            stop_program: DEFAULT_STOP_PROGRAM.to_string(),
        }
    }

    pub fn with_programs(
        mut self,
        player: impl Into<String>,
        volume_program: impl Into<String>,
        stop_program: impl Into<String>,
    ) -> Self {
        self.player = player.into();
        self.volume_program = volume_program.into();
        self.stop_program = stop_program.into();
        self
    }

    async fn run_checked(&self, command: CommandSpec) -> Result<CommandOutput, PlaybackError> {
        let output = self.runner.run(&command).await?;
        if !output.success() {
            return Err(PlaybackError::PlayerFailed {
                code: output.exit_code,
                stderr: output.diagnostic(),
            });
        }
        Ok(output)
    }

    async fn apple_script(&self, script: &str) -> Result<String, PlaybackError> {
        let command = CommandSpec::new(&self.volume_program).args(["-e", script]);
        let output = self.run_checked(command).await?;
        Ok(output.stdout.trim().to_string())
    }
}

#[async_trait]
impl AudioPlayerPort for CommandPlayer {
    async fn play(&self, path: &Path) -> Result<(), PlaybackError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(PlaybackError::FileNotFound(path.display().to_string()));
        }
        tracing::debug!(player = %self.player, path = %path.display(), "Playing audio");
        self.run_checked(CommandSpec::new(&self.player).arg(path.display().to_string()))
            .await?;
        Ok(())
    }

    async fn stop(&self) -> Result<(), PlaybackError> {
        let command = CommandSpec::new(&self.stop_program).args(["-f", self.player.as_str()]);
        let output = self.runner.run(&command).await?;
        // pkill 在没有匹配进程时返回 1
        match output.exit_code {
            Some(0) | Some(1) => Ok(()),
            code => Err(PlaybackError::PlayerFailed {
                code,
                stderr: output.diagnostic(),
            }),
        }
    }

    async fn get_volume(&self) -> Result<u8, PlaybackError> {
        let raw = self
            .apple_script("output volume of (get volume settings)")
            .await?;
        raw.parse::<u8>()
            .map_err(|_| PlaybackError::InvalidOutput(format!("volume: {:?}", raw)))
    }

    async fn set_volume(&self, volume: u8) -> Result<(), PlaybackError> {
        self.apple_script(&format!("set volume output volume {}", volume.min(100)))
            .await?;
        Ok(())
    }

    async fn is_muted(&self) -> Result<bool, PlaybackError> {
        let raw = self
            .apple_script("output muted of (get volume settings)")
            .await?;
        match raw.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(PlaybackError::InvalidOutput(format!("muted: {:?}", other))),
        }
    }

    async fn set_muted(&self, muted: bool) -> Result<(), PlaybackError> {
        let script = if muted {
            "set volume with output muted"
        } else {
            "set volume without output muted"
        };
        self.apple_script(script).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::ScriptedCommandRunner;

    #[tokio::test]
    async fn test_volume_queries() {
        let runner = Arc::new(ScriptedCommandRunner::new());
        let player = CommandPlayer::new(runner.clone());

        assert_eq!(player.get_volume().await.unwrap(), 42);
        assert!(!player.is_muted().await.unwrap());

        let invocations = runner.invocations();
        assert_eq!(invocations[0].args[0], "-e");
        assert_eq!(invocations[0].args[1], "output volume of (get volume settings)");
    }

    #[tokio::test]
    async fn test_custom_programs() {
        let runner = Arc::new(ScriptedCommandRunner::new());
        let player = CommandPlayer::new(runner.clone()).with_programs("mpv", "osascript", "pkill");

        player.stop().await.unwrap();
        let invocations = runner.invocations();
        assert_eq!(invocations[0].program, "pkill");
        assert_eq!(invocations[0].args, vec!["-f", "mpv"]);
    }

    #[tokio::test]
    async fn test_missing_player_is_process_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3");
        std::fs::write(&path, b"x").unwrap();

        let runner = Arc::new(ScriptedCommandRunner::new().missing_program("afplay"));
        let err = CommandPlayer::new(runner).play(&path).await.unwrap_err();
        assert!(matches!(err, PlaybackError::ProcessError(_)));
    }
}
