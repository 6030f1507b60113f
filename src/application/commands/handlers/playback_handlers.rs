//! Playback Command Handlers

use std::sync::Arc;

use crate::application::commands::{PlayAudio, StopPlayback, VolumeAction};
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioPlayerPort, PlaybackError};

/// 最大音量
pub const MAX_VOLUME: u8 = 100;

// ============================================================================
// PlayAudio
// ============================================================================

/// PlayAudio Handler
#[derive(Clone)]
pub struct PlayAudioHandler {
    player: Arc<dyn AudioPlayerPort>,
}

impl PlayAudioHandler {
    pub fn new(player: Arc<dyn AudioPlayerPort>) -> Self {
        Self { player }
    }

    pub async fn handle(&self, command: PlayAudio) -> Result<(), ApplicationError> {
        if command.loops == 0 {
            return Err(ApplicationError::validation("loops must be at least 1"));
        }
        if tokio::fs::metadata(&command.path).await.is_err() {
            return Err(PlaybackError::FileNotFound(command.path.display().to_string()).into());
        }

        if let Some(volume) = command.volume {
            // 音量设置失败不影响播放
            if let Err(e) = self.player.set_volume(volume.min(MAX_VOLUME)).await {
                tracing::warn!(volume, error = %e, "Failed to set volume");
            }
        }

        for i in 0..command.loops {
            if command.loops > 1 {
                tracing::info!("Playing loop {}/{}", i + 1, command.loops);
            }
            self.player.play(&command.path).await?;
        }

        Ok(())
    }
}

// ============================================================================
// Volume
// ============================================================================

/// 音量操作结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeResponse {
    pub volume: Option<u8>,
    pub muted: Option<bool>,
}

/// Volume Handler
pub struct VolumeHandler {
    player: Arc<dyn AudioPlayerPort>,
}

impl VolumeHandler {
    pub fn new(player: Arc<dyn AudioPlayerPort>) -> Self {
        Self { player }
    }

    pub async fn handle(&self, action: VolumeAction) -> Result<VolumeResponse, ApplicationError> {
        match action {
            VolumeAction::Get => {
                let volume = self.player.get_volume().await?;
                let muted = self.player.is_muted().await?;
                Ok(VolumeResponse {
                    volume: Some(volume),
                    muted: Some(muted),
                })
            }
            VolumeAction::Set(volume) => {
                let volume = volume.min(MAX_VOLUME);
                self.player.set_volume(volume).await?;
                tracing::info!("Volume set to {}%", volume);
                Ok(VolumeResponse {
                    volume: Some(volume),
                    muted: None,
                })
            }
            VolumeAction::Mute | VolumeAction::Unmute => {
                let muted = action == VolumeAction::Mute;
                self.player.set_muted(muted).await?;
                tracing::info!("System {}", if muted { "muted" } else { "unmuted" });
                Ok(VolumeResponse {
                    volume: None,
                    muted: Some(muted),
                })
            }
        }
    }
}

// ============================================================================
// StopPlayback
// ============================================================================

/// StopPlayback Handler
pub struct StopPlaybackHandler {
    player: Arc<dyn AudioPlayerPort>,
}

impl StopPlaybackHandler {
    pub fn new(player: Arc<dyn AudioPlayerPort>) -> Self {
        Self { player }
    }

    pub async fn handle(&self, _command: StopPlayback) -> Result<(), ApplicationError> {
        self.player.stop().await?;
        tracing::info!("Stopped all audio playback");
        Ok(())
    }
}
