//! Merge Command Handler
//!
//! 拼接已有音频文件，可在文件之间插入静音

use std::path::{Path, PathBuf};

use crate::application::commands::{MergeAudio, MergeMethod, MergeSource};
use crate::application::error::ApplicationError;
use crate::application::pipeline::{Assembler, ScratchArea};

/// 拼接响应
#[derive(Debug, Clone)]
pub struct MergeResponse {
    pub output: PathBuf,
    pub input_count: usize,
    pub size_bytes: u64,
    /// 实际插入的静音段数
    pub pauses_inserted: usize,
}

/// 解析播放列表
///
/// 支持 ffmpeg concat 格式（`file '<path>'`）和每行一个路径；忽略空行与 `#` 注释
pub fn parse_playlist(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| match line.strip_prefix("file ") {
            Some(rest) => {
                let rest = rest.trim();
                let unquoted = rest
                    .strip_prefix('\'')
                    .and_then(|r| r.strip_suffix('\''))
                    .unwrap_or(rest);
                PathBuf::from(unquoted.replace("'\\''", "'"))
            }
            None => PathBuf::from(line),
        })
        .collect()
}

/// 在相邻文件之间插入静音（最后一个文件之后不插入）
fn interleave_pauses(files: &[PathBuf], pause: &Path) -> Vec<PathBuf> {
    let mut sequence = Vec::with_capacity(files.len() * 2);
    for (i, file) in files.iter().enumerate() {
        sequence.push(file.clone());
        if i + 1 < files.len() {
            sequence.push(pause.to_path_buf());
        }
    }
    sequence
}

/// MergeAudio Handler
pub struct MergeAudioHandler {
    ffmpeg: Assembler,
    sox: Assembler,
    scratch_root: Option<PathBuf>,
}

impl MergeAudioHandler {
    pub fn new(ffmpeg: Assembler, sox: Assembler, scratch_root: Option<PathBuf>) -> Self {
        Self {
            ffmpeg,
            sox,
            scratch_root,
        }
    }

    pub async fn handle(&self, command: MergeAudio) -> Result<MergeResponse, ApplicationError> {
        let files = match &command.source {
            MergeSource::Files(files) => files.clone(),
            MergeSource::Playlist(path) => {
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    ApplicationError::storage(format!(
                        "Error reading playlist {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                parse_playlist(&content)
            }
        };

        if files.is_empty() {
            return Err(ApplicationError::validation("No files to merge"));
        }
        if !command.pause_secs.is_finite() || command.pause_secs < 0.0 {
            return Err(ApplicationError::validation(format!(
                "pause must be a non-negative number of seconds, got {}",
                command.pause_secs
            )));
        }

        let mut missing = Vec::new();
        for file in &files {
            match tokio::fs::metadata(file).await {
                Ok(metadata) => tracing::info!(
                    "Merging {} ({} bytes)",
                    file.display(),
                    metadata.len()
                ),
                Err(_) => missing.push(file.display().to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(ApplicationError::validation(format!(
                "The following files were not found: {}",
                missing.join(", ")
            )));
        }

        let pauses_inserted = match command.method {
            MergeMethod::Ffmpeg => self.merge_ffmpeg(&files, &command).await?,
            MergeMethod::Sox => {
                if command.pause_secs > 0.0 {
                    tracing::warn!("Pauses are not supported with sox, merging without pauses");
                }
                self.sox.assemble(&files, &command.output).await?;
                0
            }
        };

        let size_bytes = tokio::fs::metadata(&command.output)
            .await
            .map(|m| m.len())
            .map_err(|e| ApplicationError::storage(e.to_string()))?;

        let backend = match command.method {
            MergeMethod::Ffmpeg => self.ffmpeg.backend_name(),
            MergeMethod::Sox => self.sox.backend_name(),
        };
        tracing::info!(
            output = %command.output.display(),
            backend = %backend,
            size_bytes,
            "Successfully created merged audio"
        );

        Ok(MergeResponse {
            output: command.output,
            input_count: files.len(),
            size_bytes,
            pauses_inserted,
        })
    }

    async fn merge_ffmpeg(
        &self,
        files: &[PathBuf],
        command: &MergeAudio,
    ) -> Result<usize, ApplicationError> {
        if command.pause_secs <= 0.0 || files.len() < 2 {
            self.ffmpeg.assemble(files, &command.output).await?;
            return Ok(0);
        }

        let mut scratch = ScratchArea::create(self.scratch_root.as_deref(), "merge")
            .await
            .map_err(|e| ApplicationError::storage(e.to_string()))?;
        let pause = scratch.allocate(0, "mp3");

        let (sequence, pauses) = match self.ffmpeg.silence(command.pause_secs, &pause).await {
            Ok(()) => (interleave_pauses(files, &pause), files.len() - 1),
            Err(e) => {
                tracing::warn!(error = %e, "Could not create pause segment, merging without pauses");
                (files.to_vec(), 0)
            }
        };

        let result = self.ffmpeg.assemble(&sequence, &command.output).await;
        scratch.cleanup().await;
        result?;

        Ok(pauses)
    }
}
